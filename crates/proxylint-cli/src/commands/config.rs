//! Configuration management commands

use colored::*;
use proxylint_core::{ConfigLoader, LintConfig};
use std::path::PathBuf;

use super::resolve_config;
use crate::GlobalArgs;

/// Write a starter `.proxylintrc.json`
pub fn init_command(dir: Option<PathBuf>, force: bool) -> anyhow::Result<i32> {
    let dir = dir.unwrap_or_else(|| PathBuf::from("."));
    let path = ConfigLoader::init(&dir, force)?;
    println!("{} Created {}", "✓".green(), path.display());
    Ok(0)
}

/// Print the JSON Schema of the configuration file
pub fn schema_command() -> anyhow::Result<i32> {
    println!("{}", LintConfig::json_schema()?);
    Ok(0)
}

/// Print the configuration after discovery and command-line overrides
pub fn show_command(global: &GlobalArgs) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir()?;
    let config = resolve_config(global, &cwd)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(0)
}
