//! Configuration file discovery and loading

use super::lint_config::LintConfig;
use crate::{ProxyLintError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name written by `proxylint config init`
pub const CONFIG_FILE_NAME: &str = ".proxylintrc.json";

/// File names searched during discovery, in order of preference
pub const CONFIG_FILE_NAMES: &[&str] = &[CONFIG_FILE_NAME, ".proxylintrc.jsonc"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by walking up from `start_path`
    ///
    /// When `start_path` is a file the search begins in its directory.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let canonical = start_path
            .canonicalize()
            .map_err(|e| ProxyLintError::config_error(format!("Invalid path: {e}")))?;
        let mut current = if canonical.is_file() {
            match canonical.parent() {
                Some(parent) => parent.to_path_buf(),
                None => return Ok(None),
            }
        } else {
            canonical
        };

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    ///
    /// Comments and trailing commas are accepted.
    pub fn load_from_file(path: &Path) -> Result<LintConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            ProxyLintError::config_error(format!(
                "Cannot read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: LintConfig = json5::from_str(&content).map_err(|e| {
            ProxyLintError::config_error(format!("Invalid JSON in '{}': {}", path.display(), e))
        })?;
        config.validate()?;

        tracing::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Load the explicit config file, or discover one from `start_dir`
    ///
    /// Falls back to the default configuration when nothing is found.
    pub fn load(custom_path: Option<&Path>, start_dir: &Path) -> Result<LintConfig> {
        if let Some(path) = custom_path {
            return Self::load_from_file(path);
        }

        match Self::auto_discover(start_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!(
                    "No config found from {}, using defaults",
                    start_dir.display()
                );
                Ok(LintConfig::default())
            }
        }
    }

    /// Write the starter configuration into `dir`
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn init(dir: &Path, force: bool) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() && !force {
            return Err(ProxyLintError::config_error(format!(
                "'{}' already exists (use --force to overwrite)",
                path.display()
            )));
        }

        let content = serde_json::to_string_pretty(&LintConfig::starter()).map_err(|e| {
            ProxyLintError::internal_error(format!("Failed to serialize config: {e}"))
        })?;
        fs::write(&path, content + "\n")
            .map_err(|source| ProxyLintError::io_error(&path, source))?;

        tracing::info!("Wrote config to: {}", path.display());
        Ok(path)
    }
}
