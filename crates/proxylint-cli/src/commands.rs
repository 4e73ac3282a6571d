//! CLI command implementations
//!
//! Top-level commands (lint, rules, lsp) are implemented in this file;
//! commands with more moving parts live in submodules:
//!   - commands/config.rs - Configuration management (init, schema, show)
//!   - commands/fix.rs - Quick fixes for single diagnostics

pub mod config;
pub mod fix;

use anyhow::Context;
use colored::*;
use proxylint_core::{
    ConfigLoader, Diagnostic, DiagnosticCode, FixRequest, LintConfig, QuickFixProvider,
    SchemaCache, ToolInstall, apply_edits,
};
use proxylint_rules::{BuiltinRules, DocumentKind, RuleEngine};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::files;
use crate::output::{FileReport, LintSummary, OutputFormatter};
use crate::{GlobalArgs, OutputFormat};

/// Codes `lint --fix` applies without asking
///
/// Scaffolding fixes for config sections are left to `proxylint fix`.
const SAFE_FIX_CODES: &[DiagnosticCode] = &[
    DiagnosticCode::InvalidSchema,
    DiagnosticCode::DeprecatedPluginPath,
    DiagnosticCode::MissingLanguageModel,
];

/// Upper bound on fix/re-lint rounds per file
const MAX_FIX_PASSES: usize = 10;

/// Load the config file and apply command-line overrides
pub fn resolve_config(global: &GlobalArgs, start: &Path) -> anyhow::Result<LintConfig> {
    let mut config = ConfigLoader::load(global.config.as_deref(), start)?;

    let detected = if global.detect_version {
        Some(detect_installed_version()?)
    } else {
        None
    };

    if let Some(version) = detected.as_ref().or(global.proxy_version.as_ref()) {
        config.dev_proxy.get_or_insert_with(Default::default).version = Some(version.clone());
    }
    if global.beta || detected.as_ref().is_some_and(|v| v.contains("-beta")) {
        config.dev_proxy.get_or_insert_with(Default::default).is_beta = Some(true);
    }
    if global.no_remote_schemas {
        config
            .schema_validation
            .get_or_insert_with(Default::default)
            .enabled = Some(false);
    }

    config.validate()?;
    Ok(config)
}

/// Version reported by `devproxy --version`
fn detect_installed_version() -> anyhow::Result<String> {
    let output = Command::new("devproxy")
        .arg("--version")
        .output()
        .context("Failed to run 'devproxy --version'; is Dev Proxy installed?")?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    let version = ToolInstall::version_from_output(&stdout)
        .with_context(|| format!("No version found in 'devproxy --version' output: {stdout}"))?;
    info!("Detected Dev Proxy v{}", version);
    Ok(version)
}

fn config_start(paths: &[PathBuf]) -> PathBuf {
    paths.first().cloned().unwrap_or_else(|| PathBuf::from("."))
}

/// Lint command implementation
///
/// Returns the process exit code: 1 when any error-level diagnostic remains.
pub async fn lint_command(
    paths: Vec<PathBuf>,
    format: OutputFormat,
    fix: bool,
    global: &GlobalArgs,
) -> anyhow::Result<i32> {
    debug!("Running lint command on paths: {:?}", paths);
    let config = resolve_config(global, &config_start(&paths))?;
    let engine = RuleEngine::from_config(&config)?;
    let fixes = QuickFixProvider::bundled(config.install());
    let schemas = if config.schema_validation_enabled() {
        Some(SchemaCache::http(config.fetch_timeout())?)
    } else {
        None
    };

    let start_time = Instant::now();
    let mut summary = LintSummary::default();
    let mut reports = Vec::new();

    for path in files::discover(&paths) {
        let mut text = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        let kind = DocumentKind::detect(&path, &text);
        if kind == DocumentKind::Other {
            debug!("Skipping {}: not a Dev Proxy file", path.display());
            continue;
        }

        if fix {
            let (fixed, applied) = apply_safe_fixes(&engine, &fixes, kind, &text);
            if applied > 0 {
                fs::write(&path, &fixed)
                    .with_context(|| format!("Cannot write '{}'", path.display()))?;
                info!("Applied {} fixes to {}", applied, path.display());
                summary.fixes_applied += applied;
                text = fixed;
            }
        }

        let diagnostics = engine.lint_document(kind, &text, schemas.as_ref()).await;
        summary.record(&diagnostics);
        reports.push(FileReport { path, diagnostics });
    }

    debug!("Linted {} files in {:?}", summary.files_checked, start_time.elapsed());
    if summary.files_checked == 0 {
        warn!("No Dev Proxy files found in {:?}", paths);
    }

    OutputFormatter::new(format).print_results(&reports, &summary)?;
    Ok(if summary.has_errors() { 1 } else { 0 })
}

fn lint_kind(engine: &RuleEngine<'_>, kind: DocumentKind, text: &str) -> Vec<Diagnostic> {
    match kind {
        DocumentKind::Config => engine.lint_sync(text),
        DocumentKind::Proxy => engine.lint_proxy_file(text),
        DocumentKind::Other => Vec::new(),
    }
}

/// Apply preferred fixes for safe codes until none are left
///
/// Each round fixes one diagnostic and re-lints, so edits never overlap.
fn apply_safe_fixes(
    engine: &RuleEngine<'_>,
    fixes: &QuickFixProvider<'_>,
    kind: DocumentKind,
    text: &str,
) -> (String, usize) {
    let mut text = text.to_string();
    let mut applied = 0;

    for _ in 0..MAX_FIX_PASSES {
        let diagnostics = lint_kind(engine, kind, &text);
        let next = diagnostics
            .iter()
            .filter(|d| SAFE_FIX_CODES.contains(&d.code))
            .find_map(|diagnostic| {
                let request = FixRequest {
                    text: &text,
                    range: diagnostic.range,
                    diagnostics: std::slice::from_ref(diagnostic),
                    all_diagnostics: &diagnostics,
                };
                fixes
                    .fixes_for(&request)
                    .into_iter()
                    .find(|fix| fix.is_preferred)
            });
        let Some(quick_fix) = next else {
            break;
        };

        match apply_edits(&text, &quick_fix.edits) {
            Ok(fixed) => {
                debug!("Applied fix: {}", quick_fix.title);
                text = fixed;
                applied += 1;
            }
            Err(e) => {
                warn!("Could not apply '{}': {}", quick_fix.title, e);
                break;
            }
        }
    }

    (text, applied)
}

/// Rules listing
pub fn rules_command(detailed: bool) -> anyhow::Result<i32> {
    println!("{}", "Built-in rules:".bold());
    for rule in BuiltinRules::all() {
        println!("  {} - {}", rule.name.green(), rule.description);
        if detailed {
            let codes: Vec<_> = rule.codes.iter().map(|code| code.as_str()).collect();
            println!("      codes: {}", codes.join(", ").dimmed());
            for code in rule.codes {
                if QuickFixProvider::is_fixable(*code) {
                    println!("      {} has a quick fix", code);
                }
            }
        }
    }

    println!("\n{}", "Config section schema checks:".bold());
    println!(
        "  {} - Config section properties must be known to the section schema",
        DiagnosticCode::UnknownConfigProperty.as_str().green()
    );
    println!(
        "  {} - Config section values must satisfy the section schema",
        DiagnosticCode::InvalidConfigValue.as_str().green()
    );
    Ok(0)
}

/// Language server over stdio
pub async fn lsp_command(global: &GlobalArgs) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir().context("Cannot determine the current directory")?;
    let config = resolve_config(global, &cwd)?;
    proxylint_lsp::run_server(&config).await?;
    Ok(0)
}
