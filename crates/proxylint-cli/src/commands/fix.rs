//! Fix command: apply the quick fix for a single diagnostic

use anyhow::{Context, bail};
use colored::*;
use proxylint_core::{
    Diagnostic, DiagnosticCode, FixRequest, Position, QuickFixProvider, apply_edits,
};
use proxylint_rules::{DocumentKind, RuleEngine};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

use super::resolve_config;
use crate::GlobalArgs;

/// Fix the diagnostic with `code`, optionally the one at a 1-based `position`
///
/// Prints the fixed document unless `write` is set. Returns 1 when there is
/// nothing to fix.
pub async fn fix_command(
    file: PathBuf,
    code: &str,
    position: Option<(u32, u32)>,
    write: bool,
    global: &GlobalArgs,
) -> anyhow::Result<i32> {
    let code = DiagnosticCode::from_str(code)
        .with_context(|| format!("Fixable codes: {}", valid_codes()))?;
    if !QuickFixProvider::is_fixable(code) {
        bail!("'{}' has no quick fix", code);
    }

    let config = resolve_config(global, &file)?;
    let text = fs::read_to_string(&file)
        .with_context(|| format!("Cannot read '{}'", file.display()))?;

    let engine = RuleEngine::from_config(&config)?;
    let diagnostics = match DocumentKind::detect(&file, &text) {
        DocumentKind::Config => engine.lint_sync(&text),
        DocumentKind::Proxy => engine.lint_proxy_file(&text),
        DocumentKind::Other => bail!("'{}' is not a Dev Proxy file", file.display()),
    };

    let Some(target) = select_diagnostic(&diagnostics, code, position) else {
        println!("No '{}' diagnostic found in {}", code, file.display());
        return Ok(1);
    };
    debug!("Fixing {} at {}", code, target.range.start);

    let fixes = QuickFixProvider::bundled(config.install());
    let request = FixRequest {
        text: &text,
        range: target.range,
        diagnostics: std::slice::from_ref(target),
        all_diagnostics: &diagnostics,
    };
    let candidates = fixes.fixes_for_code(code, &request);
    let Some(quick_fix) = candidates
        .iter()
        .find(|fix| fix.is_preferred)
        .or_else(|| candidates.first())
    else {
        println!("No fix available for '{}' in {}", code, file.display());
        return Ok(1);
    };

    let fixed = apply_edits(&text, &quick_fix.edits)?;
    if write {
        fs::write(&file, &fixed).with_context(|| format!("Cannot write '{}'", file.display()))?;
        println!(
            "{} Applied '{}' to {}",
            "✓".green(),
            quick_fix.title,
            file.display()
        );
        if quick_fix.command.is_some() {
            println!("  Run your editor's Format Document to tidy the inserted text");
        }
    } else {
        print!("{fixed}");
    }
    Ok(0)
}

/// First diagnostic with `code`, at `position` when given
fn select_diagnostic(
    diagnostics: &[Diagnostic],
    code: DiagnosticCode,
    position: Option<(u32, u32)>,
) -> Option<&Diagnostic> {
    let position = position.map(|(line, character)| {
        Position::new(line.saturating_sub(1), character.saturating_sub(1))
    });

    diagnostics
        .iter()
        .filter(|d| d.code == code)
        .find(|d| position.is_none_or(|pos| d.range.contains(pos)))
}

fn valid_codes() -> String {
    QuickFixProvider::fixable_codes()
        .map(|code| code.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
