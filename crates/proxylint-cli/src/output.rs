//! Output formatting and reporting

use colored::*;
use proxylint_core::{Diagnostic, Severity};
use serde::Serialize;
use std::path::PathBuf;

use crate::OutputFormat;

/// Summary statistics for linting results
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintSummary {
    pub files_checked: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    pub fixes_applied: usize,
}

impl LintSummary {
    pub fn record(&mut self, diagnostics: &[Diagnostic]) {
        self.files_checked += 1;
        for diagnostic in diagnostics {
            match diagnostic.severity {
                Severity::Error => self.errors += 1,
                Severity::Warning => self.warnings += 1,
                Severity::Information | Severity::Hint => self.info += 1,
            }
        }
    }

    pub fn total_issues(&self) -> usize {
        self.errors + self.warnings + self.info
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

/// Diagnostics of one linted file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: &'a [FileReport],
    summary: &'a LintSummary,
}

/// Output formatter for different formats
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format and print linting results
    pub fn print_results(&self, reports: &[FileReport], summary: &LintSummary) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => {
                self.print_human_format(reports, summary);
                Ok(())
            }
            OutputFormat::Json => {
                let report = JsonReport {
                    files: reports,
                    summary,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
                Ok(())
            }
        }
    }

    fn print_human_format(&self, reports: &[FileReport], summary: &LintSummary) {
        for report in reports {
            for diagnostic in &report.diagnostics {
                println!("{}", format_diagnostic(report, diagnostic));
            }
        }

        if summary.total_issues() == 0 {
            println!("{} No issues found", "✓".green());
        }

        println!("\n{}", "Summary:".bold());
        println!("  Files checked: {}", summary.files_checked);
        if summary.errors > 0 {
            println!("  Errors: {}", summary.errors.to_string().red());
        }
        if summary.warnings > 0 {
            println!("  Warnings: {}", summary.warnings.to_string().yellow());
        }
        if summary.info > 0 {
            println!("  Info: {}", summary.info.to_string().blue());
        }
        if summary.fixes_applied > 0 {
            println!("  Fixes applied: {}", summary.fixes_applied.to_string().green());
        }
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    let label = severity.to_string();
    match severity {
        Severity::Error => label.red().bold(),
        Severity::Warning => label.yellow().bold(),
        Severity::Information => label.blue().bold(),
        Severity::Hint => label.cyan(),
    }
}

/// `path:line:col: severity [code] message` with 1-based coordinates
fn format_diagnostic(report: &FileReport, diagnostic: &Diagnostic) -> String {
    format!(
        "{}:{}: {} {} {}",
        report.path.display(),
        diagnostic.range.start,
        severity_label(diagnostic.severity),
        format!("[{}]", diagnostic.code).dimmed(),
        diagnostic.message
    )
}
