//! Conversions between lint types and LSP types

use std::collections::HashMap;

use proxylint_core::diagnostics::DIAGNOSTIC_SOURCE;
use proxylint_core::{Diagnostic, Position, QuickFix, Severity, TextEdit, TextRange};
use tower_lsp::lsp_types;
use tower_lsp::lsp_types::{
    CodeAction, CodeActionKind, CodeDescription, Command, DiagnosticSeverity, NumberOrString, Url,
    WorkspaceEdit,
};

pub fn to_lsp_position(position: Position) -> lsp_types::Position {
    lsp_types::Position::new(position.line, position.character)
}

pub fn from_lsp_position(position: lsp_types::Position) -> Position {
    Position::new(position.line, position.character)
}

pub fn to_lsp_range(range: TextRange) -> lsp_types::Range {
    lsp_types::Range::new(to_lsp_position(range.start), to_lsp_position(range.end))
}

pub fn from_lsp_range(range: lsp_types::Range) -> TextRange {
    TextRange::new(from_lsp_position(range.start), from_lsp_position(range.end))
}

pub fn to_lsp_severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Information => DiagnosticSeverity::INFORMATION,
        Severity::Hint => DiagnosticSeverity::HINT,
    }
}

fn from_lsp_severity(severity: Option<DiagnosticSeverity>) -> Severity {
    match severity {
        Some(s) if s == DiagnosticSeverity::ERROR => Severity::Error,
        Some(s) if s == DiagnosticSeverity::INFORMATION => Severity::Information,
        Some(s) if s == DiagnosticSeverity::HINT => Severity::Hint,
        _ => Severity::Warning,
    }
}

pub fn to_lsp_diagnostic(diagnostic: &Diagnostic) -> lsp_types::Diagnostic {
    lsp_types::Diagnostic {
        range: to_lsp_range(diagnostic.range),
        severity: Some(to_lsp_severity(diagnostic.severity)),
        code: Some(NumberOrString::String(diagnostic.code.as_str().to_string())),
        code_description: Url::parse(&diagnostic.code.docs_url())
            .ok()
            .map(|href| CodeDescription { href }),
        source: Some(diagnostic.source.clone()),
        message: diagnostic.message.clone(),
        ..Default::default()
    }
}

/// Recover a lint diagnostic sent back by the client
///
/// Diagnostics from other sources, or with codes this server never emits,
/// are ignored.
pub fn from_lsp_diagnostic(diagnostic: &lsp_types::Diagnostic) -> Option<Diagnostic> {
    if diagnostic
        .source
        .as_deref()
        .is_some_and(|source| source != DIAGNOSTIC_SOURCE)
    {
        return None;
    }
    let NumberOrString::String(code) = diagnostic.code.as_ref()? else {
        return None;
    };

    Some(Diagnostic::new(
        from_lsp_range(diagnostic.range),
        diagnostic.message.clone(),
        from_lsp_severity(diagnostic.severity),
        code.parse().ok()?,
    ))
}

pub fn to_lsp_text_edit(edit: &TextEdit) -> lsp_types::TextEdit {
    lsp_types::TextEdit::new(to_lsp_range(edit.range), edit.new_text.clone())
}

/// A quick fix as a code action editing the document at `uri`
pub fn to_code_action(fix: &QuickFix, uri: &Url) -> CodeAction {
    let edits = fix.edits.iter().map(to_lsp_text_edit).collect();

    CodeAction {
        title: fix.title.clone(),
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: Some(fix.diagnostics.iter().map(to_lsp_diagnostic).collect()),
        edit: Some(WorkspaceEdit {
            changes: Some(HashMap::from([(uri.clone(), edits)])),
            ..Default::default()
        }),
        command: fix.command.map(|command| Command {
            title: command.title().to_string(),
            command: command.command_id().to_string(),
            arguments: None,
        }),
        is_preferred: Some(fix.is_preferred),
        ..Default::default()
    }
}
