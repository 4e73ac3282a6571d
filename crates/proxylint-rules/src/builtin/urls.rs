//! Watched URL rules

use proxylint_core::query::property;
use proxylint_core::{Diagnostic, DiagnosticCode, ObjectNode, to_range};

use crate::engine::LintContext;

pub fn check_urls_to_watch(root: &ObjectNode, _context: &LintContext<'_>) -> Vec<Diagnostic> {
    let Some(urls) = property(root, "urlsToWatch") else {
        return Vec::new();
    };
    match urls.value.as_array() {
        Some(array) if array.children.is_empty() => vec![Diagnostic::information(
            to_range(&urls.key),
            "urlsToWatch is empty. Add URLs to intercept requests.",
            DiagnosticCode::EmptyUrlsToWatch,
        )],
        _ => Vec::new(),
    }
}
