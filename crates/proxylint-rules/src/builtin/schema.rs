//! Schema version compatibility rules

use proxylint_core::query::property;
use proxylint_core::{Diagnostic, DiagnosticCode, ObjectNode, to_range};

use crate::engine::LintContext;
use crate::schema_sections::config_sections;

/// Flag a document `$schema` that targets another Dev Proxy version
pub fn check_schema_compatibility(root: &ObjectNode, context: &LintContext<'_>) -> Vec<Diagnostic> {
    let Some(schema) = property(root, "$schema") else {
        return Vec::new();
    };
    let Some(url) = schema.value.as_str() else {
        return Vec::new();
    };

    let version = context.install.comparable_version();
    if url.contains(version) {
        return Vec::new();
    }

    vec![Diagnostic::warning(
        to_range(&schema.value),
        format!(
            "Schema version is not compatible with the installed version of Dev Proxy. Expected v{version}"
        ),
        DiagnosticCode::InvalidSchema,
    )]
}

/// Flag config sections whose own `$schema` targets another version
pub fn check_config_section_schemas(
    root: &ObjectNode,
    context: &LintContext<'_>,
) -> Vec<Diagnostic> {
    let version = context.install.comparable_version();

    config_sections(root)
        .filter_map(|section| {
            let schema = section.schema?;
            let url = schema.value.as_str()?;
            (!url.contains(version)).then(|| {
                Diagnostic::warning(
                    to_range(&schema.value),
                    format!(
                        "Config section schema version is not compatible with the installed version of Dev Proxy. Expected v{version}"
                    ),
                    DiagnosticCode::InvalidConfigSectionSchema,
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxylint_core::{ToolInstall, parse};

    fn run(text: &str, install: ToolInstall) -> Vec<Diagnostic> {
        let root = parse(text).unwrap();
        let context = LintContext::bundled(install);
        let mut diagnostics = check_schema_compatibility(&root, &context);
        diagnostics.extend(check_config_section_schemas(&root, &context));
        diagnostics
    }

    #[test]
    fn matching_schema_is_clean() {
        let text = r#"{"$schema": "https://raw.githubusercontent.com/dotnet/dev-proxy/main/schemas/v0.29.2/rc.schema.json"}"#;
        assert!(run(text, ToolInstall::new("0.29.2")).is_empty());
    }

    #[test]
    fn mismatched_schema_points_at_url_body() {
        let text = r#"{"$schema": "https://example.com/v0.28.0/rc.schema.json"}"#;
        let diagnostics = run(text, ToolInstall::new("0.29.2"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::InvalidSchema);
        assert_eq!(
            diagnostics[0].message,
            "Schema version is not compatible with the installed version of Dev Proxy. Expected v0.29.2"
        );
        // Range covers the URL without its quotes
        assert_eq!(diagnostics[0].range.start.character, 13);
        assert_eq!(
            diagnostics[0].range.end.character as usize,
            13 + "https://example.com/v0.28.0/rc.schema.json".len()
        );
    }

    #[test]
    fn beta_installs_compare_without_suffix() {
        let text = r#"{"$schema": "https://example.com/v0.30.0/rc.schema.json"}"#;
        assert!(run(text, ToolInstall::beta("0.30.0-beta.1")).is_empty());
        assert_eq!(run(text, ToolInstall::new("0.30.0-beta.1")).len(), 1);
    }

    #[test]
    fn config_section_schema_mismatch() {
        let text = r#"{
  "mocksPlugin": {
    "$schema": "https://example.com/v0.27.0/mockresponseplugin.schema.json",
    "mocksFile": "mocks.json"
  },
  "languageModel": { "$schema": "https://example.com/v0.27.0/lm.schema.json" }
}"#;
        let diagnostics = run(text, ToolInstall::new("0.29.2"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::InvalidConfigSectionSchema);
        assert_eq!(diagnostics[0].range.start.line, 2);
    }

    #[test]
    fn non_string_schema_is_ignored() {
        assert!(run(r#"{"$schema": 1, "x": {"$schema": true}}"#, ToolInstall::default()).is_empty());
    }
}
