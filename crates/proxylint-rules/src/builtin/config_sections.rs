//! Orphaned config section rule

use proxylint_core::query::property;
use proxylint_core::{Diagnostic, DiagnosticCode, ObjectNode, SyntaxNode, to_range};

use super::PluginEntry;
use crate::engine::LintContext;

/// Object-valued root properties that are not sections
const NOT_A_SECTION: &[&str] = &["languageModel"];

/// Flag top-level objects that no plugin references through `configSection`
pub fn check_orphaned_config_sections(
    root: &ObjectNode,
    _context: &LintContext<'_>,
) -> Vec<Diagnostic> {
    let referenced: Vec<&str> = PluginEntry::all(root)
        .unwrap_or_default()
        .iter()
        .filter_map(|plugin| property(plugin.node, "configSection"))
        .filter_map(|section| section.value.as_str())
        .collect();

    root.children
        .iter()
        .filter(|prop| matches!(prop.value, SyntaxNode::Object(_)))
        .filter(|prop| !NOT_A_SECTION.contains(&prop.key.value.as_str()))
        .filter(|prop| !referenced.contains(&prop.key.value.as_str()))
        .map(|prop| {
            Diagnostic::warning(
                to_range(&prop.key),
                format!(
                    "Config section '{}' does not correspond to any plugin. Remove it or add a plugin with a matching configSection.",
                    prop.key.value
                ),
                DiagnosticCode::InvalidConfigSection,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxylint_core::{ToolInstall, parse};

    fn run(text: &str) -> Vec<Diagnostic> {
        let root = parse(text).unwrap();
        check_orphaned_config_sections(&root, &LintContext::bundled(ToolInstall::default()))
    }

    #[test]
    fn referenced_sections_are_fine() {
        let text = r#"{
  "plugins": [{"name": "MockResponsePlugin", "enabled": true, "configSection": "mocksPlugin"}],
  "mocksPlugin": {"mocksFile": "mocks.json"},
  "languageModel": {"enabled": true}
}"#;
        assert!(run(text).is_empty());
    }

    #[test]
    fn orphan_points_at_key() {
        let text = "{\n  \"plugins\": [],\n  \"leftover\": {}\n}";
        let diagnostics = run(text);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Config section 'leftover' does not correspond to any plugin. Remove it or add a plugin with a matching configSection."
        );
        assert_eq!(diagnostics[0].range.start.line, 2);
        assert_eq!(diagnostics[0].range.start.character, 2);
        assert_eq!(diagnostics[0].range.end.character, 12);
    }

    #[test]
    fn every_object_is_a_section_without_plugins() {
        let diagnostics = run(r#"{"a": {}, "b": [], "c": 1, "d": {"x": 1}}"#);
        let names: Vec<_> = diagnostics.iter().map(|d| d.message.clone()).collect();
        assert_eq!(names.len(), 2);
        assert!(names[0].contains("'a'"));
        assert!(names[1].contains("'d'"));
    }
}
