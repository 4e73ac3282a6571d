//! Language model requirement rule

use proxylint_core::query::property;
use proxylint_core::{Diagnostic, DiagnosticCode, ObjectNode, to_range};

use super::PluginEntry;
use crate::engine::LintContext;

/// True only when `languageModel.enabled` is the literal `true`
pub fn is_language_model_enabled(root: &ObjectNode) -> bool {
    property(root, "languageModel")
        .and_then(|lm| lm.value.as_object())
        .and_then(|lm| property(lm, "enabled"))
        .and_then(|enabled| enabled.value.as_bool())
        .unwrap_or(false)
}

/// Enabled plugins that call a language model need `languageModel.enabled`
pub fn check_language_model_requirements(
    root: &ObjectNode,
    context: &LintContext<'_>,
) -> Vec<Diagnostic> {
    let Some(plugins) = PluginEntry::all(root) else {
        return Vec::new();
    };
    if is_language_model_enabled(root) {
        return Vec::new();
    }

    plugins
        .iter()
        .filter(|plugin| plugin.is_enabled())
        .filter_map(|plugin| {
            let name_node = plugin.name_property()?;
            let name = name_node.value.as_str()?;
            let entry = context.plugins.get(name)?;
            entry.requires_language_model.then(|| {
                Diagnostic::warning(
                    to_range(&name_node.value),
                    format!("{name} requires languageModel.enabled to be set to true."),
                    DiagnosticCode::MissingLanguageModel,
                )
            })
        })
        .collect()
}
