//! Plugin presence, ordering and configuration rules

use proxylint_core::install::{
    CURRENT_PLUGIN_PATH, DEPRECATED_PLUGIN_PATH, PLUGIN_PATH_DEPRECATED_IN,
};
use proxylint_core::query::property;
use proxylint_core::{
    Diagnostic, DiagnosticCode, ObjectNode, PluginSnippetEntry, Severity, to_range,
};

use super::PluginEntry;
use crate::engine::LintContext;

const SUMMARY_PLUGINS: &[&str] = &["ExecutionSummaryPlugin", "UrlDiscoveryPlugin"];
const OPENAPI_SPEC_GENERATOR: &str = "OpenApiSpecGeneratorPlugin";
const API_CENTER_ONBOARDING: &str = "ApiCenterOnboardingPlugin";

fn severity_for(plugin: &PluginEntry<'_>) -> Severity {
    if plugin.is_enabled() {
        Severity::Error
    } else {
        Severity::Warning
    }
}

/// The `plugins` array must hold at least one enabled entry
pub fn check_enabled_plugins(root: &ObjectNode, _context: &LintContext<'_>) -> Vec<Diagnostic> {
    let Some(plugins) = property(root, "plugins") else {
        return Vec::new();
    };
    let Some(array) = plugins.value.as_array() else {
        return Vec::new();
    };

    let message = if array.children.is_empty() {
        "Add at least one plugin"
    } else if PluginEntry::all(root)
        .unwrap_or_default()
        .iter()
        .any(PluginEntry::is_enabled)
    {
        return Vec::new();
    } else {
        "At least one plugin must be enabled"
    };

    vec![Diagnostic::warning(
        to_range(&plugins.key),
        message,
        DiagnosticCode::NoEnabledPlugins,
    )]
}

/// The first reporter must not be followed by a non-reporter plugin
pub fn check_reporter_position(root: &ObjectNode, _context: &LintContext<'_>) -> Vec<Diagnostic> {
    let Some(plugins) = PluginEntry::all(root) else {
        return Vec::new();
    };
    let Some(reporter_index) = plugins.iter().position(PluginEntry::is_reporter) else {
        return Vec::new();
    };
    if plugins[reporter_index + 1..]
        .iter()
        .all(PluginEntry::is_reporter)
    {
        return Vec::new();
    }

    plugins[reporter_index]
        .name_property()
        .map(|name| {
            Diagnostic::warning(
                to_range(&name.value),
                "Reporters should be placed after other plugins.",
                DiagnosticCode::ReporterPosition,
            )
        })
        .into_iter()
        .collect()
}

/// A plugin's `configSection` must match what the plugin supports
///
/// Plugins missing from the catalog are never checked.
pub fn check_plugin_configurations(root: &ObjectNode, context: &LintContext<'_>) -> Vec<Diagnostic> {
    let Some(plugins) = PluginEntry::all(root) else {
        return Vec::new();
    };

    let mut diagnostics = Vec::new();
    for plugin in &plugins {
        let Some(name) = plugin.name() else {
            continue;
        };
        let Some(entry) = context.plugins.get(name) else {
            tracing::trace!("Skipping config checks for unknown plugin '{}'", name);
            continue;
        };
        diagnostics.extend(check_plugin_configuration(root, plugin, name, entry));
    }
    diagnostics
}

fn check_plugin_configuration(
    root: &ObjectNode,
    plugin: &PluginEntry<'_>,
    name: &str,
    entry: &PluginSnippetEntry,
) -> Option<Diagnostic> {
    let config_section = property(plugin.node, "configSection");

    let Some(config) = &entry.config else {
        // Plugins without settings must not point at a section
        return config_section.map(|section| {
            Diagnostic::new(
                to_range(section),
                format!("{name} does not require a config section."),
                severity_for(plugin),
                DiagnosticCode::PluginConfigNotRequired,
            )
        });
    };

    let Some(section) = config_section else {
        let name_node = plugin.name_property()?;
        return match config.required {
            Some(true) => Some(Diagnostic::new(
                to_range(&name_node.value),
                format!("{name} requires a config section."),
                severity_for(plugin),
                DiagnosticCode::PluginConfigRequired,
            )),
            Some(false) => Some(Diagnostic::information(
                to_range(&name_node.value),
                format!(
                    "{name} can be configured with a configSection. Use '{}' snippet to create one.",
                    config.name
                ),
                DiagnosticCode::PluginConfigOptional,
            )),
            None => None,
        };
    };

    let section_name = section.value.as_str()?;
    if property(root, section_name).is_some() {
        return None;
    }

    Some(Diagnostic::new(
        to_range(&section.value),
        format!(
            "{section_name} config section is missing. Use '{}' snippet to create one.",
            config.name
        ),
        severity_for(plugin),
        DiagnosticCode::PluginConfigMissing,
    ))
}

/// Summary plugins produce nothing without an enabled reporter
pub fn check_summary_without_reporter(
    root: &ObjectNode,
    _context: &LintContext<'_>,
) -> Vec<Diagnostic> {
    let Some(plugins) = PluginEntry::all(root) else {
        return Vec::new();
    };
    let Some(summary) = plugins.iter().find(|plugin| {
        plugin.is_enabled() && plugin.name().is_some_and(|name| SUMMARY_PLUGINS.contains(&name))
    }) else {
        return Vec::new();
    };
    if plugins
        .iter()
        .any(|plugin| plugin.is_reporter() && plugin.is_enabled())
    {
        return Vec::new();
    }

    summary
        .name_property()
        .map(|name| {
            Diagnostic::warning(
                to_range(&name.value),
                "Summary plugins should be used with a reporter plugin.",
                DiagnosticCode::SummaryWithoutReporter,
            )
        })
        .into_iter()
        .collect()
}

/// The OpenAPI generator must run before API Center onboarding
pub fn check_api_center_order(root: &ObjectNode, _context: &LintContext<'_>) -> Vec<Diagnostic> {
    let Some(plugins) = PluginEntry::all(root) else {
        return Vec::new();
    };
    let Some(generator_index) = plugins
        .iter()
        .position(|plugin| plugin.is_enabled() && plugin.name() == Some(OPENAPI_SPEC_GENERATOR))
    else {
        return Vec::new();
    };
    let onboarding_index = plugins
        .iter()
        .position(|plugin| plugin.name() == Some(API_CENTER_ONBOARDING));

    match onboarding_index {
        Some(index) if index < generator_index => plugins[generator_index]
            .name_property()
            .map(|name| {
                Diagnostic::warning(
                    to_range(&name.value),
                    "OpenApiSpecGeneratorPlugin should be placed before ApiCenterOnboardingPlugin.",
                    DiagnosticCode::ApiCenterPluginOrder,
                )
            })
            .into_iter()
            .collect(),
        _ => Vec::new(),
    }
}

/// Flag the pre-0.29 plugin assembly path on installs that no longer ship it
pub fn check_deprecated_plugin_path(
    root: &ObjectNode,
    context: &LintContext<'_>,
) -> Vec<Diagnostic> {
    if !context.install.is_at_least(PLUGIN_PATH_DEPRECATED_IN) {
        return Vec::new();
    }
    let Some(plugins) = PluginEntry::all(root) else {
        return Vec::new();
    };

    plugins
        .iter()
        .filter_map(|plugin| property(plugin.node, "pluginPath"))
        .filter(|path| path.value.as_str() == Some(DEPRECATED_PLUGIN_PATH))
        .map(|path| {
            Diagnostic::error(
                to_range(&path.value),
                format!(
                    "The pluginPath '{DEPRECATED_PLUGIN_PATH}' was deprecated in v0.29. Use '{CURRENT_PLUGIN_PATH}' instead."
                ),
                DiagnosticCode::DeprecatedPluginPath,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxylint_core::{ToolInstall, parse};

    fn context() -> LintContext<'static> {
        LintContext::bundled(ToolInstall::new("0.29.2"))
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<DiagnosticCode> {
        diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn empty_plugins_array() {
        let root = parse(r#"{"plugins": []}"#).unwrap();
        let diagnostics = check_enabled_plugins(&root, &context());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Add at least one plugin");
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        // Points at the "plugins" key, quotes included
        assert_eq!(diagnostics[0].range.start.character, 1);
        assert_eq!(diagnostics[0].range.end.character, 10);
    }

    #[test]
    fn no_enabled_plugin() {
        let root = parse(
            r#"{"plugins": [{"name": "LatencyPlugin", "enabled": false}, {"name": "RetryAfterPlugin"}]}"#,
        )
        .unwrap();
        let diagnostics = check_enabled_plugins(&root, &context());
        assert_eq!(diagnostics[0].message, "At least one plugin must be enabled");

        let root = parse(r#"{"plugins": [{"name": "LatencyPlugin", "enabled": true}]}"#).unwrap();
        assert!(check_enabled_plugins(&root, &context()).is_empty());
    }

    #[test]
    fn reporter_followed_by_plugin() {
        let root = parse(
            r#"{"plugins": [
  {"name": "PlainTextReporter", "enabled": true},
  {"name": "JsonReporter", "enabled": true},
  {"name": "LatencyPlugin", "enabled": true}
]}"#,
        )
        .unwrap();
        let diagnostics = check_reporter_position(&root, &context());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Reporters should be placed after other plugins.");
        assert_eq!(diagnostics[0].range.start.line, 1);
    }

    #[test]
    fn trailing_reporters_are_fine() {
        let root = parse(
            r#"{"plugins": [
  {"name": "LatencyPlugin", "enabled": true},
  {"name": "PlainTextReporter", "enabled": true},
  {"name": "MarkdownReporter", "enabled": true}
]}"#,
        )
        .unwrap();
        assert!(check_reporter_position(&root, &context()).is_empty());
    }

    #[test]
    fn required_config_missing_on_enabled_plugin() {
        let root = parse(r#"{"plugins": [{"name": "GenericRandomErrorPlugin", "enabled": true}]}"#)
            .unwrap();
        let diagnostics = check_plugin_configurations(&root, &context());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::PluginConfigRequired);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(
            diagnostics[0].message,
            "GenericRandomErrorPlugin requires a config section."
        );
    }

    #[test]
    fn disabled_plugins_downgrade_to_warning() {
        let root = parse(r#"{"plugins": [{"name": "GenericRandomErrorPlugin", "enabled": false}]}"#)
            .unwrap();
        let diagnostics = check_plugin_configurations(&root, &context());
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn config_not_required_points_at_property() {
        let text = r#"{"plugins": [{"name": "RetryAfterPlugin", "enabled": true, "configSection": "retry"}]}"#;
        let root = parse(text).unwrap();
        let diagnostics = check_plugin_configurations(&root, &context());
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::PluginConfigNotRequired]);
        assert_eq!(
            diagnostics[0].message,
            "RetryAfterPlugin does not require a config section."
        );
        let start = text.find("\"configSection\"").unwrap() as u32;
        assert_eq!(diagnostics[0].range.start.character, start);
        assert_eq!(diagnostics[0].range.end.character, start + r#""configSection": "retry""#.len() as u32);
    }

    #[test]
    fn optional_config_is_information() {
        let root = parse(r#"{"plugins": [{"name": "LatencyPlugin", "enabled": true}]}"#).unwrap();
        let diagnostics = check_plugin_configurations(&root, &context());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Information);
        assert_eq!(
            diagnostics[0].message,
            "LatencyPlugin can be configured with a configSection. Use 'devproxy-plugin-latency-config' snippet to create one."
        );
    }

    #[test]
    fn missing_section_body() {
        let text = r#"{"plugins": [{"name": "MockResponsePlugin", "enabled": true, "configSection": "mocksPlugin"}]}"#;
        let root = parse(text).unwrap();
        let diagnostics = check_plugin_configurations(&root, &context());
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::PluginConfigMissing]);
        assert_eq!(
            diagnostics[0].message,
            "mocksPlugin config section is missing. Use 'devproxy-plugin-mock-response-config' snippet to create one."
        );

        let text = r#"{"plugins": [{"name": "MockResponsePlugin", "enabled": true, "configSection": "mocksPlugin"}], "mocksPlugin": {}}"#;
        let root = parse(text).unwrap();
        assert!(check_plugin_configurations(&root, &context()).is_empty());
    }

    #[test]
    fn unknown_and_unnamed_plugins_are_skipped() {
        let root = parse(
            r#"{"plugins": [{"name": "ContosoPlugin", "enabled": true, "configSection": "nowhere"}, {"enabled": true}]}"#,
        )
        .unwrap();
        assert!(check_plugin_configurations(&root, &context()).is_empty());
    }

    #[test]
    fn summary_needs_enabled_reporter() {
        let root = parse(
            r#"{"plugins": [
  {"name": "ExecutionSummaryPlugin", "enabled": true},
  {"name": "PlainTextReporter", "enabled": false}
]}"#,
        )
        .unwrap();
        let diagnostics = check_summary_without_reporter(&root, &context());
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::SummaryWithoutReporter]);

        let root = parse(
            r#"{"plugins": [
  {"name": "UrlDiscoveryPlugin", "enabled": true},
  {"name": "PlainTextReporter", "enabled": true}
]}"#,
        )
        .unwrap();
        assert!(check_summary_without_reporter(&root, &context()).is_empty());
    }

    #[test]
    fn api_center_before_generator() {
        let root = parse(
            r#"{"plugins": [
  {"name": "ApiCenterOnboardingPlugin", "enabled": false},
  {"name": "OpenApiSpecGeneratorPlugin", "enabled": true}
]}"#,
        )
        .unwrap();
        let diagnostics = check_api_center_order(&root, &context());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range.start.line, 2);

        let root = parse(
            r#"{"plugins": [
  {"name": "OpenApiSpecGeneratorPlugin", "enabled": true},
  {"name": "ApiCenterOnboardingPlugin", "enabled": true}
]}"#,
        )
        .unwrap();
        assert!(check_api_center_order(&root, &context()).is_empty());
    }

    #[test]
    fn deprecated_path_is_version_gated() {
        let text = r#"{"plugins": [{"name": "LatencyPlugin", "enabled": true, "pluginPath": "~appFolder/plugins/dev-proxy-plugins.dll"}]}"#;
        let root = parse(text).unwrap();

        let current = LintContext::bundled(ToolInstall::new("0.29.0"));
        let diagnostics = check_deprecated_plugin_path(&root, &current);
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::DeprecatedPluginPath]);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(
            diagnostics[0].message,
            "The pluginPath '~appFolder/plugins/dev-proxy-plugins.dll' was deprecated in v0.29. Use '~appFolder/plugins/DevProxy.Plugins.dll' instead."
        );

        let old = LintContext::bundled(ToolInstall::new("0.28.0"));
        assert!(check_deprecated_plugin_path(&root, &old).is_empty());

        let garbage = LintContext::bundled(ToolInstall::new("latest"));
        assert!(check_deprecated_plugin_path(&root, &garbage).is_empty());
    }
}
