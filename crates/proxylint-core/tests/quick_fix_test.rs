//! End-to-end quick fix application against realistic config files

use proxylint_core::{
    Diagnostic, DiagnosticCode, FixCommand, FixRequest, QuickFixProvider, TextRange, ToolInstall,
    apply_edits, find_property, parse, syntax::NodeKind, to_range,
};

const CONFIG: &str = r#"{
  "$schema": "https://raw.githubusercontent.com/dotnet/dev-proxy/main/schemas/v0.29.2/rc.schema.json",
  "plugins": [
    {
      "name": "OpenAIMockResponsePlugin",
      "enabled": true,
      "pluginPath": "~appFolder/plugins/DevProxy.Plugins.dll"
    }
  ],
  "urlsToWatch": [
    "https://api.openai.com/*"
  ]
}"#;

fn plugin_name_range(text: &str) -> TextRange {
    let root = parse(text).unwrap();
    let plugins = find_property(&root.children, NodeKind::Identifier, "plugins").unwrap();
    let plugin = plugins.value.as_array().unwrap().children[0]
        .as_object()
        .unwrap();
    let name = find_property(&plugin.children, NodeKind::Identifier, "name").unwrap();
    to_range(&name.value)
}

#[test]
fn test_language_model_fix_appends_last_property() {
    let range = plugin_name_range(CONFIG);
    let diagnostics = vec![Diagnostic::warning(
        range,
        "OpenAIMockResponsePlugin requires languageModel.enabled to be set to true.",
        DiagnosticCode::MissingLanguageModel,
    )];
    let provider = QuickFixProvider::bundled(ToolInstall::new("0.29.2"));
    let fixes = provider.fixes_for(&FixRequest::new(CONFIG, range, &diagnostics));

    assert_eq!(fixes.len(), 1);
    assert_eq!(fixes[0].title, "Add languageModel configuration");
    assert!(fixes[0].is_preferred);

    let fixed = apply_edits(CONFIG, &fixes[0].edits).unwrap();
    assert!(fixed.contains("  ],\n  \"languageModel\": {\n    \"enabled\": true\n  }\n}"));

    let value: serde_json::Value = serde_json::from_str(&fixed).unwrap();
    assert_eq!(value["languageModel"]["enabled"], serde_json::json!(true));
    let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys.last().map(String::as_str), Some("languageModel"));
}

#[test]
fn test_missing_section_fix_produces_valid_document() {
    let text = r#"{
  "plugins": [
    {
      "name": "MockResponsePlugin",
      "enabled": true,
      "pluginPath": "~appFolder/plugins/DevProxy.Plugins.dll",
      "configSection": "myMocks"
    }
  ]
}"#;
    let root = parse(text).unwrap();
    let plugins = find_property(&root.children, NodeKind::Identifier, "plugins").unwrap();
    let plugin = plugins.value.as_array().unwrap().children[0]
        .as_object()
        .unwrap();
    let section = find_property(&plugin.children, NodeKind::Identifier, "configSection").unwrap();
    let range = to_range(&section.value);

    let diagnostics = vec![Diagnostic::error(
        range,
        "myMocks config section is missing. Use 'devproxy-plugin-mock-response-config' snippet to create one.",
        DiagnosticCode::PluginConfigMissing,
    )];
    let provider = QuickFixProvider::bundled(ToolInstall::new("0.29.2"));
    let fixes = provider.fixes_for(&FixRequest::new(text, range, &diagnostics));

    assert_eq!(fixes.len(), 1);
    assert_eq!(fixes[0].title, "Add myMocks config section");
    assert_eq!(fixes[0].command, Some(FixCommand::FormatDocument));

    let fixed = apply_edits(text, &fixes[0].edits).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fixed).unwrap();
    assert!(value["myMocks"].is_object());
    assert!(value["myMocks"]["$schema"].is_string());
}

#[test]
fn test_bulk_plugin_path_fix_rewrites_every_occurrence() {
    let text = r#"{
  "plugins": [
    { "name": "LatencyPlugin", "enabled": true, "pluginPath": "~appFolder/plugins/dev-proxy-plugins.dll" },
    { "name": "RetryAfterPlugin", "enabled": true, "pluginPath": "~appFolder/plugins/dev-proxy-plugins.dll" }
  ]
}"#;
    let root = parse(text).unwrap();
    let plugins = find_property(&root.children, NodeKind::Identifier, "plugins").unwrap();
    let diagnostics: Vec<Diagnostic> = plugins
        .value
        .as_array()
        .unwrap()
        .children
        .iter()
        .map(|plugin| {
            let plugin = plugin.as_object().unwrap();
            let path = find_property(&plugin.children, NodeKind::Identifier, "pluginPath").unwrap();
            Diagnostic::error(
                to_range(&path.value),
                "deprecated",
                DiagnosticCode::DeprecatedPluginPath,
            )
        })
        .collect();

    let provider = QuickFixProvider::bundled(ToolInstall::new("0.29.0"));
    let fixes = provider.fixes_for(&FixRequest::new(text, diagnostics[1].range, &diagnostics));
    let bulk = fixes
        .iter()
        .find(|fix| fix.title == "Update all plugin paths")
        .unwrap();
    assert!(bulk.is_preferred);
    assert_eq!(fixes.iter().filter(|fix| fix.is_preferred).count(), 1);

    let fixed = apply_edits(text, &bulk.edits).unwrap();
    assert!(!fixed.contains("dev-proxy-plugins.dll"));
    assert_eq!(fixed.matches("DevProxy.Plugins.dll").count(), 2);
}
