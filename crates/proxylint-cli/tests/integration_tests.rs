//! Integration tests for the proxylint CLI
//!
//! These tests run the binary end-to-end against temporary projects. Remote
//! schema validation is always disabled so nothing touches the network.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const CLEAN_CONFIG: &str = r#"{
  "$schema": "https://raw.githubusercontent.com/dotnet/dev-proxy/main/schemas/v0.29.2/rc.schema.json",
  "plugins": [
    {
      "name": "RetryAfterPlugin",
      "enabled": true,
      "pluginPath": "~appFolder/plugins/DevProxy.Plugins.dll"
    }
  ],
  "urlsToWatch": ["https://api.example.com/*"]
}
"#;

const MISSING_CONFIG: &str = r#"{
  "plugins": [
    {
      "name": "GenericRandomErrorPlugin",
      "enabled": true,
      "pluginPath": "~appFolder/plugins/DevProxy.Plugins.dll"
    }
  ]
}
"#;

const NEEDS_LANGUAGE_MODEL: &str = r#"{
  "plugins": [
    {
      "name": "OpenAIMockResponsePlugin",
      "enabled": true,
      "pluginPath": "~appFolder/plugins/DevProxy.Plugins.dll"
    }
  ],
  "urlsToWatch": ["https://api.openai.com/*"]
}
"#;

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("proxylint").unwrap();
    cmd.env_remove("PROXYLINT_PROXY_VERSION")
        .env("NO_COLOR", "1")
        .arg("--no-remote-schemas");
    cmd
}

/// Temporary project holding a single `devproxyrc.json`
fn project_with(config: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("devproxyrc.json"), config).unwrap();
    temp_dir
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("lint"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_lint_clean_project() {
    let temp_dir = project_with(CLEAN_CONFIG);

    cli()
        .arg("lint")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"))
        .stdout(predicate::str::contains("Files checked: 1"));
}

#[test]
fn test_lint_reports_errors_with_exit_code() {
    let temp_dir = project_with(MISSING_CONFIG);

    cli()
        .arg("lint")
        .arg(temp_dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("devproxyrc.json:4:16: error [pluginConfigRequired]"))
        .stdout(predicate::str::contains("GenericRandomErrorPlugin"));
}

#[test]
fn test_lint_check_alias() {
    let temp_dir = project_with(CLEAN_CONFIG);

    cli().arg("check").arg(temp_dir.path()).assert().success();
}

#[test]
fn test_lint_json_output() {
    let temp_dir = project_with(MISSING_CONFIG);

    let output = cli()
        .args(["lint", "--format", "json"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["filesChecked"], 1);
    assert_eq!(report["summary"]["errors"], 1);
    assert_eq!(
        report["files"][0]["diagnostics"][0]["code"],
        "pluginConfigRequired"
    );
}

#[test]
fn test_lint_ignores_unrelated_json() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("package.json"), r#"{"name": "app"}"#).unwrap();

    cli()
        .arg("lint")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Files checked: 0"));
}

#[test]
fn test_lint_with_version_flag() {
    let config = r#"{
  "plugins": [
    {"name": "RetryAfterPlugin", "enabled": true, "pluginPath": "~appFolder/plugins/dev-proxy-plugins.dll"}
  ]
}
"#;
    let temp_dir = project_with(config);

    cli()
        .args(["lint", "--proxy-version", "0.28.0"])
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .args(["lint", "--proxy-version", "0.29.0"])
        .arg(temp_dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("deprecatedPluginPath"));
}

#[test]
fn test_lint_fix_applies_safe_fixes() {
    let temp_dir = project_with(NEEDS_LANGUAGE_MODEL);

    cli()
        .args(["lint", "--fix"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixes applied: 1"));

    let fixed = fs::read_to_string(temp_dir.path().join("devproxyrc.json")).unwrap();
    assert!(fixed.contains("\"languageModel\""));
    assert!(fixed.contains("\"enabled\": true"));
}

#[test]
fn test_lint_fix_with_byte_order_mark() {
    let config = "\u{feff}{\n  \"$schema\": \"https://raw.githubusercontent.com/dotnet/dev-proxy/main/schemas/v0.28.0/rc.schema.json\",\n  \"plugins\": []\n}\n";
    let temp_dir = project_with(config);

    cli()
        .args(["lint", "--fix"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixes applied: 1"));

    let fixed = fs::read_to_string(temp_dir.path().join("devproxyrc.json")).unwrap();
    let body = fixed.strip_prefix('\u{feff}').unwrap();
    let value: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(
        value["$schema"],
        "https://raw.githubusercontent.com/dotnet/dev-proxy/main/schemas/v0.29.2/rc.schema.json"
    );
}

#[test]
fn test_fix_prints_without_write() {
    let temp_dir = project_with(NEEDS_LANGUAGE_MODEL);
    let file = temp_dir.path().join("devproxyrc.json");

    cli()
        .args(["fix", "--code", "missingLanguageModel"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"languageModel\""));

    // Untouched without --write
    assert_eq!(fs::read_to_string(&file).unwrap(), NEEDS_LANGUAGE_MODEL);
}

#[test]
fn test_fix_write() {
    let temp_dir = project_with(NEEDS_LANGUAGE_MODEL);
    let file = temp_dir.path().join("devproxyrc.json");

    cli()
        .args(["fix", "--code", "missingLanguageModel", "--write"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 'Add languageModel configuration'"));

    assert!(fs::read_to_string(&file).unwrap().contains("\"languageModel\""));
}

#[test]
fn test_fix_without_matching_diagnostic() {
    let temp_dir = project_with(CLEAN_CONFIG);

    cli()
        .args(["fix", "--code", "missingLanguageModel"])
        .arg(temp_dir.path().join("devproxyrc.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No 'missingLanguageModel' diagnostic found"));
}

#[test]
fn test_fix_unknown_code() {
    let temp_dir = project_with(CLEAN_CONFIG);

    cli()
        .args(["fix", "--code", "notARealCode"])
        .arg(temp_dir.path().join("devproxyrc.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("notARealCode"));
}

#[test]
fn test_rules_command() {
    cli()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("plugin-config"))
        .stdout(predicate::str::contains("unknownConfigProperty"));
}

#[test]
fn test_rules_detailed() {
    cli()
        .args(["rules", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("missingLanguageModel has a quick fix"));
}

#[test]
fn test_config_init() {
    let temp_dir = TempDir::new().unwrap();

    cli()
        .args(["config", "init"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(".proxylintrc.json"));

    let content = fs::read_to_string(temp_dir.path().join(".proxylintrc.json")).unwrap();
    assert!(content.contains("\"devProxy\""));

    // A second init needs --force
    cli()
        .args(["config", "init"])
        .arg(temp_dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    cli()
        .args(["config", "init", "--force"])
        .arg(temp_dir.path())
        .assert()
        .success();
}

#[test]
fn test_config_schema() {
    cli()
        .args(["config", "schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Proxylint Configuration"));
}

#[test]
fn test_config_show_applies_flags() {
    let temp_dir = TempDir::new().unwrap();

    cli()
        .current_dir(temp_dir.path())
        .args(["config", "show", "--proxy-version", "0.30.0-beta.1", "--beta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.30.0-beta.1"))
        .stdout(predicate::str::contains("\"isBeta\": true"));
}

#[test]
fn test_rule_severity_override() {
    let temp_dir = project_with(MISSING_CONFIG);
    fs::write(
        temp_dir.path().join(".proxylintrc.json"),
        r#"{ "rules": { "pluginConfigRequired": "off" } }"#,
    )
    .unwrap();

    cli()
        .arg("lint")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_unknown_rule_in_config_fails() {
    let temp_dir = project_with(CLEAN_CONFIG);
    fs::write(
        temp_dir.path().join(".proxylintrc.json"),
        r#"{ "rules": { "noSuchRule": "off" } }"#,
    )
    .unwrap();

    cli()
        .arg("lint")
        .arg(temp_dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("noSuchRule"));
}
