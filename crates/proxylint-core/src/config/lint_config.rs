//! `.proxylintrc.json` configuration model

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::diagnostics::{DiagnosticCode, Severity};
use crate::install::{DEFAULT_VERSION, ToolInstall};
use crate::schema::DEFAULT_FETCH_TIMEOUT;
use crate::{ProxyLintError, Result};

/// Root configuration for proxylint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(title = "Proxylint Configuration")]
pub struct LintConfig {
    /// JSON Schema reference
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Installed Dev Proxy the configuration is linted against
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Installed Dev Proxy version")]
    pub dev_proxy: Option<DevProxyConfiguration>,

    /// Remote validation of config sections carrying their own `$schema`
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Validation of config sections against their remote schemas")]
    pub schema_validation: Option<SchemaValidationConfiguration>,

    /// Severity overrides keyed by diagnostic code
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Severity overrides keyed by diagnostic code, e.g. \"emptyUrlsToWatch\": \"off\"")]
    pub rules: Option<BTreeMap<String, RuleSeverity>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DevProxyConfiguration {
    /// Semantic version of the installed Dev Proxy
    #[schemars(description = "Semantic version, e.g. 0.29.2")]
    pub version: Option<String>,

    /// Whether the beta channel is installed
    pub is_beta: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchemaValidationConfiguration {
    /// Enable/disable fetching remote schemas
    pub enabled: Option<bool>,

    /// Timeout for a single schema download
    #[schemars(description = "Timeout in seconds for a single schema download")]
    pub timeout_seconds: Option<u64>,
}

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Disable the rule
    Off,
    /// Informational message
    Info,
    /// Warning
    Warn,
    /// Error (fails the lint run)
    Error,
}

impl RuleSeverity {
    /// Diagnostic severity, or `None` when the rule is off
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Off => None,
            RuleSeverity::Info => Some(Severity::Information),
            RuleSeverity::Warn => Some(Severity::Warning),
            RuleSeverity::Error => Some(Severity::Error),
        }
    }
}

impl LintConfig {
    /// Installed tool metadata, defaulting to the latest known release
    pub fn install(&self) -> ToolInstall {
        let dev_proxy = self.dev_proxy.clone().unwrap_or_default();
        ToolInstall {
            version: dev_proxy
                .version
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            is_beta: dev_proxy.is_beta.unwrap_or(false),
        }
    }

    pub fn schema_validation_enabled(&self) -> bool {
        self.schema_validation
            .as_ref()
            .and_then(|v| v.enabled)
            .unwrap_or(true)
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.schema_validation
            .as_ref()
            .and_then(|v| v.timeout_seconds)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_FETCH_TIMEOUT)
    }

    /// Parsed severity overrides
    pub fn severity_overrides(&self) -> Result<HashMap<DiagnosticCode, RuleSeverity>> {
        let Some(rules) = &self.rules else {
            return Ok(HashMap::new());
        };

        rules
            .iter()
            .map(|(code, severity)| {
                code.parse::<DiagnosticCode>()
                    .map(|code| (code, *severity))
                    .map_err(|err| ProxyLintError::config_error(err.to_string()))
            })
            .collect()
    }

    /// Check the configuration for unknown rule codes
    pub fn validate(&self) -> Result<()> {
        self.severity_overrides().map(|_| ())
    }

    /// Configuration written by `proxylint config init`
    pub fn starter() -> Self {
        Self {
            schema: None,
            dev_proxy: Some(DevProxyConfiguration {
                version: Some(DEFAULT_VERSION.to_string()),
                is_beta: Some(false),
            }),
            schema_validation: Some(SchemaValidationConfiguration {
                enabled: Some(true),
                timeout_seconds: Some(DEFAULT_FETCH_TIMEOUT.as_secs()),
            }),
            rules: Some(BTreeMap::from([(
                DiagnosticCode::PluginConfigOptional.to_string(),
                RuleSeverity::Info,
            )])),
        }
    }

    /// JSON Schema of the configuration file
    pub fn json_schema() -> Result<String> {
        serde_json::to_string_pretty(&schemars::schema_for!(LintConfig))
            .map_err(|e| ProxyLintError::internal_error(format!("Failed to render schema: {e}")))
    }
}
