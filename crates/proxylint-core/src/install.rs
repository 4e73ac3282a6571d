//! Metadata about the installed Dev Proxy

use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use semver::Version;
use serde::{Deserialize, Serialize};

/// Plugin path that shipped before v0.29
pub const DEPRECATED_PLUGIN_PATH: &str = "~appFolder/plugins/dev-proxy-plugins.dll";

/// Replacement for [`DEPRECATED_PLUGIN_PATH`]
pub const CURRENT_PLUGIN_PATH: &str = "~appFolder/plugins/DevProxy.Plugins.dll";

/// First version in which [`DEPRECATED_PLUGIN_PATH`] is flagged
pub const PLUGIN_PATH_DEPRECATED_IN: &str = "0.29.0";

/// Version assumed when nothing else is configured
pub const DEFAULT_VERSION: &str = "0.29.2";

const SCHEMA_BASE_URL: &str = "https://raw.githubusercontent.com/dotnet/dev-proxy/main/schemas";

// A version only counts when it is the whole message of a log line, so
// versions embedded in file paths are ignored.
static VERSION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\w+\s+)?v?(\d+\.\d+\.\d+(?:-[0-9A-Za-z.]+)?)(?:\+[0-9A-Za-z.]+)?\s*$")
        .unwrap()
});

/// Installed tool version as reported by its detector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToolInstall {
    /// Semantic version, e.g. `0.29.2` or `0.30.0-beta.1`
    pub version: String,
    /// Whether the beta channel is installed
    #[serde(default)]
    pub is_beta: bool,
}

impl Default for ToolInstall {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION)
    }
}

impl ToolInstall {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            is_beta: false,
        }
    }

    pub fn beta(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            is_beta: true,
        }
    }

    /// Version string schema URLs are matched against
    ///
    /// Beta installs drop the pre-release suffix; stable installs are used
    /// as-is.
    pub fn comparable_version(&self) -> &str {
        if self.is_beta {
            self.version.split('-').next().unwrap_or(&self.version)
        } else {
            &self.version
        }
    }

    /// Config file schema URL matching this install
    pub fn schema_url(&self) -> String {
        format!(
            "{SCHEMA_BASE_URL}/v{}/rc.schema.json",
            self.comparable_version()
        )
    }

    /// Semver comparison against `minimum`; unparseable versions never qualify
    pub fn is_at_least(&self, minimum: &str) -> bool {
        match (
            Version::parse(self.version.trim_start_matches('v')),
            Version::parse(minimum),
        ) {
            (Ok(installed), Ok(minimum)) => installed >= minimum,
            _ => {
                tracing::debug!(
                    "Cannot compare version '{}' with '{}'",
                    self.version,
                    minimum
                );
                false
            }
        }
    }

    /// Version announced in the tool's console output, if any
    ///
    /// Build metadata is dropped. The first matching line wins.
    pub fn version_from_output(output: &str) -> Option<String> {
        output.lines().find_map(|line| {
            VERSION_LINE
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
    }
}
