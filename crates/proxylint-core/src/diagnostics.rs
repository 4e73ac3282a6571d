//! Diagnostic types produced by the lint rules
//!
//! Diagnostics carry a stable string [`DiagnosticCode`] so a host can match a
//! diagnostic back to its quick-fix provider purely by code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::position::TextRange;

/// Base URL for per-code documentation
pub const DIAGNOSTICS_DOCS_URL: &str = "https://aka.ms/devproxy/diagnostics";

/// Source tag attached to every diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "proxylint";

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Hint,
    Information,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Hint => "hint",
            Severity::Information => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

macro_rules! diagnostic_codes {
    ($($variant:ident => $code:literal),+ $(,)?) => {
        /// Stable identifiers for every diagnostic the linter emits
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum DiagnosticCode {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl DiagnosticCode {
            pub const ALL: &'static [DiagnosticCode] = &[$(DiagnosticCode::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(DiagnosticCode::$variant => $code,)+
                }
            }
        }

        impl FromStr for DiagnosticCode {
            type Err = UnknownDiagnosticCode;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok(DiagnosticCode::$variant),)+
                    other => Err(UnknownDiagnosticCode(other.to_string())),
                }
            }
        }
    };
}

diagnostic_codes! {
    InvalidSchema => "invalidSchema",
    InvalidConfigSectionSchema => "invalidConfigSectionSchema",
    NoEnabledPlugins => "noEnabledPlugins",
    ReporterPosition => "reporterPosition",
    PluginConfigRequired => "pluginConfigRequired",
    PluginConfigNotRequired => "pluginConfigNotRequired",
    PluginConfigOptional => "pluginConfigOptional",
    PluginConfigMissing => "pluginConfigMissing",
    SummaryWithoutReporter => "summaryWithoutReporter",
    ApiCenterPluginOrder => "apiCenterPluginOrder",
    DeprecatedPluginPath => "deprecatedPluginPath",
    MissingLanguageModel => "missingLanguageModel",
    EmptyUrlsToWatch => "emptyUrlsToWatch",
    InvalidConfigSection => "invalidConfigSection",
    UnknownConfigProperty => "unknownConfigProperty",
    InvalidConfigValue => "invalidConfigValue",
}

impl DiagnosticCode {
    /// Documentation link for this code
    pub fn docs_url(&self) -> String {
        format!("{DIAGNOSTICS_DOCS_URL}#{}", self.as_str().to_lowercase())
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized code string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown diagnostic code '{0}'")]
pub struct UnknownDiagnosticCode(pub String);

/// A single lint finding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub range: TextRange,
    pub message: String,
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub source: String,
}

impl Diagnostic {
    pub fn new(
        range: TextRange,
        message: impl Into<String>,
        severity: Severity,
        code: DiagnosticCode,
    ) -> Self {
        Self {
            range,
            message: message.into(),
            severity,
            code,
            source: DIAGNOSTIC_SOURCE.to_string(),
        }
    }

    pub fn error(range: TextRange, message: impl Into<String>, code: DiagnosticCode) -> Self {
        Self::new(range, message, Severity::Error, code)
    }

    pub fn warning(range: TextRange, message: impl Into<String>, code: DiagnosticCode) -> Self {
        Self::new(range, message, Severity::Warning, code)
    }

    pub fn information(range: TextRange, message: impl Into<String>, code: DiagnosticCode) -> Self {
        Self::new(range, message, Severity::Information, code)
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] {}",
            self.range.start, self.severity, self.code, self.message
        )
    }
}

/// First diagnostic with the given code, optionally intersecting `range`
pub fn find_by_code<'a>(
    diagnostics: &'a [Diagnostic],
    code: DiagnosticCode,
    range: Option<&TextRange>,
) -> Option<&'a Diagnostic> {
    diagnostics
        .iter()
        .find(|d| d.code == code && range.is_none_or(|r| d.range.intersects(r)))
}

/// All diagnostics with the given code
pub fn filter_by_code(diagnostics: &[Diagnostic], code: DiagnosticCode) -> Vec<&Diagnostic> {
    diagnostics.iter().filter(|d| d.code == code).collect()
}
