//! Linter configuration
//!
//! proxylint reads an optional `.proxylintrc.json` (JSONC) discovered by
//! walking up from the linted path:
//!
//! ```jsonc
//! {
//!   "devProxy": { "version": "0.29.2", "isBeta": false },
//!   "schemaValidation": { "enabled": true, "timeoutSeconds": 10 },
//!   "rules": {
//!     "pluginConfigOptional": "off",
//!     "emptyUrlsToWatch": "error"
//!   }
//! }
//! ```

mod lint_config;
mod loader;

pub use lint_config::{
    DevProxyConfiguration, LintConfig, RuleSeverity, SchemaValidationConfiguration,
};
pub use loader::{CONFIG_FILE_NAME, CONFIG_FILE_NAMES, ConfigLoader};
