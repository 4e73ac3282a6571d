//! Proxylint Core
//!
//! Core engine for linting Dev Proxy configuration files.
//! This crate provides the position-aware JSONC syntax tree, the mapping
//! from tree locations to editor ranges, the static plugin and snippet
//! reference data, remote schema caching and validation, and the quick-fix
//! synthesizer. The rule set itself lives in `proxylint-rules`.

pub mod autofix;
pub mod config;
pub mod detect;
pub mod diagnostics;
pub mod edit;
pub mod error;
pub mod install;
pub mod plugins;
pub mod position;
pub mod query;
pub mod result;
pub mod schema;
pub mod snippets;
pub mod syntax;

// Re-export commonly used types
pub use autofix::{FixCommand, FixRequest, QuickFix, QuickFixProvider};
pub use config::{
    ConfigLoader, DevProxyConfiguration, LintConfig, RuleSeverity, SchemaValidationConfiguration,
};
pub use detect::{is_config_file, is_proxy_file};
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use edit::{TextEdit, apply_edits};
pub use error::{ErrorKind, ProxyLintError};
pub use install::ToolInstall;
pub use plugins::{PluginCatalog, PluginConfig, PluginSnippetEntry};
pub use position::{LineIndex, Position, TextRange, to_end_position, to_range, to_start_position};
pub use query::{find_node_by_pointer, find_property};
pub use result::{Result, ResultExt};
pub use schema::{
    HttpSchemaFetcher, SchemaCache, SchemaFetcher, SchemaValidationResult, ValidationError,
    project, validate_against_schema,
};
pub use snippets::{Snippet, SnippetCatalog};
pub use syntax::{NodeKind, NodeRef, ObjectNode, PropertyNode, SyntaxNode, parse};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("proxylint=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
