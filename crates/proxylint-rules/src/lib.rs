//! Proxylint Rules
//!
//! Built-in rules and the two-phase rule engine for Dev Proxy config files.
//! Synchronous rules inspect the parsed document directly; the asynchronous
//! phase validates config sections against the schemas they reference.

pub mod builtin;
pub mod engine;
pub mod schema_sections;

// Re-export commonly used types
pub use builtin::{BuiltinRules, RuleDescriptor};
pub use engine::{DiagnosticSink, DocumentKind, LintContext, RuleEngine};
pub use schema_sections::{RESERVED_PROPERTIES, config_sections};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
