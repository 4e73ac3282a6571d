//! Rule engine implementation
//!
//! Linting a config file runs in two phases. The synchronous phase parses the
//! document and runs every built-in rule; its result is published at once.
//! The asynchronous phase validates config sections against their remote
//! schemas and, when it finds anything, publishes the union of both phases.

use async_trait::async_trait;
use proxylint_core::{
    Diagnostic, DiagnosticCode, LintConfig, ObjectNode, PluginCatalog, Result, ResultExt,
    RuleSeverity, SchemaCache, ToolInstall, is_config_file, is_proxy_file, parse,
};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::builtin::{BuiltinRules, RuleDescriptor, schema};
use crate::schema_sections;

/// Inputs shared by every rule
#[derive(Debug, Clone)]
pub struct LintContext<'a> {
    pub install: ToolInstall,
    pub plugins: &'a PluginCatalog,
    /// Severity overrides keyed by code; `off` drops the diagnostic
    pub overrides: HashMap<DiagnosticCode, RuleSeverity>,
}

impl LintContext<'static> {
    /// Context backed by the bundled plugin catalog
    pub fn bundled(install: ToolInstall) -> Self {
        Self::new(install, PluginCatalog::bundled())
    }
}

impl<'a> LintContext<'a> {
    pub fn new(install: ToolInstall, plugins: &'a PluginCatalog) -> Self {
        Self {
            install,
            plugins,
            overrides: HashMap::new(),
        }
    }

    pub fn with_overrides(mut self, overrides: HashMap<DiagnosticCode, RuleSeverity>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Apply configured severities, dropping diagnostics whose code is off
    pub fn apply_overrides(&self, diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        if self.overrides.is_empty() {
            return diagnostics;
        }

        diagnostics
            .into_iter()
            .filter_map(|diagnostic| match self.overrides.get(&diagnostic.code) {
                Some(severity) => severity
                    .to_severity()
                    .map(|severity| diagnostic.with_severity(severity)),
                None => Some(diagnostic),
            })
            .collect()
    }
}

/// What kind of Dev Proxy file a document is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// A `devproxyrc`-style config file; every rule applies
    Config,
    /// Another Dev Proxy file (mocks, error responses, ...); only the schema
    /// version is checked
    Proxy,
    /// Not a Dev Proxy file
    Other,
}

impl DocumentKind {
    pub fn detect(path: &Path, text: &str) -> Self {
        if is_config_file(path, text) {
            DocumentKind::Config
        } else if is_proxy_file(text) {
            DocumentKind::Proxy
        } else {
            DocumentKind::Other
        }
    }
}

/// Receiver for published diagnostic sets
///
/// Every call replaces the previously published set for the document.
#[async_trait]
pub trait DiagnosticSink: Send + Sync {
    async fn publish(&self, diagnostics: Vec<Diagnostic>);
}

/// Runs the built-in rules against documents
#[derive(Debug, Clone)]
pub struct RuleEngine<'a> {
    context: LintContext<'a>,
    rules: Vec<RuleDescriptor>,
}

impl RuleEngine<'static> {
    /// Engine with the bundled catalog and no overrides
    pub fn bundled(install: ToolInstall) -> Self {
        Self::new(LintContext::bundled(install))
    }

    /// Engine configured from a `.proxylintrc.json`
    pub fn from_config(config: &LintConfig) -> Result<Self> {
        let context =
            LintContext::bundled(config.install()).with_overrides(config.severity_overrides()?);
        Ok(Self::new(context))
    }
}

impl<'a> RuleEngine<'a> {
    pub fn new(context: LintContext<'a>) -> Self {
        Self {
            context,
            rules: BuiltinRules::all(),
        }
    }

    pub fn context(&self) -> &LintContext<'a> {
        &self.context
    }

    pub fn rules(&self) -> &[RuleDescriptor] {
        &self.rules
    }

    /// Run every rule against an already parsed document
    pub fn check(&self, root: &ObjectNode) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for rule in &self.rules {
            let found = rule.run(root, &self.context);
            if !found.is_empty() {
                debug!("Rule '{}' produced {} diagnostics", rule.name, found.len());
            }
            diagnostics.extend(found);
        }
        self.context.apply_overrides(diagnostics)
    }

    /// Synchronous phase; a document that does not parse yields nothing
    pub fn lint_sync(&self, text: &str) -> Vec<Diagnostic> {
        parse(text)
            .log_and_continue()
            .map(|root| self.check(&root))
            .unwrap_or_default()
    }

    /// Lint a non-config Dev Proxy file: only its schema version is checked
    pub fn lint_proxy_file(&self, text: &str) -> Vec<Diagnostic> {
        let Some(root) = parse(text).log_and_continue() else {
            return Vec::new();
        };
        self.context
            .apply_overrides(schema::check_schema_compatibility(&root, &self.context))
    }

    /// Asynchronous phase: validate config sections against their schemas
    pub async fn lint_schema_sections(&self, text: &str, cache: &SchemaCache) -> Vec<Diagnostic> {
        let Some(root) = parse(text).log_and_continue() else {
            return Vec::new();
        };
        let diagnostics = schema_sections::lint_schema_sections(&root, cache).await;
        self.context.apply_overrides(diagnostics)
    }

    /// Two-phase lint of a config file
    ///
    /// The synchronous set is published first. The union with the schema
    /// phase is published only when that phase found something. Returns the
    /// last published set.
    pub async fn lint(
        &self,
        text: &str,
        cache: Option<&SchemaCache>,
        sink: &dyn DiagnosticSink,
    ) -> Vec<Diagnostic> {
        let mut diagnostics = self.lint_sync(text);
        sink.publish(diagnostics.clone()).await;

        let Some(cache) = cache else {
            return diagnostics;
        };
        let section_diagnostics = self.lint_schema_sections(text, cache).await;
        if !section_diagnostics.is_empty() {
            diagnostics.extend(section_diagnostics);
            sink.publish(diagnostics.clone()).await;
        }
        diagnostics
    }

    /// Lint any document according to its kind, without intermediate publishing
    pub async fn lint_document(
        &self,
        kind: DocumentKind,
        text: &str,
        cache: Option<&SchemaCache>,
    ) -> Vec<Diagnostic> {
        match kind {
            DocumentKind::Config => {
                let mut diagnostics = self.lint_sync(text);
                if let Some(cache) = cache {
                    diagnostics.extend(self.lint_schema_sections(text, cache).await);
                }
                diagnostics
            }
            DocumentKind::Proxy => self.lint_proxy_file(text),
            DocumentKind::Other => Vec::new(),
        }
    }
}
