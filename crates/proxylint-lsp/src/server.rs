//! LSP server implementation for Dev Proxy config files
//!
//! Documents are synced in full. Every open or change runs a lint pass that
//! publishes the synchronous diagnostics at once and, when remote schemas
//! report anything, the union with the schema diagnostics afterwards.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use proxylint_core::{
    Diagnostic, FixRequest, LintConfig, QuickFixProvider, SchemaCache, ToolInstall,
};
use proxylint_rules::{DiagnosticSink, DocumentKind, RuleEngine};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, info};

use crate::convert::{from_lsp_diagnostic, from_lsp_range, to_code_action, to_lsp_diagnostic};

/// Everything a lint pass needs, built once at startup
pub struct LintSession {
    pub engine: RuleEngine<'static>,
    pub fixes: QuickFixProvider<'static>,
    /// `None` when remote schema validation is disabled
    pub schemas: Option<Arc<SchemaCache>>,
}

impl LintSession {
    pub fn from_config(config: &LintConfig) -> proxylint_core::Result<Self> {
        let schemas = if config.schema_validation_enabled() {
            Some(Arc::new(SchemaCache::http(config.fetch_timeout())?))
        } else {
            None
        };

        Ok(Self {
            engine: RuleEngine::from_config(config)?,
            fixes: QuickFixProvider::bundled(config.install()),
            schemas,
        })
    }

    /// Session without remote schemas
    pub fn offline(install: ToolInstall) -> Self {
        Self {
            engine: RuleEngine::bundled(install.clone()),
            fixes: QuickFixProvider::bundled(install),
            schemas: None,
        }
    }
}

#[derive(Debug, Clone)]
struct OpenDocument {
    text: String,
    version: i32,
}

/// Proxylint Language Server
pub struct ProxyLintLanguageServer {
    client: Client,
    session: LintSession,
    documents: DashMap<Url, OpenDocument>,
    published: DashMap<Url, Vec<Diagnostic>>,
}

/// Publishes one lint pass for one document version
struct ClientSink<'a> {
    client: &'a Client,
    documents: &'a DashMap<Url, OpenDocument>,
    published: &'a DashMap<Url, Vec<Diagnostic>>,
    uri: Url,
    version: i32,
}

impl ClientSink<'_> {
    fn is_current(&self) -> bool {
        self.documents
            .get(&self.uri)
            .is_some_and(|doc| doc.version == self.version)
    }
}

#[async_trait]
impl DiagnosticSink for ClientSink<'_> {
    async fn publish(&self, diagnostics: Vec<Diagnostic>) {
        // A newer pass owns the document now
        if !self.is_current() {
            debug!(
                "Dropping stale diagnostics for {} (version {})",
                self.uri, self.version
            );
            return;
        }

        let lsp_diagnostics = diagnostics.iter().map(to_lsp_diagnostic).collect();
        self.published.insert(self.uri.clone(), diagnostics);
        self.client
            .publish_diagnostics(self.uri.clone(), lsp_diagnostics, Some(self.version))
            .await;
    }
}

impl ProxyLintLanguageServer {
    pub fn new(client: Client, session: LintSession) -> Self {
        Self {
            client,
            session,
            documents: DashMap::new(),
            published: DashMap::new(),
        }
    }

    /// Diagnostics last published for `uri`
    pub fn published_diagnostics(&self, uri: &Url) -> Vec<Diagnostic> {
        self.published
            .get(uri)
            .map(|diagnostics| diagnostics.clone())
            .unwrap_or_default()
    }

    async fn lint_document(&self, uri: Url) {
        let Some(document) = self.documents.get(&uri).map(|doc| doc.clone()) else {
            return;
        };

        let sink = ClientSink {
            client: &self.client,
            documents: &self.documents,
            published: &self.published,
            uri: uri.clone(),
            version: document.version,
        };
        let engine = &self.session.engine;

        match DocumentKind::detect(Path::new(uri.path()), &document.text) {
            DocumentKind::Config => {
                engine
                    .lint(&document.text, self.session.schemas.as_deref(), &sink)
                    .await;
            }
            DocumentKind::Proxy => sink.publish(engine.lint_proxy_file(&document.text)).await,
            DocumentKind::Other => {
                debug!("{} is not a Dev Proxy file", uri);
                sink.publish(Vec::new()).await;
            }
        }
    }

    fn code_actions(&self, params: &CodeActionParams) -> Vec<CodeAction> {
        let uri = &params.text_document.uri;
        let Some(text) = self.documents.get(uri).map(|doc| doc.text.clone()) else {
            return Vec::new();
        };

        let diagnostics: Vec<Diagnostic> = params
            .context
            .diagnostics
            .iter()
            .filter_map(from_lsp_diagnostic)
            .collect();
        if diagnostics.is_empty() {
            return Vec::new();
        }

        let published = self.published_diagnostics(uri);
        let request = FixRequest {
            text: &text,
            range: from_lsp_range(params.range),
            diagnostics: &diagnostics,
            all_diagnostics: if published.is_empty() {
                &diagnostics
            } else {
                &published
            },
        };

        self.session
            .fixes
            .fixes_for(&request)
            .iter()
            .map(|fix| to_code_action(fix, uri))
            .collect()
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for ProxyLintLanguageServer {
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "proxylint-lsp".to_string(),
                version: Some(crate::VERSION.to_string()),
            }),
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                code_action_provider: Some(CodeActionProviderCapability::Options(
                    CodeActionOptions {
                        code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
                        ..Default::default()
                    },
                )),
                ..Default::default()
            },
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("Proxylint LSP server initialized");
        self.client
            .log_message(MessageType::INFO, "Proxylint LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        debug!("Document opened: {}", uri);
        self.documents.insert(
            uri.clone(),
            OpenDocument {
                text: params.text_document.text,
                version: params.text_document.version,
            },
        );
        self.lint_document(uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        // Full sync: the last change holds the whole document
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };
        self.documents.insert(
            uri.clone(),
            OpenDocument {
                text: change.text,
                version: params.text_document.version,
            },
        );
        self.lint_document(uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.remove(&uri);
        self.published.remove(&uri);
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let actions = self.code_actions(&params);
        if actions.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            actions
                .into_iter()
                .map(CodeActionOrCommand::CodeAction)
                .collect(),
        ))
    }
}
