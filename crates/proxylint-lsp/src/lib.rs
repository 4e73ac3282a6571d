//! Proxylint Language Server Protocol (LSP)
//!
//! Provides IDE support for Dev Proxy configuration files:
//! - Diagnostics, published in two phases
//! - Code actions (quick fixes)

pub mod convert;
pub mod server;

pub use server::{LintSession, ProxyLintLanguageServer};

use proxylint_core::LintConfig;
use tower_lsp::{LspService, Server};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Serve LSP over stdin/stdout until the client disconnects
pub async fn run_server(config: &LintConfig) -> anyhow::Result<()> {
    let session = LintSession::from_config(config)?;
    tracing::info!(
        "Starting LSP server for Dev Proxy v{}",
        session.engine.context().install.version
    );

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let (service, socket) =
        LspService::new(move |client| ProxyLintLanguageServer::new(client, session));
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
