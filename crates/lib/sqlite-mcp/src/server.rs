//! MCP server runners for sqlite-mcp.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig,
    StreamableHttpService,
    session::local::LocalSessionManager,
};
use tracing::info;

use crate::SqliteMcp;

pub const DEFAULT_MCP_HTTP_PORT: u16 = 4030;

/// Configuration for the MCP streamable HTTP server.
#[derive(Debug, Clone)]
pub struct McpHttpServerConfig {
    pub addr: SocketAddr,
    pub stateful_mode: bool,
}

impl McpHttpServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            stateful_mode: true,
        }
    }

    #[must_use]
    pub const fn with_stateful_mode(mut self, stateful_mode: bool) -> Self {
        self.stateful_mode = stateful_mode;
        self
    }
}

impl Default for McpHttpServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_MCP_HTTP_PORT)))
    }
}

/// Serves the MCP server over stdio.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio(server: SqliteMcp) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!(db_path = %server.default_db_path().display(), "serving MCP over stdio");
    let (stdin, stdout) = stdio();
    let running = serve_server(server, (stdin, stdout)).await?;
    let _ = running.waiting().await?;
    Ok(())
}

/// Serves the MCP server using streamable HTTP transport.
///
/// Each session gets its own clone of `server`; clones share the control
/// plane and default database path.
///
/// # Errors
/// Returns any listener or server error.
pub async fn serve_streamable_http(
    server: SqliteMcp,
    config: McpHttpServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let service: StreamableHttpService<SqliteMcp, LocalSessionManager> =
        StreamableHttpService::new(
            move || Ok(server.clone()),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig {
                stateful_mode: config.stateful_mode,
                ..Default::default()
            },
        );

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest_service("/mcp", service);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "serving MCP over streamable HTTP");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_listens_on_loopback() {
        let config = McpHttpServerConfig::default();
        assert_eq!(config.addr.port(), DEFAULT_MCP_HTTP_PORT);
        assert!(config.addr.ip().is_loopback());
        assert!(config.stateful_mode);
    }

    #[test]
    fn stateless_mode_can_be_selected() {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, 9000));
        let config = McpHttpServerConfig::new(addr).with_stateful_mode(false);
        assert_eq!(config.addr, addr);
        assert!(!config.stateful_mode);
    }
}
