//! Daemon entry point for the `SQLite` MCP server.
//!
//! Loads configuration from CLI flags and the environment, installs logging on
//! stderr, and serves the MCP protocol over stdio or streamable HTTP.

mod config;

use sqlite_core::control::SqliteControlPlane;
use sqlite_core::store::SqliteStore;
use sqlite_mcp::SqliteMcp;
use sqlite_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::SqliteMcpConfig;

const DEFAULT_LOG_FILTER: &str = "sqlite_mcpd=info,sqlite_mcp=info,sqlite_core=info,rmcp=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SqliteMcpConfig::from_args()?;
    info!(
        db_path = %config.db_path.display(),
        backup_dir = %config.backup_dir.display(),
        "starting sqlite-mcpd"
    );
    let store = SqliteStore::new().with_busy_timeout(config.busy_timeout);
    let control = SqliteControlPlane::new(store).with_backup_dir(&config.backup_dir);
    let server = SqliteMcp::new(control, &config.db_path);

    if config.enable_stdio {
        serve_stdio(server).await
    } else {
        let http = McpHttpServerConfig::new(config.mcp_http_addr)
            .with_stateful_mode(config.mcp_stateful);
        serve_streamable_http(server, http).await
    }
}
