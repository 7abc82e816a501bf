//! MCP server implementation for sqlite-mcp.
//!
//! This crate wires the `SQLite` control plane into rmcp tool handlers and
//! exposes one tool per database operation.

mod helpers;
mod tools;
pub mod server;

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use sqlite_core::control::SqliteControlPlane;

pub use tools::{
    BackupDatabaseParams,
    CreateTableParams,
    ExecuteModificationParams,
    ExecuteQueryParams,
    GetSchemaParams,
    GetTableDataParams,
    InsertDataParams,
};

const SERVER_INSTRUCTIONS: &str = r"sqlite-mcp exposes tools over SQLite database files.

Every tool accepts an optional `db_path`; when omitted the server's configured default file is used.
Each call opens its own connection, commits any write before returning, and releases the connection.

Tools:
- `execute_query` runs a read-only statement (`params` are bound positionally).
- `execute_modification` runs one INSERT/UPDATE/DELETE and reports `affected_rows` and `last_row_id`.
- `create_table` creates a table from a `{column: type}` object if it does not exist.
- `get_schema` lists every table with its columns.
- `insert_data` inserts one row from a `{column: value}` object.
- `get_table_data` pages through a table (`limit` default 100, `offset` default 0, optional `where_clause`).
- `backup_database` writes every table's rows to a JSON file.

Every result carries `success`. Failures add `error`, `error_kind` (`engine` or `unexpected`) and context.
Use `help` for details. `health` returns `ok`.";

/// MCP server wrapper around the control plane and tool routers.
#[derive(Clone)]
pub struct SqliteMcp {
    tool_router: ToolRouter<Self>,
    control: Arc<SqliteControlPlane>,
    default_db_path: Arc<PathBuf>,
}

impl SqliteMcp {
    /// Creates a new server using a control plane by value.
    #[must_use]
    pub fn new(control: SqliteControlPlane, default_db_path: impl Into<PathBuf>) -> Self {
        Self::with_control(Arc::new(control), Arc::new(default_db_path.into()))
    }

    /// Creates a new server using shared handles.
    #[must_use]
    pub fn with_control(control: Arc<SqliteControlPlane>, default_db_path: Arc<PathBuf>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_query()
            + Self::tool_router_schema()
            + Self::tool_router_data()
            + Self::tool_router_backup()
            + Self::tool_router_context();
        Self {
            tool_router,
            control,
            default_db_path,
        }
    }

    #[must_use]
    pub fn default_db_path(&self) -> &std::path::Path {
        &self.default_db_path
    }

    /// Resolves the database file for a call, falling back to the default.
    pub(crate) fn resolve_db_path(&self, db_path: Option<String>) -> PathBuf {
        helpers::normalize(db_path)
            .map_or_else(|| PathBuf::clone(&self.default_db_path), PathBuf::from)
    }

    /// Runs a control-plane operation on the blocking pool.
    pub(crate) async fn run_blocking<T, F>(&self, op: F) -> Result<T, ErrorData>
    where
        F: FnOnce(&SqliteControlPlane) -> T + Send + 'static,
        T: Send + 'static,
    {
        let control = Arc::clone(&self.control);
        tokio::task::spawn_blocking(move || op(&control))
            .await
            .map_err(helpers::join_err)
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl SqliteMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl ServerHandler for SqliteMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
