use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlite_core::control::{FailureContext, ToolResponse};

use crate::{SqliteMcp, helpers};

/// Parameters for running a read-only statement.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ExecuteQueryParams {
    /// SQL SELECT query to execute.
    pub query: String,
    /// Positional values bound to `?` placeholders.
    pub params: Option<Vec<Value>>,
    /// Database file path. Defaults to the server's configured database.
    pub db_path: Option<String>,
}

/// Parameters for running a write statement.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ExecuteModificationParams {
    /// SQL INSERT/UPDATE/DELETE statement.
    pub query: String,
    /// Positional values bound to `?` placeholders.
    pub params: Option<Vec<Value>>,
    /// Database file path. Defaults to the server's configured database.
    pub db_path: Option<String>,
}

#[tool_router(router = tool_router_query, vis = "pub")]
impl SqliteMcp {
    #[tool(description = "Execute a SELECT query on SQLite database.")]
    pub(crate) async fn execute_query(
        &self,
        Parameters(params): Parameters<ExecuteQueryParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let db_path = self.resolve_db_path(params.db_path);
        let query = params.query;
        let values = params.params.unwrap_or_default();
        let context = FailureContext::query(query.clone());
        let result = self
            .run_blocking(move |control| control.execute_query(&db_path, &query, &values))
            .await?;
        helpers::respond(&ToolResponse::from_result(result, context))
    }

    #[tool(description = "Execute INSERT, UPDATE, DELETE operations on SQLite database.")]
    pub(crate) async fn execute_modification(
        &self,
        Parameters(params): Parameters<ExecuteModificationParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let db_path = self.resolve_db_path(params.db_path);
        let query = params.query;
        let values = params.params.unwrap_or_default();
        let context = FailureContext::query(query.clone());
        let result = self
            .run_blocking(move |control| control.execute_modification(&db_path, &query, &values))
            .await?;
        helpers::respond(&ToolResponse::from_result(result, context))
    }
}
