use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlite_core::control::{FailureContext, ToolResponse};
use sqlite_store::schema::DEFAULT_PAGE_LIMIT;

use crate::{SqliteMcp, helpers};

/// Parameters for inserting one row.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct InsertDataParams {
    /// Name of the table.
    pub table_name: String,
    /// Data to insert as `{column: value}` pairs.
    pub data: Map<String, Value>,
    /// Database file path. Defaults to the server's configured database.
    pub db_path: Option<String>,
}

/// Parameters for paging through a table.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetTableDataParams {
    /// Name of the table.
    pub table_name: String,
    /// Maximum number of rows to return (default 100).
    pub limit: Option<u64>,
    /// Number of rows to skip (default 0).
    pub offset: Option<u64>,
    /// WHERE clause without the WHERE keyword. Applied verbatim.
    pub where_clause: Option<String>,
    /// Database file path. Defaults to the server's configured database.
    pub db_path: Option<String>,
}

#[tool_router(router = tool_router_data, vis = "pub")]
impl SqliteMcp {
    #[tool(description = "Insert data into a table.")]
    pub(crate) async fn insert_data(
        &self,
        Parameters(params): Parameters<InsertDataParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let db_path = self.resolve_db_path(params.db_path);
        let table_name = params.table_name;
        let data = params.data;
        let context = FailureContext::table(table_name.clone()).with_data(data.clone());
        let result = self
            .run_blocking(move |control| control.insert_data(&db_path, &table_name, &data))
            .await?;
        helpers::respond(&ToolResponse::from_result(result, context))
    }

    #[tool(description = "Get table data with optional filtering and pagination.")]
    pub(crate) async fn get_table_data(
        &self,
        Parameters(params): Parameters<GetTableDataParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let db_path = self.resolve_db_path(params.db_path);
        let table_name = params.table_name;
        let limit = params.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        let offset = params.offset.unwrap_or_default();
        let where_clause = helpers::normalize(params.where_clause);
        let context = FailureContext::table(table_name.clone());
        let result = self
            .run_blocking(move |control| {
                control.get_table_data(&db_path, &table_name, limit, offset, where_clause.as_deref())
            })
            .await?;
        helpers::respond(&ToolResponse::from_result(result, context))
    }
}
