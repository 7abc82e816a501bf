use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, ErrorCode},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlite_core::control::{FailureContext, ToolResponse};

use crate::{SqliteMcp, helpers};

/// Parameters for creating a table.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateTableParams {
    /// Name of the table to create.
    pub table_name: String,
    /// Column definitions as `{column_name: column_type}`, in column order.
    pub columns: Map<String, Value>,
    /// Database file path. Defaults to the server's configured database.
    pub db_path: Option<String>,
}

/// Parameters for reading the database schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetSchemaParams {
    /// Database file path. Defaults to the server's configured database.
    pub db_path: Option<String>,
}

#[tool_router(router = tool_router_schema, vis = "pub")]
impl SqliteMcp {
    #[tool(description = "Create a new table in SQLite database. Columns are given as {column_name: column_type}.")]
    pub(crate) async fn create_table(
        &self,
        Parameters(params): Parameters<CreateTableParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let columns = column_pairs(params.columns)?;
        let db_path = self.resolve_db_path(params.db_path);
        let table_name = params.table_name;
        let context = FailureContext::table(table_name.clone());
        let result = self
            .run_blocking(move |control| control.create_table(&db_path, &table_name, &columns))
            .await?;
        helpers::respond(&ToolResponse::from_result(result, context))
    }

    #[tool(description = "Get database schema information: every table with its columns.")]
    pub(crate) async fn get_schema(
        &self,
        Parameters(params): Parameters<GetSchemaParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let db_path = self.resolve_db_path(params.db_path);
        let result = self
            .run_blocking(move |control| control.get_schema(&db_path))
            .await?;
        helpers::respond(&ToolResponse::from_result(result, FailureContext::default()))
    }
}

fn column_pairs(columns: Map<String, Value>) -> Result<Vec<(String, String)>, ErrorData> {
    columns
        .into_iter()
        .map(|(name, declared_type)| match declared_type {
            Value::String(declared_type) => Ok((name, declared_type)),
            other => Err(helpers::mcp_err(
                ErrorCode::INVALID_PARAMS,
                format!("column `{name}` type must be a string, got {other}"),
            )),
        })
        .collect()
}
