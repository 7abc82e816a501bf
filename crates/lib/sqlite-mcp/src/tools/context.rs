use rmcp::{
    ErrorData,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::SqliteMcp;

/// Payload listing the MCP commands this server exposes.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HelpCommands {
    pub commands: Vec<String>,
    pub notes: Vec<String>,
}

impl Default for HelpCommands {
    fn default() -> Self {
        Self {
            commands: vec![
                "help - List MCP commands and usage notes for this server.".to_string(),
                "health - Returns 'ok'.".to_string(),
                "execute_query - Run a read-only statement; params bind to ? placeholders."
                    .to_string(),
                "execute_modification - Run one INSERT/UPDATE/DELETE and commit it."
                    .to_string(),
                "create_table - Create a table from {column: type} if it does not exist."
                    .to_string(),
                "get_schema - List every table with its columns.".to_string(),
                "insert_data - Insert one row from {column: value}.".to_string(),
                "get_table_data - Page through a table with limit, offset and where_clause."
                    .to_string(),
                "backup_database - Write every table's rows to a JSON file.".to_string(),
            ],
            notes: vec![
                "db_path is optional on every tool; the configured default file is used when omitted."
                    .to_string(),
                "Table names, column names and where_clause are inserted into SQL verbatim. Only values are bound as parameters."
                    .to_string(),
                "Failures return success=false with error_kind 'engine' (rejected by SQLite) or 'unexpected' (file system and other faults)."
                    .to_string(),
                "Backups are one-way JSON dumps; there is no restore tool.".to_string(),
            ],
        }
    }
}

#[tool_router(router = tool_router_context, vis = "pub")]
impl SqliteMcp {
    #[tool(description = "List the MCP commands and usage notes for this server.")]
    async fn help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(HelpCommands::default())?]))
    }
}
