use std::path::PathBuf;

use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use sqlite_core::control::{FailureContext, ToolResponse};

use crate::{SqliteMcp, helpers};

/// Parameters for dumping a database to a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct BackupDatabaseParams {
    /// Database file path. Defaults to the server's configured database.
    pub db_path: Option<String>,
    /// Backup file path. Defaults to a timestamped file in the backup directory.
    pub backup_path: Option<String>,
}

#[tool_router(router = tool_router_backup, vis = "pub")]
impl SqliteMcp {
    #[tool(description = "Backup database to JSON file.")]
    pub(crate) async fn backup_database(
        &self,
        Parameters(params): Parameters<BackupDatabaseParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let db_path = self.resolve_db_path(params.db_path);
        let backup_path = helpers::normalize(params.backup_path).map(PathBuf::from);
        let context = FailureContext::source_database(db_path.display().to_string());
        let result = self
            .run_blocking(move |control| control.backup_database(&db_path, backup_path.as_deref()))
            .await?;
        helpers::respond(&ToolResponse::from_result(result, context))
    }
}
