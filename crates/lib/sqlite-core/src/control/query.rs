use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use sqlite_store::models::{ModificationOutcome, QueryResult};
use tracing::info;

use super::{ControlResult, SqliteControlPlane, bind_values};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QueryReport {
    #[serde(flatten)]
    pub result: QueryResult,
    pub query: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModificationReport {
    #[serde(flatten)]
    pub outcome: ModificationOutcome,
    pub query: String,
}

impl SqliteControlPlane {
    /// Runs a read-only statement with optional positional parameters.
    ///
    /// The connection is opened in query-only mode, so the engine rejects
    /// statements that would write.
    ///
    /// # Errors
    /// Returns `ControlError` if the file cannot be opened or the engine
    /// rejects the statement.
    pub fn execute_query(
        &self,
        db_path: &Path,
        query: &str,
        params: &[Value],
    ) -> ControlResult<QueryReport> {
        let params = bind_values(params)?;
        let conn = self.store.open_read_only(db_path)?;
        let result = conn.query(query, &params)?;
        Ok(QueryReport {
            result,
            query: query.to_string(),
        })
    }

    /// Runs a single INSERT, UPDATE or DELETE and commits it.
    ///
    /// # Errors
    /// Returns `ControlError` if the file cannot be opened or the engine
    /// rejects the statement; nothing is committed in that case.
    pub fn execute_modification(
        &self,
        db_path: &Path,
        query: &str,
        params: &[Value],
    ) -> ControlResult<ModificationReport> {
        let params = bind_values(params)?;
        let mut conn = self.store.open(db_path)?;
        let outcome = conn.execute_write(query, &params)?;
        info!(
            path = %db_path.display(),
            affected_rows = outcome.affected_rows,
            "modification committed"
        );
        Ok(ModificationReport {
            outcome,
            query: query.to_string(),
        })
    }
}
