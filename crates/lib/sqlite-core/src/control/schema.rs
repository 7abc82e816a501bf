use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use sqlite_store::models::{DatabaseSchema, TableSchema};
use sqlite_store::schema::create_table_sql;
use tracing::info;

use super::{ControlResult, SqliteControlPlane};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateTableReport {
    pub table_name: String,
    pub columns: Map<String, Value>,
    pub sql: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SchemaReport {
    pub schema: DatabaseSchema,
}

impl SqliteControlPlane {
    /// Creates a table unless one with the same name already exists.
    ///
    /// Columns are emitted in the order given. Re-running against an existing
    /// table is a no-op, whatever columns are passed.
    ///
    /// # Errors
    /// Returns `ControlError` if the file cannot be opened or the engine
    /// rejects the generated statement.
    pub fn create_table(
        &self,
        db_path: &Path,
        table_name: &str,
        columns: &[(String, String)],
    ) -> ControlResult<CreateTableReport> {
        let sql = create_table_sql(
            table_name,
            columns
                .iter()
                .map(|(name, declared_type)| (name.as_str(), declared_type.as_str())),
        );
        let mut conn = self.store.open(db_path)?;
        conn.execute_write(&sql, &[])?;
        info!(path = %db_path.display(), table = table_name, "table ensured");

        let columns = columns
            .iter()
            .map(|(name, declared_type)| (name.clone(), Value::String(declared_type.clone())))
            .collect();
        Ok(CreateTableReport {
            table_name: table_name.to_string(),
            columns,
            sql,
        })
    }

    /// Reads the live column layout of every table.
    ///
    /// # Errors
    /// Returns `ControlError` if the file cannot be opened or the catalog
    /// cannot be read.
    pub fn get_schema(&self, db_path: &Path) -> ControlResult<SchemaReport> {
        let conn = self.store.open_read_only(db_path)?;
        let mut tables = Vec::new();
        for table_name in conn.list_tables()? {
            let columns = conn.table_info(&table_name)?;
            tables.push(TableSchema::new(table_name, columns));
        }
        Ok(SchemaReport {
            schema: DatabaseSchema::new(db_path.display().to_string(), tables),
        })
    }
}
