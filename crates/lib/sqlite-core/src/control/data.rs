use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use sqlite_store::models::TablePage;
use sqlite_store::schema::{count_sql, insert_sql, select_page_sql};
use tracing::info;

use super::{ControlResult, SqliteControlPlane, bind_values};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InsertReport {
    pub table_name: String,
    pub inserted_data: Map<String, Value>,
    pub row_id: Option<i64>,
}

impl SqliteControlPlane {
    /// Inserts one row built from a column → value mapping.
    ///
    /// # Errors
    /// Returns `ControlError` if a value cannot be bound, the file cannot be
    /// opened, or the engine rejects the insert.
    pub fn insert_data(
        &self,
        db_path: &Path,
        table_name: &str,
        data: &Map<String, Value>,
    ) -> ControlResult<InsertReport> {
        let values: Vec<Value> = data.values().cloned().collect();
        let params = bind_values(&values)?;
        let sql = insert_sql(table_name, data.keys().map(String::as_str));

        let mut conn = self.store.open(db_path)?;
        let outcome = conn.execute_write(&sql, &params)?;
        info!(path = %db_path.display(), table = table_name, row_id = ?outcome.last_insert_id, "row inserted");

        Ok(InsertReport {
            table_name: table_name.to_string(),
            inserted_data: data.clone(),
            row_id: outcome.last_insert_id,
        })
    }

    /// Reads one page of a table plus the total number of matching rows.
    ///
    /// `where_clause` is raw predicate text and is applied to both the page
    /// and the count, so `total_rows` does not depend on `limit`/`offset`.
    ///
    /// # Errors
    /// Returns `ControlError` if the file cannot be opened or the engine
    /// rejects either statement.
    pub fn get_table_data(
        &self,
        db_path: &Path,
        table_name: &str,
        limit: u64,
        offset: u64,
        where_clause: Option<&str>,
    ) -> ControlResult<TablePage> {
        let page_sql = select_page_sql(table_name, where_clause, limit, offset);
        let conn = self.store.open_read_only(db_path)?;
        let rows = conn.query(&page_sql, &[])?.into_rows();
        let total_rows = conn.count(&count_sql(table_name, where_clause))?;

        Ok(TablePage {
            table_name: table_name.to_string(),
            returned_rows: rows.len(),
            rows,
            total_rows,
            limit,
            offset,
            where_clause: where_clause.map(str::to_string),
        })
    }
}
