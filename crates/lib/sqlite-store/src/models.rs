use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Scalar value stored in, or bound to, a `SQLite` column.
///
/// Serialized untagged so rows read naturally as JSON objects. Blobs are
/// emitted as arrays of bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Converts a JSON tool argument into a bindable value.
    ///
    /// Booleans become `0`/`1`, arrays of byte-sized integers become blobs.
    /// Objects and any other arrays have no column representation and yield
    /// `None`.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(flag) => Some(Self::Integer(i64::from(*flag))),
            Value::Number(number) => number
                .as_i64()
                .map(Self::Integer)
                .or_else(|| number.as_f64().map(Self::Real)),
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_u64().and_then(|byte| u8::try_from(byte).ok()))
                .collect::<Option<Vec<u8>>>()
                .map(Self::Blob),
            Value::Object(_) => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// A single row keyed by column name.
pub type Record = BTreeMap<String, SqlValue>;

/// Rows returned by a read statement.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QueryResult {
    rows: Vec<Record>,
    row_count: usize,
}

impl QueryResult {
    #[must_use]
    pub fn new(rows: Vec<Record>) -> Self {
        let row_count = rows.len();
        Self { rows, row_count }
    }

    #[must_use]
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }
}

/// Effect of a single write statement.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ModificationOutcome {
    pub affected_rows: usize,
    #[serde(rename = "last_row_id")]
    pub last_insert_id: Option<i64>,
}

/// Column metadata reported by `PRAGMA table_info`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: String,
    pub not_null: bool,
    pub default_value: Option<SqlValue>,
    #[serde(rename = "primary_key")]
    pub is_primary_key: bool,
}

/// Structure of one table at introspection time.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableSchema {
    #[serde(skip)]
    pub table_name: String,
    pub columns: Vec<ColumnDefinition>,
    pub column_count: usize,
}

impl TableSchema {
    #[must_use]
    pub fn new(table_name: impl Into<String>, columns: Vec<ColumnDefinition>) -> Self {
        let column_count = columns.len();
        Self {
            table_name: table_name.into(),
            columns,
            column_count,
        }
    }
}

/// Live schema of a whole database file.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatabaseSchema {
    pub database_path: String,
    pub tables: BTreeMap<String, TableSchema>,
    pub table_count: usize,
}

impl DatabaseSchema {
    #[must_use]
    pub fn new(database_path: impl Into<String>, tables: Vec<TableSchema>) -> Self {
        let table_count = tables.len();
        let tables = tables
            .into_iter()
            .map(|table| (table.table_name.clone(), table))
            .collect();
        Self {
            database_path: database_path.into(),
            tables,
            table_count,
        }
    }
}

/// A page of rows plus the total number of rows matching the filter.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TablePage {
    pub table_name: String,
    pub rows: Vec<Record>,
    pub returned_rows: usize,
    pub total_rows: u64,
    pub limit: u64,
    pub offset: u64,
    pub where_clause: Option<String>,
}

/// Full contents of one table inside a backup.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableDump {
    rows: Vec<Record>,
    row_count: usize,
}

impl TableDump {
    #[must_use]
    pub fn new(rows: Vec<Record>) -> Self {
        let row_count = rows.len();
        Self { rows, row_count }
    }

    #[must_use]
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.row_count
    }
}

/// Point-in-time copy of every table's rows.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BackupSnapshot {
    pub backup_timestamp: String,
    pub source_database: String,
    pub tables: BTreeMap<String, TableDump>,
}

impl BackupSnapshot {
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.tables.values().map(TableDump::row_count).sum()
    }

    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

/// Summary returned after a backup artifact is written.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BackupReport {
    pub backup_path: String,
    pub source_database: String,
    pub tables_backed_up: usize,
    pub total_rows: usize,
}
