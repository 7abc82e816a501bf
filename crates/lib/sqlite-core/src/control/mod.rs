use std::{error::Error, fmt, path::PathBuf};

use serde::Serialize;
use serde_json::Value;
use sqlite_store::models::SqlValue;

use crate::store::{SqliteStore, StoreError};

pub mod backup;
pub mod data;
pub mod query;
pub mod response;
pub mod schema;

pub use data::InsertReport;
pub use query::{ModificationReport, QueryReport};
pub use response::{Failure, FailureContext, ToolResponse};
pub use schema::{CreateTableReport, SchemaReport};

/// The two failure categories every operation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Engine,
    Unexpected,
}

#[derive(Debug)]
pub enum ControlError {
    Store(StoreError),
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl ControlError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(err) if err.is_engine() => ErrorKind::Engine,
            Self::Store(_) | Self::Io(_) | Self::Serialize(_) => ErrorKind::Unexpected,
        }
    }
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind() {
            ErrorKind::Engine => "SQLite error",
            ErrorKind::Unexpected => "Unexpected error",
        };
        match self {
            Self::Store(err) => write!(f, "{prefix}: {err}"),
            Self::Io(err) => write!(f, "{prefix}: {err}"),
            Self::Serialize(err) => write!(f, "{prefix}: {err}"),
        }
    }
}

impl Error for ControlError {}

impl From<StoreError> for ControlError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<std::io::Error> for ControlError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ControlError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err)
    }
}

pub type ControlResult<T> = Result<T, ControlError>;

/// Executes tool operations against database files.
///
/// Every operation receives the database path explicitly and opens its own
/// connection, so a single control plane can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct SqliteControlPlane {
    store: SqliteStore,
    backup_dir: PathBuf,
}

impl Default for SqliteControlPlane {
    fn default() -> Self {
        Self::new(SqliteStore::new())
    }
}

impl SqliteControlPlane {
    #[must_use]
    pub fn new(store: SqliteStore) -> Self {
        Self {
            store,
            backup_dir: PathBuf::from("."),
        }
    }

    /// Sets the directory that receives backups with no explicit destination.
    #[must_use]
    pub fn with_backup_dir(mut self, backup_dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = backup_dir.into();
        self
    }

    #[must_use]
    pub const fn store(&self) -> &SqliteStore {
        &self.store
    }

    #[must_use]
    pub fn backup_dir(&self) -> &std::path::Path {
        &self.backup_dir
    }
}

/// Converts positional JSON arguments into bindable values.
///
/// # Errors
/// Returns an engine-kind `ControlError` naming the first argument with no
/// column representation.
pub fn bind_values(values: &[Value]) -> ControlResult<Vec<SqlValue>> {
    values
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            SqlValue::from_json(value).ok_or_else(|| {
                ControlError::Store(StoreError::InvalidInput(format!(
                    "unsupported parameter type at position {idx}: {value}"
                )))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn invalid_input_is_an_engine_error() {
        let err = bind_values(&[json!(1), json!({"a": 1})]).expect_err("object should be rejected");
        assert_eq!(err.kind(), ErrorKind::Engine);
        assert!(err.to_string().starts_with("SQLite error: invalid input"));
        assert!(err.to_string().contains("position 1"));
    }

    #[test]
    fn io_failures_are_unexpected() {
        let err = ControlError::from(std::io::Error::other("disk gone"));
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert_eq!(err.to_string(), "Unexpected error: disk gone");
    }
}
