//! MCP tool modules.
//!
//! Tools are grouped by concern: raw statements, schema management, row
//! access, backups, and contextual help.

pub mod backup;
pub mod data;
pub mod query;
pub mod schema;
mod context;

pub use backup::BackupDatabaseParams;
pub use data::{GetTableDataParams, InsertDataParams};
pub use query::{ExecuteModificationParams, ExecuteQueryParams};
pub use schema::{CreateTableParams, GetSchemaParams};
