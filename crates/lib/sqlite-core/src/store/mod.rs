//! Store interfaces and `SQLite` implementation.
//!
//! The store layer opens one connection per operation and converts between
//! engine values and the shared value models.

pub mod sqlite;

pub use sqlite::{ConnectionHandle, SqliteStore, StoreError, StoreResult};
