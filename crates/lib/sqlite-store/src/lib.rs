//! Value models and statement helpers for sqlite-mcp.
//!
//! This crate defines the request-scoped value objects exchanged between the
//! control plane and the MCP tool layer, plus the SQL text the tools generate.

pub mod models;
pub mod schema;

pub use models::*;
