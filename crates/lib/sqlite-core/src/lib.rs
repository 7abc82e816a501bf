//! Core services for sqlite-mcp.
//!
//! This crate owns connection acquisition against a database file, the
//! control-plane operations behind every tool, and the uniform response
//! envelope those operations are reported through.

pub mod control;
pub mod store;
