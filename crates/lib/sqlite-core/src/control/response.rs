//! Uniform `{success, ...}` envelope returned by every tool.

use chrono::Local;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::{ControlError, ErrorKind};

/// Context echoed back with a failure so the caller can diagnose it.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FailureContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_database: Option<String>,
}

impl FailureContext {
    #[must_use]
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn table(table_name: impl Into<String>) -> Self {
        Self {
            table_name: Some(table_name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn source_database(source_database: impl Into<String>) -> Self {
        Self {
            source_database: Some(source_database.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Failure {
    pub error: String,
    pub error_kind: ErrorKind,
    #[serde(flatten)]
    pub context: FailureContext,
}

/// Result of one tool call. Exactly one of `payload` or `failure` is set.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub payload: Option<T>,
    #[serde(flatten)]
    pub failure: Option<Failure>,
    pub timestamp: String,
}

impl<T: Serialize> ToolResponse<T> {
    #[must_use]
    pub fn success(payload: T) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            failure: None,
            timestamp: timestamp(),
        }
    }

    #[must_use]
    pub fn failure(err: &ControlError, context: FailureContext) -> Self {
        warn!(kind = ?err.kind(), error = %err, "tool operation failed");
        Self {
            success: false,
            payload: None,
            failure: Some(Failure {
                error: err.to_string(),
                error_kind: err.kind(),
                context,
            }),
            timestamp: timestamp(),
        }
    }

    /// Wraps an operation result, attaching `context` only on failure.
    #[must_use]
    pub fn from_result(result: Result<T, ControlError>, context: FailureContext) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(err) => Self::failure(&err, context),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }
}

fn timestamp() -> String {
    Local::now().to_rfc3339()
}
