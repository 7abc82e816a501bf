use std::borrow::Cow;

use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, ErrorCode};
use serde::Serialize;
use sqlite_core::control::ToolResponse;
use tokio::task::JoinError;

pub fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

pub fn join_err(err: JoinError) -> ErrorData {
    mcp_err(
        ErrorCode::INTERNAL_ERROR,
        format!("database task did not complete: {err}"),
    )
}

/// Renders an envelope as tool output, flagging failures as tool errors.
pub fn respond<T: Serialize>(response: &ToolResponse<T>) -> Result<CallToolResult, ErrorData> {
    let content = vec![Content::json(response)?];
    if response.is_success() {
        Ok(CallToolResult::success(content))
    } else {
        Ok(CallToolResult::error(content))
    }
}

/// Treats blank optional strings as absent.
pub fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
