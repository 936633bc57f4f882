//! Result helpers for MCP tool and resource responses

use rmcp::{
    model::{CallToolResult, Content, ReadResourceResult, ResourceContents},
    ErrorData as McpError,
};
use serde::Serialize;

/// Create a successful tool response carrying pretty-printed JSON
///
/// ```rust,ignore
/// fn my_tool(&self) -> Result<CallToolResult, McpError> {
///     json_success(&MyData { value: 42 })
/// }
/// ```
pub fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = to_pretty_json(data)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Create a resource read response whose single text body is `data` as JSON
///
/// The body is addressed by `uri`, the URI the client asked for.
pub fn json_resource<T: Serialize>(
    uri: impl Into<String>,
    data: &T,
) -> Result<ReadResourceResult, McpError> {
    let json = to_pretty_json(data)?;
    Ok(ReadResourceResult {
        contents: vec![ResourceContents::text(json, uri)],
    })
}

fn to_pretty_json<T: Serialize>(data: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(data).map_err(|e| McpError::internal_error(e.to_string(), None))
}
