//! Wire types for the stdio tool server.
//!
//! The agent speaks JSON-RPC 2.0 (MCP dialect), one JSON object per line on
//! stdin, and reads one response line per request on stdout. Notifications
//! (no `id`) get no response.
//!
//! Every tool call, successful or not, returns a [`ToolResult`]. Protocol
//! errors (bad JSON, unknown method or tool, malformed arguments) are the only
//! things reported as JSON-RPC errors.

use crate::errors::ToolError;
use crate::push::PushOutcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// Protocol version answered when the client does not name one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC error codes used by the server.
pub mod codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// A request or notification from the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub jsonrpc: String,

    /// Absent for notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    pub method: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self {
            code: codes::PARSE_ERROR,
            message: format!("Parse error: {detail}"),
        }
    }

    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self {
            code: codes::INVALID_REQUEST,
            message: detail.into(),
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: codes::METHOD_NOT_FOUND,
            message: format!("Method not found: {method}"),
        }
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self {
            code: codes::INVALID_PARAMS,
            message: detail.into(),
        }
    }

    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self {
            code: codes::INTERNAL_ERROR,
            message: format!("Internal error: {detail}"),
        }
    }
}

/// Response to a request with an `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,

    /// `null` only when the request itself could not be parsed.
    pub id: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Params of `tools/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// One entry of the `tools/list` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Result of `tools/call`: the [`ToolResult`] as text and as structured content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub content: Vec<TextContent>,
    #[serde(rename = "structuredContent")]
    pub structured_content: Value,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolCallResult {
    pub fn from_result(result: &ToolResult) -> Result<Self, serde_json::Error> {
        Ok(Self {
            content: vec![TextContent {
                kind: "text".to_string(),
                text: serde_json::to_string_pretty(result)?,
            }],
            structured_content: serde_json::to_value(result)?,
            is_error: !result.success,
        })
    }
}

/// What every tool hands back to the agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,

    /// `push_changes`: SHA of the local commit that was recreated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_commit_sha: Option<String>,

    /// New remote commit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,

    /// Web URL of the new remote commit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Human-readable summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_changed: Option<Vec<String>>,

    /// Non-fatal problems syncing the local checkout after a push.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// A remote commit was created and the branch moved.
    pub fn committed(sha: String, url: String, message: String) -> Self {
        Self {
            success: true,
            sha: Some(sha),
            url: Some(url),
            message: Some(message),
            ..Default::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

impl From<PushOutcome> for ToolResult {
    fn from(outcome: PushOutcome) -> Self {
        let message = outcome.summary();
        Self {
            success: true,
            local_commit_sha: Some(outcome.local_commit_sha),
            sha: Some(outcome.sha),
            url: Some(outcome.url),
            message: Some(message),
            files_changed: Some(outcome.files_changed),
            warnings: outcome.warnings,
            error: None,
        }
    }
}

impl<T> From<Result<T, ToolError>> for ToolResult
where
    T: Into<ToolResult>,
{
    fn from(result: Result<T, ToolError>) -> Self {
        match result {
            Ok(done) => done.into(),
            Err(e) => ToolResult::failed(e.to_string()),
        }
    }
}
