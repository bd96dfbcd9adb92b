//! Tool implementations exposed over the gateway.
//!
//! Each handler takes its typed arguments plus the [`ToolContext`] and always
//! produces a [`ToolResult`]; failures inside a tool never become protocol
//! errors.

pub mod commit_files;
pub mod delete_files;
pub mod push_changes;

use crate::config::Environment;
use crate::gateway::protocol::{RpcError, ToolDefinition, ToolResult};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::path::PathBuf;

/// Everything a tool needs besides its arguments.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Local checkout the agent works in.
    pub workspace_root: PathBuf,
    /// Defaults read once at startup.
    pub env: Environment,
}

/// Summary of a `commit_files` / `delete_files` commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCommitOutcome {
    pub sha: String,
    pub url: String,
    pub message: String,
}

impl From<FileCommitOutcome> for ToolResult {
    fn from(outcome: FileCommitOutcome) -> Self {
        ToolResult::committed(outcome.sha, outcome.url, outcome.message)
    }
}

/// Run the tool called `name`.
///
/// Unknown tools and arguments that do not match the tool's schema are
/// protocol errors; everything past argument decoding is a [`ToolResult`].
pub async fn call_tool(name: &str, arguments: Value, ctx: &ToolContext) -> Result<ToolResult, RpcError> {
    match name {
        push_changes::NAME => Ok(push_changes::execute(decode_args(name, arguments)?, ctx).await),
        commit_files::NAME => Ok(commit_files::execute(decode_args(name, arguments)?, ctx).await),
        delete_files::NAME => Ok(delete_files::execute(decode_args(name, arguments)?, ctx).await),
        other => Err(RpcError::invalid_params(format!("Unknown tool: {other}"))),
    }
}

/// `tools/list` payload.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        push_changes::definition(),
        commit_files::definition(),
        delete_files::definition(),
    ]
}

fn decode_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, RpcError> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments)
        .map_err(|e| RpcError::invalid_params(format!("Invalid arguments for {tool}: {e}")))
}

/// Schema properties shared by every tool: where to push and how.
fn target_properties() -> serde_json::Map<String, Value> {
    let props = json!({
        "owner": {
            "type": "string",
            "description": "Repository owner (defaults to REPO_OWNER)"
        },
        "repo": {
            "type": "string",
            "description": "Repository name (defaults to REPO_NAME)"
        },
        "branch": {
            "type": "string",
            "description": "Target branch (defaults to BRANCH_NAME, then the current checkout)"
        },
        "github_token": {
            "type": "string",
            "description": "GitHub token (defaults to GITHUB_TOKEN)"
        },
        "mode": {
            "type": "string",
            "enum": ["pr-gen", "pr-update"],
            "description": "pr-gen creates the branch from the base branch; pr-update updates an existing branch (defaults to DEVSY_MODE, then pr-update)"
        }
    });
    match props {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}

fn object_schema(mut properties: serde_json::Map<String, Value>, required: &[&str]) -> Value {
    properties.extend(target_properties());
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
