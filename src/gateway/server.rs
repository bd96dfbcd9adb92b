//! Gateway server: the agent's tool-call loop terminates here.
//!
//! Reads newline-delimited JSON-RPC messages, dispatches them one at a time,
//! and writes one response line per request. A tool call runs to completion
//! before the next line is read, so operations never overlap.
//!
//! stdout is reserved for protocol traffic; logging goes to stderr.

use crate::config::Environment;
use crate::gateway::handlers::{self, ToolContext};
use crate::gateway::protocol::{
    RpcError, RpcRequest, RpcResponse, ToolCallParams, ToolCallResult, DEFAULT_PROTOCOL_VERSION,
    JSONRPC_VERSION,
};
use anyhow::Result;
use serde_json::{json, Value};
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

pub const SERVER_NAME: &str = "github-file-ops";

/// The stdio tool server.
pub struct GatewayServer {
    ctx: ToolContext,
}

impl GatewayServer {
    pub fn new(workspace_root: impl AsRef<Path>, env: Environment) -> Self {
        Self {
            ctx: ToolContext {
                workspace_root: workspace_root.as_ref().to_path_buf(),
                env,
            },
        }
    }

    /// Serve on the process's stdin/stdout until stdin closes.
    pub async fn run_stdio(&self) -> Result<()> {
        info!(
            workspace = %self.ctx.workspace_root.display(),
            "{} listening on stdio",
            SERVER_NAME
        );
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve requests from `reader`, writing responses to `writer`.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;
            if bytes_read == 0 {
                debug!("input closed, shutting down");
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(line.trim()).await {
                let json = serde_json::to_string(&response)?;
                writer.write_all(json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        Ok(())
    }

    /// Handle one raw message. `None` means nothing should be written back.
    pub async fn handle_line(&self, line: &str) -> Option<RpcResponse> {
        let request: RpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!(error = %e, "unparsable message");
                return Some(RpcResponse::failure(Value::Null, RpcError::parse_error(e)));
            }
        };
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: RpcRequest) -> Option<RpcResponse> {
        debug!(method = %request.method, id = ?request.id, "request");

        if request.is_notification() {
            // initialized, cancelled, ... carry nothing we act on
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(RpcResponse::failure(
                id,
                RpcError::invalid_request(format!(
                    "Unsupported jsonrpc version: '{}'",
                    request.jsonrpc
                )),
            ));
        }

        let outcome = match request.method.as_str() {
            "initialize" => Ok(initialize_result(request.params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": handlers::tool_definitions() })),
            "tools/call" => self.call_tool(request.params).await,
            other => Err(RpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => RpcResponse::success(id, result),
            Err(err) => RpcResponse::failure(id, err),
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, RpcError> {
        let params: ToolCallParams = serde_json::from_value(params.unwrap_or(Value::Null))
            .map_err(|e| RpcError::invalid_params(format!("Invalid tools/call params: {e}")))?;

        info!(tool = %params.name, "tool call");
        let result = handlers::call_tool(&params.name, params.arguments, &self.ctx).await?;
        if let Some(err) = &result.error {
            info!(tool = %params.name, error = %err, "tool call failed");
        }

        let call = ToolCallResult::from_result(&result).map_err(RpcError::internal)?;
        serde_json::to_value(call).map_err(RpcError::internal)
    }
}

fn initialize_result(params: Option<&Value>) -> Value {
    let protocol_version = params
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        }
    })
}
