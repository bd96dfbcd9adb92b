//! `github-file-ops serve`: run the stdio tool server.

use crate::config::Environment;
use crate::gateway::GatewayServer;
use anyhow::{Context, Result};
use std::path::Path;

pub async fn run_serve(workspace: &Path, env: Environment) -> Result<()> {
    let server = GatewayServer::new(workspace, env);
    server
        .run_stdio()
        .await
        .context("Tool server stopped unexpectedly")
}
