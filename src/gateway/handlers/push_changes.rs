//! `push_changes`: recreate a local commit on the remote branch.

use crate::config::{ResolvedTarget, TargetOverrides, DEFAULT_COMMIT_REF};
use crate::errors::ToolError;
use crate::gateway::handlers::{object_schema, ToolContext};
use crate::gateway::protocol::{ToolDefinition, ToolResult};
use crate::git::Git;
use crate::push::{self, PushOutcome, PushRequest};
use serde::Deserialize;
use serde_json::json;

pub const NAME: &str = "push_changes";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushChangesArgs {
    /// Local commit to recreate (default `HEAD`).
    #[serde(default)]
    pub commit_ref: Option<String>,
    #[serde(flatten)]
    pub target: TargetOverrides,
}

pub fn definition() -> ToolDefinition {
    let mut props = serde_json::Map::new();
    props.insert(
        "commit_ref".to_string(),
        json!({
            "type": "string",
            "description": "Local commit to push (default HEAD)",
            "default": DEFAULT_COMMIT_REF
        }),
    );

    ToolDefinition {
        name: NAME.to_string(),
        description: "Push a local commit to GitHub through the API so that checks run. \
                      Recreates the commit (message, author, and the current working-tree \
                      content of every changed file, including pre-commit hook fixes) on the \
                      remote branch, then syncs the local branch to the new commit."
            .to_string(),
        input_schema: object_schema(props, &[]),
    }
}

pub async fn execute(args: PushChangesArgs, ctx: &ToolContext) -> ToolResult {
    run(args, ctx).await.into()
}

async fn run(args: PushChangesArgs, ctx: &ToolContext) -> Result<PushOutcome, ToolError> {
    let git = Git::new(&ctx.workspace_root);
    let target = ResolvedTarget::resolve(&args.target, &ctx.env, || git.current_branch().ok())?;

    let commit_ref = args
        .commit_ref
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_COMMIT_REF.to_string());

    let client = target.client()?;
    push::push_changes(&client, &git, &PushRequest { commit_ref, target }).await
}
