//! `delete_files`: remove paths from the remote branch in one commit.

use crate::config::{ResolvedTarget, TargetOverrides};
use crate::errors::ToolError;
use crate::gateway::handlers::{object_schema, FileCommitOutcome, ToolContext};
use crate::gateway::protocol::{ToolDefinition, ToolResult};
use crate::git::Git;
use crate::github::models::{GitTree, TreeEntry};
use crate::push::branch::resolve_branch_base;
use crate::push::commit::commit_onto_base;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

pub const NAME: &str = "delete_files";

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteFilesArgs {
    pub message: String,
    pub paths: Vec<String>,
    #[serde(flatten)]
    pub target: TargetOverrides,
}

pub fn definition() -> ToolDefinition {
    let mut props = serde_json::Map::new();
    props.insert(
        "message".to_string(),
        json!({"type": "string", "description": "Commit message"}),
    );
    props.insert(
        "paths".to_string(),
        json!({
            "type": "array",
            "description": "Repo-relative file paths to delete",
            "items": {"type": "string"}
        }),
    );

    ToolDefinition {
        name: NAME.to_string(),
        description: "Delete files from the GitHub branch in a single commit. Paths that do \
                      not exist on the branch are ignored."
            .to_string(),
        input_schema: object_schema(props, &["message", "paths"]),
    }
}

pub async fn execute(args: DeleteFilesArgs, ctx: &ToolContext) -> ToolResult {
    run(args, ctx).await.into()
}

#[instrument(skip_all, fields(paths = args.paths.len()))]
async fn run(args: DeleteFilesArgs, ctx: &ToolContext) -> Result<FileCommitOutcome, ToolError> {
    let git = Git::new(&ctx.workspace_root);
    let target = ResolvedTarget::resolve(&args.target, &ctx.env, || git.current_branch().ok())?;
    if args.paths.is_empty() {
        return Err(ToolError::NoFiles);
    }

    let client = target.client()?;
    let base = resolve_branch_base(&client, &target).await?;
    let tree = client.get_tree_recursive(&base.base_tree_sha).await?;
    if tree.truncated {
        warn!(tree = %tree.sha, "remote tree listing truncated; some paths may be missed");
    }

    let entries = deletions_present_in(&tree, &args.paths);
    let deleted = entries.len();
    debug!(requested = args.paths.len(), deleted, "computed deletions");

    let commit = commit_onto_base(&client, &target.branch, &base, entries, &args.message, None).await?;

    Ok(FileCommitOutcome {
        sha: commit.sha,
        url: commit.html_url,
        message: format!("Successfully deleted {deleted} file(s)"),
    })
}

/// Deletion entries for the requested paths that exist as blobs in `tree`,
/// in request order, each path once.
fn deletions_present_in(tree: &GitTree, paths: &[String]) -> Vec<TreeEntry> {
    let existing: HashSet<&str> = tree
        .tree
        .iter()
        .filter(|item| item.is_blob())
        .map(|item| item.path.as_str())
        .collect();

    let mut seen = HashSet::new();
    paths
        .iter()
        .filter(|p| existing.contains(p.as_str()) && seen.insert(p.as_str()))
        .map(|p| TreeEntry::deleted(p.clone()))
        .collect()
}
