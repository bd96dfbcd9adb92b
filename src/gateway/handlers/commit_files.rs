//! `commit_files`: commit literal file contents supplied by the agent.

use crate::config::{ResolvedTarget, TargetOverrides};
use crate::errors::ToolError;
use crate::gateway::handlers::{object_schema, FileCommitOutcome, ToolContext};
use crate::gateway::protocol::{ToolDefinition, ToolResult};
use crate::git::Git;
use crate::github::models::TreeEntry;
use crate::push::branch::resolve_branch_base;
use crate::push::commit::commit_onto_base;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use tracing::instrument;

pub const NAME: &str = "commit_files";

#[derive(Debug, Clone, Deserialize)]
pub struct FileContent {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitFilesArgs {
    pub message: String,
    pub files: Vec<FileContent>,
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
        "files".to_string(),
        json!({
            "type": "array",
            "description": "Files to write, each with a repo-relative path and full text content",
            "items": {
                "type": "object",
                "properties": {
                    "path": {"type": "string"},
                    "content": {"type": "string"}
                },
                "required": ["path", "content"]
            }
        }),
    );

    ToolDefinition {
        name: NAME.to_string(),
        description: "Commit one or more text files to the GitHub branch in a single commit."
            .to_string(),
        input_schema: object_schema(props, &["message", "files"]),
    }
}

pub async fn execute(args: CommitFilesArgs, ctx: &ToolContext) -> ToolResult {
    run(args, ctx).await.into()
}

#[instrument(skip_all, fields(files = args.files.len()))]
async fn run(args: CommitFilesArgs, ctx: &ToolContext) -> Result<FileCommitOutcome, ToolError> {
    let git = Git::new(&ctx.workspace_root);
    let target = ResolvedTarget::resolve(&args.target, &ctx.env, || git.current_branch().ok())?;
    let entries = dedupe_last_wins(args.files);
    if entries.is_empty() {
        return Err(ToolError::NoFiles);
    }

    let client = target.client()?;
    let base = resolve_branch_base(&client, &target).await?;
    let count = entries.len();
    let commit = commit_onto_base(&client, &target.branch, &base, entries, &args.message, None).await?;

    Ok(FileCommitOutcome {
        sha: commit.sha,
        url: commit.html_url,
        message: format!("Successfully committed {count} file(s)"),
    })
}

/// One inline entry per path; a later file with the same path replaces the
/// earlier one but keeps its position.
fn dedupe_last_wins(files: Vec<FileContent>) -> Vec<TreeEntry> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<TreeEntry> = Vec::with_capacity(files.len());
    for file in files {
        match index.get(&file.path) {
            Some(&i) => entries[i] = TreeEntry::inline(file.path, file.content),
            None => {
                index.insert(file.path.clone(), entries.len());
                entries.push(TreeEntry::inline(file.path, file.content));
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::models::TreeContent;

    fn file(path: &str, content: &str) -> FileContent {
        FileContent {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_duplicate_paths_keep_last_content() {
        let entries = dedupe_last_wins(vec![
            file("a.txt", "first"),
            file("b.txt", "b"),
            file("a.txt", "second"),
        ]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "a.txt");
        assert_eq!(entries[0].content, TreeContent::Inline("second".to_string()));
        assert_eq!(entries[1].path, "b.txt");
    }

    #[test]
    fn test_args_accept_target_overrides() {
        let args: CommitFilesArgs = serde_json::from_value(json!({
            "message": "Test commit",
            "files": [{"path": "test.txt", "content": "Hello World"}],
            "owner": "testowner",
            "branch": "main"
        }))
        .unwrap();
        assert_eq!(args.files.len(), 1);
        assert_eq!(args.target.owner.as_deref(), Some("testowner"));
        assert_eq!(args.target.branch.as_deref(), Some("main"));
        assert!(args.target.repo.is_none());
    }
}
