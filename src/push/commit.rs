//! Commit and ref recreation on the remote.

use crate::errors::ToolError;
use crate::github::models::{CommitAuthor, CreatedCommit, NewCommit, NewTree, TreeEntry};
use crate::github::GitHubClient;
use crate::push::branch::{apply_ref, BranchBase};
use tracing::{info, instrument};

/// Create a tree over `base`, commit it with `base` as the only parent, and
/// move `branch` to the new commit.
///
/// Blobs and trees uploaded before a failure are left unreferenced on GitHub;
/// they are inert and get garbage collected.
#[instrument(skip_all, fields(branch = %branch, entries = entries.len()))]
pub async fn commit_onto_base(
    client: &GitHubClient,
    branch: &str,
    base: &BranchBase,
    entries: Vec<TreeEntry>,
    message: &str,
    author: Option<CommitAuthor>,
) -> Result<CreatedCommit, ToolError> {
    let tree_sha = if entries.is_empty() {
        base.base_tree_sha.clone()
    } else {
        let tree = NewTree {
            base_tree: Some(base.base_tree_sha.clone()),
            tree: entries,
        };
        client.create_tree(&tree).await?.sha
    };

    let commit = client
        .create_commit(&NewCommit {
            message: message.to_string(),
            tree: tree_sha,
            parents: vec![base.base_sha.clone()],
            author,
        })
        .await?;

    apply_ref(client, branch, base.operation, &commit.sha).await?;

    info!(
        sha = %commit.sha,
        parent = %base.base_sha,
        operation = ?base.operation,
        "remote branch moved to new commit"
    );
    Ok(commit)
}
