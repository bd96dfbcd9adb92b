//! Deciding what the new commit is built on and how the ref moves.

use crate::config::{Mode, ResolvedTarget};
use crate::errors::ToolError;
use crate::github::models::{GitRef, NewRef, RefUpdate};
use crate::github::GitHubClient;
use tracing::{debug, instrument};

/// What happens to `refs/heads/{branch}` once the commit exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefOperation {
    /// `POST /git/refs`: the branch is new on the remote.
    Create,
    /// Non-force `PATCH /git/refs/heads/{branch}`.
    Update,
}

/// Parent commit and base tree for the commit about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchBase {
    /// Remote branch the base was read from.
    pub source_branch: String,
    pub base_sha: String,
    pub base_tree_sha: String,
    pub operation: RefOperation,
}

/// Look up the base commit for `target`.
///
/// `pr-gen` reads the configured base branch and plans a create; `pr-update`
/// reads the target branch itself and plans an update. A missing ref is an
/// error in both modes.
#[instrument(skip_all, fields(mode = %target.mode, branch = %target.branch))]
pub async fn resolve_branch_base(
    client: &GitHubClient,
    target: &ResolvedTarget,
) -> Result<BranchBase, ToolError> {
    let (source_branch, operation) = match target.mode {
        Mode::PrGen => (target.base_branch.as_str(), RefOperation::Create),
        Mode::PrUpdate => (target.branch.as_str(), RefOperation::Update),
    };

    let git_ref = client.get_branch_ref(source_branch).await?;
    let base_sha = git_ref.object.sha;
    let base_commit = client.get_commit(&base_sha).await?;

    debug!(
        source_branch,
        base_sha = %base_sha,
        base_tree = %base_commit.tree.sha,
        ?operation,
        "resolved branch base"
    );

    Ok(BranchBase {
        source_branch: source_branch.to_string(),
        base_sha,
        base_tree_sha: base_commit.tree.sha,
        operation,
    })
}

/// Point `refs/heads/{branch}` at `sha` using the planned operation.
pub async fn apply_ref(
    client: &GitHubClient,
    branch: &str,
    operation: RefOperation,
    sha: &str,
) -> Result<GitRef, ToolError> {
    let updated = match operation {
        RefOperation::Update => {
            client
                .update_branch_ref(branch, &RefUpdate::non_force(sha))
                .await?
        }
        RefOperation::Create => client.create_ref(&NewRef::branch(branch, sha)).await?,
    };
    Ok(updated)
}
