//! Recreating a local commit on GitHub through the Git Data API.
//!
//! Flow, strictly sequential:
//! 1. read the local commit (message, author, changed paths)
//! 2. resolve the remote base commit for the mode
//! 3. upload a blob per changed file, or mark it deleted
//! 4. create the tree, the commit, and create/update the branch ref
//! 5. sync local refs to the new commit (best effort)

pub mod blobs;
pub mod branch;
pub mod commit;
pub mod reconcile;

use crate::config::ResolvedTarget;
use crate::errors::ToolError;
use crate::git::{extract_local_commit_info, Git};
use crate::github::models::CommitAuthor;
use crate::github::GitHubClient;
use branch::RefOperation;
use tracing::{info, instrument};

/// A fully resolved `push_changes` call.
#[derive(Debug, Clone)]
pub struct PushRequest {
    pub commit_ref: String,
    pub target: ResolvedTarget,
}

/// What a successful push produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    pub local_commit_sha: String,
    pub sha: String,
    pub url: String,
    pub branch: String,
    pub operation: RefOperation,
    pub files_changed: Vec<String>,
    /// Local reconciliation problems; the push itself succeeded.
    pub warnings: Vec<String>,
}

impl PushOutcome {
    pub fn summary(&self) -> String {
        let verb = match self.operation {
            RefOperation::Create => "created branch",
            RefOperation::Update => "updated branch",
        };
        format!(
            "Successfully pushed commit {} ({} file(s)) and {} {}",
            short_sha(&self.sha),
            self.files_changed.len(),
            verb,
            self.branch
        )
    }
}

/// Recreate `request.commit_ref` on the remote branch.
#[instrument(skip_all, fields(commit_ref = %request.commit_ref, branch = %request.target.branch, mode = %request.target.mode))]
pub async fn push_changes(
    client: &GitHubClient,
    git: &Git,
    request: &PushRequest,
) -> Result<PushOutcome, ToolError> {
    let local = extract_local_commit_info(git, &request.commit_ref)?;
    if local.changed_paths.is_empty() {
        return Err(ToolError::NoChanges {
            commit_ref: request.commit_ref.clone(),
        });
    }

    let target = &request.target;
    let base = branch::resolve_branch_base(client, target).await?;
    let entries = blobs::build_tree_entries(client, git.workdir(), &local.changed_paths).await?;

    let author = CommitAuthor {
        name: local.author_name.clone(),
        email: local.author_email.clone(),
    };
    let created = commit::commit_onto_base(
        client,
        &target.branch,
        &base,
        entries,
        &local.message,
        Some(author),
    )
    .await?;

    let report = reconcile::sync_local_branch(git, &target.branch, &created.sha);

    info!(
        local_sha = %local.sha,
        remote_sha = %created.sha,
        parent_branch = %base.source_branch,
        operation = ?base.operation,
        files = local.changed_paths.len(),
        "push complete"
    );

    Ok(PushOutcome {
        local_commit_sha: local.sha,
        sha: created.sha,
        url: created.html_url,
        branch: target.branch.clone(),
        operation: base.operation,
        files_changed: local.changed_paths,
        warnings: report.warnings,
    })
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}
