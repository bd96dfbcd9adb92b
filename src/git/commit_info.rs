//! Reading a local commit back out of the repository.

use crate::git::{Git, GitError};
use serde::Serialize;
use tracing::{debug, instrument};

/// Message, author and touched paths of one local commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalCommitInfo {
    /// Full SHA the commit reference resolved to.
    pub sha: String,
    /// Commit message with trailers, outer whitespace trimmed.
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    /// Repo-relative paths, in git's diff order.
    pub changed_paths: Vec<String>,
}

/// Extract a [`LocalCommitInfo`] for `commit_ref` (`HEAD`, a branch, a SHA...).
///
/// Author, not committer, identity is reported. Only the first parent is
/// diffed, so a merge commit lists what it changed relative to the branch it
/// was merged into.
#[instrument(skip(git))]
pub fn extract_local_commit_info(git: &Git, commit_ref: &str) -> Result<LocalCommitInfo, GitError> {
    let sha = git.resolve_commit(commit_ref)?;

    // `log.showSignature` would otherwise prepend gpg output to the fields.
    let raw = git.run_capture(&[
        "show",
        "-s",
        "--no-show-signature",
        "--format=%an%x00%ae%x00%B",
        &sha,
    ])?;
    let mut fields = raw.splitn(3, '\0');
    let (author_name, author_email, body) = match (fields.next(), fields.next(), fields.next()) {
        (Some(name), Some(email), Some(body)) => (name, email, body),
        _ => {
            return Err(GitError::Parse {
                command: format!("show -s {sha}"),
                detail: "missing author or message fields".to_string(),
            })
        }
    };

    let changed_paths = git.changed_paths(&sha)?;
    debug!(sha = %sha, files = changed_paths.len(), "extracted local commit");

    Ok(LocalCommitInfo {
        sha,
        message: body.trim().to_string(),
        author_name: author_name.to_string(),
        author_email: author_email.to_string(),
        changed_paths,
    })
}
