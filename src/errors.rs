//! Failure taxonomy shared by every tool.
//!
//! Tools return `Result<_, ToolError>` internally; the gateway turns the error
//! into a `success: false` record with the rendered message, so the wording
//! here is what the agent reads.

use crate::git::GitError;
use crate::github;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Owner, repo, branch or token could not be resolved. Raised before any I/O.
    #[error("Missing required parameters: owner, repo, branch, or github_token")]
    MissingParameters,

    /// The commit exists but touches no paths.
    #[error("No files changed in commit {commit_ref}")]
    NoChanges { commit_ref: String },

    /// `commit_files` / `delete_files` called with an empty list.
    #[error("No files provided")]
    NoFiles,

    #[error("Unsupported mode '{0}': expected 'pr-gen' or 'pr-update'")]
    InvalidMode(String),

    #[error("Failed to read local repository: {0}")]
    Git(#[from] GitError),

    /// A changed path exists in the working tree but could not be read.
    #[error("Failed to read {path}: {source}")]
    LocalFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    GitHub(#[from] github::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_distinguish_no_changes_from_api_rejection() {
        let no_changes = ToolError::NoChanges {
            commit_ref: "HEAD".to_string(),
        };
        let rejected = ToolError::from(github::Error::Api {
            status: 422,
            body: "Update is not a fast forward".to_string(),
        });

        assert_eq!(no_changes.to_string(), "No files changed in commit HEAD");
        assert_eq!(
            rejected.to_string(),
            "GitHub API error: 422 Update is not a fast forward"
        );
    }

    #[test]
    fn test_git_errors_keep_context() {
        let err = ToolError::from(GitError::Failed {
            command: "rev-parse --verify nope^{commit}".to_string(),
            stderr: "fatal: Needed a single revision".to_string(),
        });
        let message = err.to_string();
        assert!(message.starts_with("Failed to read local repository"));
        assert!(message.contains("Needed a single revision"));
    }
}
