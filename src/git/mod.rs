//! Local git adapter.
//!
//! All local repository access goes through `git` subprocesses run in the
//! workspace directory. The wrapper stays small and explicit: each method maps
//! to one or two plumbing commands with machine-readable output.

pub mod commit_info;

pub use commit_info::{extract_local_commit_info, LocalCommitInfo};

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::{debug, instrument};

/// Failure of a local git invocation.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("failed to run git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {command} failed: {stderr}")]
    Failed { command: String, stderr: String },

    #[error("unexpected output from git {command}: {detail}")]
    Parse { command: String, detail: String },
}

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Name of the checked-out branch (errors on detached HEAD).
    pub fn current_branch(&self) -> Result<String, GitError> {
        let out = self.run_capture(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let name = out.trim().to_string();
        if name == "HEAD" {
            return Err(GitError::Parse {
                command: "rev-parse --abbrev-ref HEAD".to_string(),
                detail: "detached HEAD".to_string(),
            });
        }
        Ok(name)
    }

    /// Resolve a revision to a full commit SHA.
    pub fn resolve_commit(&self, rev: &str) -> Result<String, GitError> {
        let revision = format!("{rev}^{{commit}}");
        let out = self.run_capture(&["rev-parse", "--verify", &revision])?;
        Ok(out.trim().to_string())
    }

    /// First parent of a commit, `None` for a root commit.
    pub fn first_parent(&self, sha: &str) -> Result<Option<String>, GitError> {
        let revision = format!("{sha}^1");
        let output = self.run(&["rev-parse", "--verify", "--quiet", &revision])?;
        if !output.status.success() {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
    }

    /// Paths whose content differs between `sha` and its first parent.
    ///
    /// A root commit is diffed against the empty tree, so every file it
    /// introduces is listed.
    pub fn changed_paths(&self, sha: &str) -> Result<Vec<String>, GitError> {
        let out = match self.first_parent(sha)? {
            Some(parent) => {
                self.run_capture(&["diff", "--no-renames", "--name-only", "-z", &parent, sha])?
            }
            None => self.run_capture(&[
                "diff-tree",
                "--root",
                "-r",
                "--no-renames",
                "--no-commit-id",
                "--name-only",
                "-z",
                sha,
            ])?,
        };

        Ok(out
            .split('\0')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Point `refname` at `sha` without touching the network.
    #[instrument(skip(self))]
    pub fn update_ref(&self, refname: &str, sha: &str) -> Result<(), GitError> {
        self.run_checked(&["update-ref", refname, sha])?;
        Ok(())
    }

    /// Move the current branch, index and working tree to `sha`.
    #[instrument(skip(self))]
    pub fn reset_hard(&self, sha: &str) -> Result<(), GitError> {
        self.run_checked(&["reset", "--hard", sha])?;
        Ok(())
    }

    /// Make the current branch track `upstream` (e.g. `origin/feat/x`).
    pub fn set_upstream(&self, upstream: &str) -> Result<(), GitError> {
        let arg = format!("--set-upstream-to={upstream}");
        self.run_checked(&["branch", &arg])?;
        Ok(())
    }

    pub(crate) fn run_capture(&self, args: &[&str]) -> Result<String, GitError> {
        let output = self.run_checked(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn run_checked(&self, args: &[&str]) -> Result<Output, GitError> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::Failed {
                command: args.join(" "),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(output)
    }

    fn run(&self, args: &[&str]) -> Result<Output, GitError> {
        debug!(args = %args.join(" "), "git");
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| GitError::Spawn {
                command: args.join(" "),
                source,
            })
    }
}

#[cfg(test)]
pub(crate) mod test_repo {
    //! Throwaway repositories for unit tests.

    use std::path::Path;
    use std::process::Command;
    use tempfile::TempDir;

    pub fn git(dir: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .expect("spawn git");
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    pub fn init() -> TempDir {
        let tmp = TempDir::new().unwrap();
        git(tmp.path(), &["init", "-q", "-b", "main"]);
        git(tmp.path(), &["config", "user.name", "Test Author"]);
        git(tmp.path(), &["config", "user.email", "author@example.com"]);
        git(tmp.path(), &["config", "commit.gpgsign", "false"]);
        tmp
    }

    pub fn commit_all(dir: &Path, message: &str) -> String {
        git(dir, &["add", "-A"]);
        git(dir, &["commit", "-q", "--allow-empty", "-m", message]);
        git(dir, &["rev-parse", "HEAD"])
    }
}
