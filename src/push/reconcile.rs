//! Bringing the local checkout in line with the commit just created remotely.
//!
//! Runs only after the remote ref moved. Nothing here can fail the push:
//! problems are logged and handed back as warnings.

use crate::git::Git;
use serde::Serialize;
use tracing::{debug, info, warn};

pub const REMOTE_NAME: &str = "origin";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub warnings: Vec<String>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Move `origin/{branch}` to `sha`. When `branch` is the one checked out,
/// also reset it to `sha` and set its upstream. No fetch is performed.
///
/// A checkout on some other branch (or a detached HEAD) is left alone.
pub fn sync_local_branch(git: &Git, branch: &str, sha: &str) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    let tracking_ref = format!("refs/remotes/{REMOTE_NAME}/{branch}");
    if let Err(e) = git.update_ref(&tracking_ref, sha) {
        warn!(error = %e, tracking_ref = %tracking_ref, "could not update remote-tracking ref");
        report
            .warnings
            .push(format!("Failed to update {tracking_ref}: {e}"));
    }

    match git.current_branch() {
        Ok(current) if current == branch => {
            if let Err(e) = git.reset_hard(sha) {
                warn!(error = %e, sha, "could not reset local branch");
                report
                    .warnings
                    .push(format!("Failed to reset local branch to {sha}: {e}"));
            }

            let upstream = format!("{REMOTE_NAME}/{branch}");
            if let Err(e) = git.set_upstream(&upstream) {
                debug!(error = %e, upstream = %upstream, "upstream tracking not set");
            }
        }
        Ok(current) => {
            warn!(checked_out = %current, branch, "checkout is on another branch, not resetting");
            report.warnings.push(format!(
                "Local checkout is on {current}, not {branch}; left it unchanged"
            ));
        }
        Err(e) => {
            warn!(error = %e, branch, "no checked-out branch, not resetting");
            report.warnings.push(format!(
                "Could not determine the checked-out branch ({e}); left the checkout unchanged"
            ));
        }
    }

    if report.is_clean() {
        info!(branch, sha, "local branch synced to remote commit");
    }
    report
}
