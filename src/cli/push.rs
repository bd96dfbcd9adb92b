//! `github-file-ops push`: one `push_changes` call from the shell.
//!
//! Prints the same result record the tool returns, so CI steps can parse it.

use crate::config::{Environment, TargetOverrides};
use crate::gateway::handlers::push_changes::{self, PushChangesArgs};
use crate::gateway::handlers::ToolContext;
use crate::github::GitHubClient;
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    pub commit_ref: Option<String>,
    pub mode: Option<String>,
    pub branch: Option<String>,
    /// Push to the head branch of this pull request instead of `branch`.
    pub pull_request: Option<u64>,
}

/// Returns whether the push succeeded; the result JSON is already on stdout.
pub async fn run_push(workspace: &Path, env: Environment, options: PushOptions) -> Result<bool> {
    let branch = match options.pull_request {
        Some(number) => Some(pull_request_branch(&env, number).await?),
        None => options.branch,
    };

    let ctx = ToolContext {
        workspace_root: workspace.to_path_buf(),
        env,
    };
    let args = PushChangesArgs {
        commit_ref: options.commit_ref,
        target: TargetOverrides {
            branch,
            mode: options.mode,
            ..Default::default()
        },
    };

    let result = push_changes::execute(args, &ctx).await;
    let json = serde_json::to_string_pretty(&result).context("Failed to encode push result")?;
    println!("{json}");

    Ok(result.success)
}

/// Head branch of pull request `number`, which must live in the target repository.
pub async fn pull_request_branch(env: &Environment, number: u64) -> Result<String> {
    let (Some(owner), Some(repo), Some(token)) = (&env.owner, &env.repo, &env.token) else {
        bail!("--pr needs REPO_OWNER, REPO_NAME and GITHUB_TOKEN");
    };

    let client = GitHubClient::new(env.api_url(), owner, repo, token.clone())?;
    let pr = client
        .get_pull_request(number)
        .await
        .with_context(|| format!("Failed to look up pull request #{number}"))?;

    let expected = format!("{owner}/{repo}");
    match pr.head.repo.as_ref().map(|r| r.full_name.as_str()) {
        Some(full_name) if full_name == expected => {}
        Some(full_name) => bail!(
            "Pull request #{number} comes from fork {full_name}; only branches in {expected} can be pushed"
        ),
        None => bail!("Pull request #{number} has no head repository"),
    }

    info!(number, branch = %pr.head.name, base = %pr.base.name, "resolved pull request branch");
    Ok(pr.head.name)
}
