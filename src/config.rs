//! Tool configuration: environment defaults plus per-call overrides.
//!
//! The process environment is read exactly once, in [`Environment::from_env`].
//! Each tool call then merges its explicit arguments over those defaults with
//! [`ResolvedTarget::resolve`], and the push logic only ever sees the
//! resolved, validated struct.

use crate::errors::ToolError;
use crate::github::{self, GitHubClient, DEFAULT_API_URL};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BASE_BRANCH: &str = "main";
pub const DEFAULT_COMMIT_REF: &str = "HEAD";

/// How the target branch relates to the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// The branch does not exist remotely yet: build on the base branch and
    /// create the ref.
    PrGen,
    /// The branch already exists remotely: build on it and update the ref.
    #[default]
    PrUpdate,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::PrGen => "pr-gen",
            Mode::PrUpdate => "pr-update",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pr-gen" | "pr_gen" => Ok(Mode::PrGen),
            "pr-update" | "pr_update" => Ok(Mode::PrUpdate),
            other => Err(ToolError::InvalidMode(other.to_string())),
        }
    }
}

/// Defaults sourced from the process environment.
///
/// Empty variables are treated as unset.
#[derive(Clone, Default)]
pub struct Environment {
    /// `REPO_OWNER`
    pub owner: Option<String>,
    /// `REPO_NAME`
    pub repo: Option<String>,
    /// `BRANCH_NAME`
    pub branch: Option<String>,
    /// `GITHUB_TOKEN`
    pub token: Option<String>,
    /// `DEVSY_MODE`
    pub mode: Option<String>,
    /// `DEVSY_BASE_BRANCH`
    pub base_branch: Option<String>,
    /// `GITHUB_API_URL`
    pub api_url: Option<String>,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("mode", &self.mode)
            .field("base_branch", &self.base_branch)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Environment {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map instead of the real env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| non_empty(lookup(key));
        Self {
            owner: get("REPO_OWNER"),
            repo: get("REPO_NAME"),
            branch: get("BRANCH_NAME"),
            token: get("GITHUB_TOKEN"),
            mode: get("DEVSY_MODE"),
            base_branch: get("DEVSY_BASE_BRANCH"),
            api_url: get("GITHUB_API_URL"),
        }
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn base_branch(&self) -> &str {
        self.base_branch.as_deref().unwrap_or(DEFAULT_BASE_BRANCH)
    }
}

/// Optional per-call arguments shared by every tool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetOverrides {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub github_token: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
}

/// Fully resolved destination of a tool call.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub token: String,
    pub mode: Mode,
    pub base_branch: String,
    pub api_url: String,
}

impl fmt::Debug for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedTarget")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("token", &"<redacted>")
            .field("mode", &self.mode)
            .field("base_branch", &self.base_branch)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl ResolvedTarget {
    /// Merge explicit arguments over environment defaults.
    ///
    /// Branch precedence is argument, then `BRANCH_NAME`, then
    /// `current_branch()` (the local checkout), which is only called when the
    /// first two are absent.
    pub fn resolve(
        overrides: &TargetOverrides,
        env: &Environment,
        current_branch: impl FnOnce() -> Option<String>,
    ) -> Result<Self, ToolError> {
        let owner = pick(&overrides.owner, &env.owner);
        let repo = pick(&overrides.repo, &env.repo);
        let token = pick(&overrides.github_token, &env.token);
        let branch = pick(&overrides.branch, &env.branch).or_else(|| non_empty(current_branch()));

        let (Some(owner), Some(repo), Some(branch), Some(token)) = (owner, repo, branch, token)
        else {
            return Err(ToolError::MissingParameters);
        };

        let mode = match pick(&overrides.mode, &env.mode) {
            Some(raw) => raw.parse::<Mode>()?,
            None => Mode::default(),
        };

        Ok(Self {
            owner,
            repo,
            branch,
            token,
            mode,
            base_branch: env.base_branch().to_string(),
            api_url: env.api_url().to_string(),
        })
    }

    pub fn client(&self) -> Result<GitHubClient, github::Error> {
        GitHubClient::new(&self.api_url, &self.owner, &self.repo, self.token.clone())
    }
}

fn pick(explicit: &Option<String>, fallback: &Option<String>) -> Option<String> {
    non_empty(explicit.clone()).or_else(|| non_empty(fallback.clone()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
