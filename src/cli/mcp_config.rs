//! `github-file-ops mcp-config`: emit the agent's server configuration.
//!
//! In a GitHub Actions job the JSON is appended to `$GITHUB_OUTPUT` as
//! `mcp_config=<json>`; elsewhere it is printed. Modes that never commit
//! (`plan-gen`) get an empty configuration.

use crate::config::Mode;
use crate::gateway::server::SERVER_NAME;
use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

pub const OUTPUT_KEY: &str = "mcp_config";
const PLAN_MODE: &str = "plan-gen";
const DEFAULT_BRANCH: &str = "main";

/// Workflow variables the configuration is derived from.
#[derive(Debug, Clone, Default)]
pub struct WorkflowEnv {
    /// `GITHUB_REPOSITORY`, as `owner/name`
    pub repository: Option<String>,
    /// `GITHUB_HEAD_REF`, set on pull request events
    pub head_ref: Option<String>,
    /// `GITHUB_REF_NAME`
    pub ref_name: Option<String>,
    /// `GITHUB_TOKEN`
    pub token: Option<String>,
}

impl WorkflowEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            repository: get("GITHUB_REPOSITORY"),
            head_ref: get("GITHUB_HEAD_REF"),
            ref_name: get("GITHUB_REF_NAME"),
            token: get("GITHUB_TOKEN"),
        }
    }

    fn branch(&self) -> &str {
        self.head_ref
            .as_deref()
            .or(self.ref_name.as_deref())
            .unwrap_or(DEFAULT_BRANCH)
    }
}

/// How the agent should launch this server.
#[derive(Debug, Clone)]
pub struct ServerCommand {
    pub command: String,
    pub args: Vec<String>,
}

/// Build the `mcpServers` configuration for `mode`.
pub fn generate_config(mode: &str, env: &WorkflowEnv, server: &ServerCommand) -> Result<Value> {
    if mode.trim().eq_ignore_ascii_case(PLAN_MODE) {
        return Ok(json!({}));
    }
    let mode: Mode = mode.parse()?;

    let Some((owner, repo)) = env
        .repository
        .as_deref()
        .and_then(|r| r.split_once('/'))
        .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty())
    else {
        warn!(
            repository = ?env.repository,
            "could not determine owner/name from GITHUB_REPOSITORY"
        );
        return Ok(json!({}));
    };

    let Some(token) = env.token.as_deref() else {
        bail!("GITHUB_TOKEN is not set");
    };

    Ok(json!({
        "mcpServers": {
            (SERVER_NAME): {
                "command": server.command,
                "args": server.args,
                "env": {
                    "GITHUB_TOKEN": token,
                    "REPO_OWNER": owner,
                    "REPO_NAME": repo,
                    "BRANCH_NAME": env.branch(),
                    "DEVSY_MODE": mode.as_str(),
                }
            }
        }
    }))
}

/// Append `key=value` to a GitHub Actions output file.
pub fn append_output(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    writeln!(file, "{key}={}", value.replace('\n', ""))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn run_mcp_config(mode: &str, server: &ServerCommand) -> Result<()> {
    let config = generate_config(mode, &WorkflowEnv::from_env(), server)?;
    let enabled = config.get("mcpServers").is_some();
    let rendered = serde_json::to_string(&config).context("Failed to encode configuration")?;

    match std::env::var_os("GITHUB_OUTPUT").filter(|p| !p.is_empty()) {
        Some(path) => append_output(Path::new(&path), OUTPUT_KEY, &rendered)?,
        None => println!("{OUTPUT_KEY}={rendered}"),
    }

    if enabled {
        info!(mode, "server configuration prepared");
    } else {
        info!(mode, "server not needed for this mode");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn server() -> ServerCommand {
        ServerCommand {
            command: "github-file-ops".to_string(),
            args: vec!["serve".to_string()],
        }
    }

    fn workflow(vars: &[(&str, &str)]) -> WorkflowEnv {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WorkflowEnv::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_pr_update_config_shape() {
        let env = workflow(&[
            ("GITHUB_REPOSITORY", "octo/widgets"),
            ("GITHUB_HEAD_REF", "feature/x"),
            ("GITHUB_REF_NAME", "42/merge"),
            ("GITHUB_TOKEN", "ghs_abc"),
        ]);
        let config = generate_config("pr-update", &env, &server()).unwrap();
        let entry = &config["mcpServers"]["github-file-ops"];
        assert_eq!(entry["command"], "github-file-ops");
        assert_eq!(entry["args"], json!(["serve"]));
        assert_eq!(entry["env"]["REPO_OWNER"], "octo");
        assert_eq!(entry["env"]["REPO_NAME"], "widgets");
        assert_eq!(entry["env"]["BRANCH_NAME"], "feature/x");
        assert_eq!(entry["env"]["GITHUB_TOKEN"], "ghs_abc");
        assert_eq!(entry["env"]["DEVSY_MODE"], "pr-update");
    }

    #[test]
    fn test_branch_falls_back_to_ref_name_then_main() {
        let env = workflow(&[
            ("GITHUB_REPOSITORY", "octo/widgets"),
            ("GITHUB_REF_NAME", "release"),
            ("GITHUB_TOKEN", "t"),
        ]);
        let config = generate_config("pr-gen", &env, &server()).unwrap();
        let entry = &config["mcpServers"]["github-file-ops"];
        assert_eq!(entry["env"]["BRANCH_NAME"], "release");
        assert_eq!(entry["env"]["DEVSY_MODE"], "pr-gen");

        let env = workflow(&[("GITHUB_REPOSITORY", "octo/widgets"), ("GITHUB_TOKEN", "t")]);
        let config = generate_config("pr-update", &env, &server()).unwrap();
        assert_eq!(
            config["mcpServers"]["github-file-ops"]["env"]["BRANCH_NAME"],
            "main"
        );
    }

    #[test]
    fn test_plan_mode_is_empty() {
        let env = workflow(&[("GITHUB_REPOSITORY", "octo/widgets"), ("GITHUB_TOKEN", "t")]);
        assert_eq!(generate_config("plan-gen", &env, &server()).unwrap(), json!({}));
    }

    #[test]
    fn test_malformed_repository_is_empty() {
        for repo in ["widgets", "/widgets", "octo/"] {
            let env = workflow(&[("GITHUB_REPOSITORY", repo), ("GITHUB_TOKEN", "t")]);
            assert_eq!(
                generate_config("pr-update", &env, &server()).unwrap(),
                json!({}),
                "{repo}"
            );
        }
    }

    #[test]
    fn test_unknown_mode_and_missing_token_fail() {
        let env = workflow(&[("GITHUB_REPOSITORY", "octo/widgets")]);
        assert!(generate_config("pr-update", &env, &server()).is_err());
        assert!(generate_config("yolo", &env, &server()).is_err());
    }

    #[test]
    fn test_append_output_keeps_existing_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "other=1\n").unwrap();

        append_output(&path, OUTPUT_KEY, "{\"a\":\n1}").unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "other=1\nmcp_config={\"a\":1}\n");
    }
}
