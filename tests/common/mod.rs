//! Shared fixtures: throwaway git checkouts and a mock GitHub repository.

#![allow(dead_code)]

use github_file_ops::config::Environment;
use github_file_ops::gateway::handlers::ToolContext;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const OWNER: &str = "testowner";
pub const REPO: &str = "testrepo";
pub const TOKEN: &str = "token123";

pub const BASE_SHA: &str = "1111111111111111111111111111111111111111";
pub const BASE_TREE_SHA: &str = "2222222222222222222222222222222222222222";
pub const NEW_TREE_SHA: &str = "3333333333333333333333333333333333333333";
pub const NEW_COMMIT_SHA: &str = "4444444444444444444444444444444444444444";
pub const BLOB_SHA: &str = "5555555555555555555555555555555555555555";

pub fn repo_path(suffix: &str) -> String {
    format!("/repos/{OWNER}/{REPO}{suffix}")
}

// ── Local checkout ──

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

pub fn init_repo() -> TempDir {
    let tmp = TempDir::new().unwrap();
    git(tmp.path(), &["init", "-q", "-b", "main"]);
    git(tmp.path(), &["config", "user.name", "Test Author"]);
    git(tmp.path(), &["config", "user.email", "author@example.com"]);
    git(tmp.path(), &["config", "commit.gpgsign", "false"]);
    tmp
}

pub fn write(dir: &Path, rel: &str, content: impl AsRef<[u8]>) {
    let full = dir.join(rel);
    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(full, content).unwrap();
}

pub fn commit_all(dir: &Path, message: &str) -> String {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "--allow-empty", "-m", message]);
    git(dir, &["rev-parse", "HEAD"])
}

// ── Tool context ──

/// Context pointing at `server` with the standard owner/repo/token.
pub fn context(workspace: &Path, server: &MockServer, extra: &[(&str, &str)]) -> ToolContext {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("REPO_OWNER".to_string(), OWNER.to_string()),
        ("REPO_NAME".to_string(), REPO.to_string()),
        ("GITHUB_TOKEN".to_string(), TOKEN.to_string()),
        ("GITHUB_API_URL".to_string(), server.uri()),
    ]);
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    ToolContext {
        workspace_root: workspace.to_path_buf(),
        env: Environment::from_lookup(|k| vars.get(k).cloned()),
    }
}

// ── Mock GitHub ──

pub async fn mock_branch_ref(server: &MockServer, branch: &str, sha: &str) {
    Mock::given(method("GET"))
        .and(path(repo_path(&format!("/git/refs/heads/{branch}"))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ref": format!("refs/heads/{branch}"),
            "object": {"sha": sha, "type": "commit"}
        })))
        .mount(server)
        .await;
}

pub async fn mock_missing_ref(server: &MockServer, branch: &str) {
    Mock::given(method("GET"))
        .and(path(repo_path(&format!("/git/refs/heads/{branch}"))))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found"
        })))
        .mount(server)
        .await;
}

pub async fn mock_base_commit(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(repo_path(&format!("/git/commits/{BASE_SHA}"))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": BASE_SHA,
            "tree": {"sha": BASE_TREE_SHA}
        })))
        .mount(server)
        .await;
}

pub async fn mock_create_blob(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(repo_path("/git/blobs")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": BLOB_SHA})))
        .mount(server)
        .await;
}

pub async fn mock_create_tree(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(repo_path("/git/trees")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": NEW_TREE_SHA})))
        .mount(server)
        .await;
}

pub async fn mock_create_commit(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(repo_path("/git/commits")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "sha": NEW_COMMIT_SHA,
            "html_url": commit_url()
        })))
        .mount(server)
        .await;
}

pub async fn mock_update_ref(server: &MockServer, branch: &str, status: u16) {
    let body = if status == 200 {
        json!({
            "ref": format!("refs/heads/{branch}"),
            "object": {"sha": NEW_COMMIT_SHA}
        })
    } else {
        json!({"message": "Update is not a fast forward"})
    };
    Mock::given(method("PATCH"))
        .and(path(repo_path(&format!("/git/refs/heads/{branch}"))))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mock_create_ref(server: &MockServer, branch: &str) {
    Mock::given(method("POST"))
        .and(path(repo_path("/git/refs")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ref": format!("refs/heads/{branch}"),
            "object": {"sha": NEW_COMMIT_SHA}
        })))
        .mount(server)
        .await;
}

/// Everything after the base lookup, for a branch that already exists.
pub async fn mock_write_path(server: &MockServer, branch: &str) {
    mock_create_blob(server).await;
    mock_create_tree(server).await;
    mock_create_commit(server).await;
    mock_update_ref(server, branch, 200).await;
}

pub fn commit_url() -> String {
    format!("https://github.com/{OWNER}/{REPO}/commit/{NEW_COMMIT_SHA}")
}

// ── Inspecting what was sent ──

pub async fn requests(server: &MockServer) -> Vec<Request> {
    server.received_requests().await.unwrap_or_default()
}

/// `METHOD /path` for each request, in arrival order, with the repo prefix
/// stripped.
pub async fn request_log(server: &MockServer) -> Vec<String> {
    let prefix = repo_path("");
    requests(server)
        .await
        .iter()
        .map(|r| {
            let p = r.url.path();
            format!("{} {}", r.method, p.strip_prefix(&prefix).unwrap_or(p))
        })
        .collect()
}

/// JSON bodies of every request matching `verb` and `suffix`.
pub async fn bodies(server: &MockServer, verb: &str, suffix: &str) -> Vec<Value> {
    let full = repo_path(suffix);
    requests(server)
        .await
        .iter()
        .filter(|r| r.method.as_str() == verb && r.url.path() == full)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}
