//! Authenticated client for the handful of Git Data and Pulls API calls this
//! crate makes.
//!
//! Every call is scoped to one repository and carries the bearer token and
//! the pinned API version header. A non-2xx status turns into
//! [`Error::Api`] with the raw response body; there is no retry.

use crate::github::models::{
    CreatedCommit, CreatedObject, GitCommit, GitRef, GitTree, NewBlob, NewCommit, NewRef,
    NewTree, PullRequest, RefUpdate,
};
use crate::github::Error;
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Public GitHub API root; GitHub Enterprise runners export `GITHUB_API_URL`.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("github-file-ops/", env!("CARGO_PKG_VERSION"));

/// Git Data API client bound to a single `owner/repo`.
pub struct GitHubClient {
    http: reqwest::Client,
    /// `{api_url}/repos/{owner}/{repo}`
    repo_url: Url,
    token: String,
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("repo_url", &self.repo_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

impl GitHubClient {
    pub fn new(api_url: &str, owner: &str, repo: &str, token: impl Into<String>) -> Result<Self, Error> {
        let invalid = |reason: String| Error::InvalidApiUrl {
            url: api_url.to_string(),
            reason,
        };

        let mut repo_url = Url::parse(api_url).map_err(|e| invalid(e.to_string()))?;
        repo_url
            .path_segments_mut()
            .map_err(|_| invalid("not a hierarchical URL".to_string()))?
            .pop_if_empty()
            .extend(["repos", owner, repo]);

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            repo_url,
            token: token.into(),
        })
    }

    /// `GET /git/refs/heads/{branch}`
    pub async fn get_branch_ref(&self, branch: &str) -> Result<GitRef, Error> {
        self.get(self.branch_ref_url(branch)).await
    }

    /// `GET /git/commits/{sha}`
    pub async fn get_commit(&self, sha: &str) -> Result<GitCommit, Error> {
        self.get(self.endpoint(["git", "commits", sha])).await
    }

    /// `GET /git/trees/{sha}?recursive=1`
    pub async fn get_tree_recursive(&self, sha: &str) -> Result<GitTree, Error> {
        let mut url = self.endpoint(["git", "trees", sha]);
        url.query_pairs_mut().append_pair("recursive", "1");
        self.get(url).await
    }

    /// `POST /git/blobs`
    pub async fn create_blob(&self, blob: &NewBlob) -> Result<CreatedObject, Error> {
        self.send(Method::POST, self.endpoint(["git", "blobs"]), blob)
            .await
    }

    /// `POST /git/trees`
    pub async fn create_tree(&self, tree: &NewTree) -> Result<CreatedObject, Error> {
        self.send(Method::POST, self.endpoint(["git", "trees"]), tree)
            .await
    }

    /// `POST /git/commits`
    pub async fn create_commit(&self, commit: &NewCommit) -> Result<CreatedCommit, Error> {
        self.send(Method::POST, self.endpoint(["git", "commits"]), commit)
            .await
    }

    /// `PATCH /git/refs/heads/{branch}`
    pub async fn update_branch_ref(&self, branch: &str, update: &RefUpdate) -> Result<GitRef, Error> {
        self.send(Method::PATCH, self.branch_ref_url(branch), update)
            .await
    }

    /// `POST /git/refs`
    pub async fn create_ref(&self, new_ref: &NewRef) -> Result<GitRef, Error> {
        self.send(Method::POST, self.endpoint(["git", "refs"]), new_ref)
            .await
    }

    /// `GET /pulls/{number}`
    pub async fn get_pull_request(&self, number: u64) -> Result<PullRequest, Error> {
        let number = number.to_string();
        self.get(self.endpoint(["pulls", number.as_str()])).await
    }

    /// Repository URL with `segments` appended, each one percent-encoded.
    fn endpoint<I>(&self, segments: I) -> Url
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.repo_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            // `Url` passes `%` through untouched; escape it so it stays literal.
            path.extend(segments.into_iter().map(|s| s.as_ref().replace('%', "%25")));
        }
        url
    }

    /// Branch names keep their `/` separators; every other reserved
    /// character (`#`, `?`, `%`, spaces) is encoded inside its segment.
    fn branch_ref_url(&self, branch: &str) -> Url {
        self.endpoint(["git", "refs", "heads"].into_iter().chain(branch.split('/')))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        self.request(Method::GET, url, None::<&()>).await
    }

    async fn send<T, B>(&self, method: Method, url: Url, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(method, url, Some(body)).await
    }

    async fn request<T, B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let path = url.path().to_string();
        debug!(method = %method, path = %path, "GitHub request");

        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .bearer_auth(&self.token);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            debug!(status = status.as_u16(), path = %path, "GitHub request rejected");
            return Err(Error::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
