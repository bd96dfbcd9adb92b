//! Typed payloads for the GitHub Git Data API.
//!
//! One record per request body and per response shape this crate touches.
//! Responses only declare the fields that are actually read; serde ignores
//! the rest of what GitHub sends back.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// File mode for every tree entry this crate writes (regular, non-executable).
pub const REGULAR_FILE_MODE: &str = "100644";

// ── Responses ──

/// `GET /git/refs/heads/{branch}`, `PATCH /git/refs/heads/{branch}`, `POST /git/refs`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub name: String,
    pub object: ObjectRef,
}

/// A `{ "sha": ... }` pointer nested inside a larger object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObjectRef {
    pub sha: String,
}

/// `GET /git/commits/{sha}`
#[derive(Debug, Clone, Deserialize)]
pub struct GitCommit {
    pub sha: String,
    pub tree: ObjectRef,
}

/// `POST /git/blobs` and `POST /git/trees`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedObject {
    pub sha: String,
}

/// `POST /git/commits`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedCommit {
    pub sha: String,
    pub html_url: String,
}

/// `GET /git/trees/{sha}?recursive=1`
#[derive(Debug, Clone, Deserialize)]
pub struct GitTree {
    pub sha: String,
    #[serde(default)]
    pub tree: Vec<GitTreeItem>,
    /// Set when GitHub cut the listing short (very large trees).
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitTreeItem {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub sha: Option<String>,
}

impl GitTreeItem {
    pub fn is_blob(&self) -> bool {
        self.kind == "blob"
    }
}

/// `GET /pulls/{number}`
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub head: PullRequestBranch,
    pub base: PullRequestBranch,
}

/// One side of a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestBranch {
    #[serde(rename = "ref")]
    pub name: String,
    pub sha: String,
    /// `None` when the source repository was deleted.
    #[serde(default)]
    pub repo: Option<RepositoryName>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryName {
    pub full_name: String,
}

// ── Requests ──

/// How blob content is transported in `POST /git/blobs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlobEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "base64")]
    Base64,
}

/// `POST /git/blobs`
#[derive(Debug, Clone, Serialize)]
pub struct NewBlob {
    pub content: String,
    pub encoding: BlobEncoding,
}

/// What a tree entry points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeContent {
    /// An uploaded blob.
    Blob(String),
    /// Text that GitHub turns into a blob while building the tree.
    Inline(String),
    /// Remove the path from the base tree.
    Deleted,
}

/// One line item of `POST /git/trees`.
///
/// Serializes as `"sha": "<sha>"`, `"sha": null` or `"content": "<text>"`
/// depending on [`TreeContent`]; GitHub reads a null sha as a deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: String,
    pub content: TreeContent,
}

impl TreeEntry {
    pub fn blob(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: TreeContent::Blob(sha.into()),
        }
    }

    pub fn inline(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: TreeContent::Inline(content.into()),
        }
    }

    pub fn deleted(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: TreeContent::Deleted,
        }
    }

    pub fn is_deletion(&self) -> bool {
        self.content == TreeContent::Deleted
    }
}

impl Serialize for TreeEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("path", &self.path)?;
        map.serialize_entry("mode", REGULAR_FILE_MODE)?;
        map.serialize_entry("type", "blob")?;
        match &self.content {
            TreeContent::Blob(sha) => map.serialize_entry("sha", sha)?,
            TreeContent::Inline(content) => map.serialize_entry("content", content)?,
            TreeContent::Deleted => map.serialize_entry("sha", &Option::<String>::None)?,
        }
        map.end()
    }
}

/// `POST /git/trees`
#[derive(Debug, Clone, Serialize)]
pub struct NewTree {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_tree: Option<String>,
    pub tree: Vec<TreeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

/// `POST /git/commits`
#[derive(Debug, Clone, Serialize)]
pub struct NewCommit {
    pub message: String,
    pub tree: String,
    pub parents: Vec<String>,
    /// Omitted when the token's identity should author the commit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<CommitAuthor>,
}

/// `PATCH /git/refs/heads/{branch}`
#[derive(Debug, Clone, Serialize)]
pub struct RefUpdate {
    pub sha: String,
    pub force: bool,
}

impl RefUpdate {
    /// A fast-forward-only update: GitHub rejects it if the ref moved.
    pub fn non_force(sha: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            force: false,
        }
    }
}

/// `POST /git/refs`
#[derive(Debug, Clone, Serialize)]
pub struct NewRef {
    #[serde(rename = "ref")]
    pub name: String,
    pub sha: String,
}

impl NewRef {
    pub fn branch(branch: &str, sha: impl Into<String>) -> Self {
        Self {
            name: format!("refs/heads/{branch}"),
            sha: sha.into(),
        }
    }
}
