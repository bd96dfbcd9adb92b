//! Turning changed paths into tree entries.
//!
//! Content comes from the working tree as it is now, not from the commit
//! object, so anything a pre-commit hook rewrote after the commit is what
//! lands on GitHub.

use crate::errors::ToolError;
use crate::github::models::{BlobEncoding, NewBlob, TreeEntry};
use crate::github::GitHubClient;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, instrument};

/// Encode raw file bytes for `POST /git/blobs`: UTF-8 text as-is, anything
/// else base64.
pub fn encode_blob(bytes: Vec<u8>) -> NewBlob {
    match String::from_utf8(bytes) {
        Ok(text) => NewBlob {
            content: text,
            encoding: BlobEncoding::Utf8,
        },
        Err(err) => NewBlob {
            content: STANDARD.encode(err.into_bytes()),
            encoding: BlobEncoding::Base64,
        },
    }
}

/// Current bytes of `path` in the working tree, `None` if it is gone.
///
/// Only "no such file" counts as gone. A path that exists but cannot be read
/// is an error, never a deletion.
pub fn read_working_file(workdir: &Path, path: &str) -> Result<Option<Vec<u8>>, ToolError> {
    match fs::read(workdir.join(path)) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(None),
        Err(source) => Err(ToolError::LocalFile {
            path: path.to_string(),
            source,
        }),
    }
}

/// Build one tree entry per distinct path, uploading blobs one at a time in
/// path order. Paths missing from disk become deletions and upload nothing.
#[instrument(skip_all, fields(files = paths.len()))]
pub async fn build_tree_entries(
    client: &GitHubClient,
    workdir: &Path,
    paths: &[String],
) -> Result<Vec<TreeEntry>, ToolError> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(paths.len());

    for path in paths {
        if !seen.insert(path.as_str()) {
            continue;
        }

        match read_working_file(workdir, path)? {
            Some(bytes) => {
                let blob = encode_blob(bytes);
                debug!(path = %path, encoding = ?blob.encoding, "uploading blob");
                let created = client.create_blob(&blob).await?;
                entries.push(TreeEntry::blob(path.clone(), created.sha));
            }
            None => {
                debug!(path = %path, "path missing from working tree, deleting");
                entries.push(TreeEntry::deleted(path.clone()));
            }
        }
    }

    Ok(entries)
}
