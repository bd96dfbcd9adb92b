//! Error types for GitHub REST calls.
//!
//! Every non-2xx response is fatal for the call that produced it. Nothing in
//! this crate retries, so the status code and raw body are kept verbatim for
//! the agent to read.

/// Errors that can occur while talking to the GitHub REST API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// GitHub answered with a non-2xx status.
    ///
    /// A 422 on a ref update usually means the branch moved since it was read
    /// (the update is non-force). A 404 on a ref lookup usually means the
    /// branch does not exist in the mode that was assumed.
    #[error("GitHub API error: {status} {body}")]
    Api { status: u16, body: String },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("Failed to deserialize GitHub response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The configured API root cannot have repository paths appended to it.
    #[error("Invalid GitHub API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },
}
