//! github-file-ops: recreate local commits on GitHub through the Git Data API.
//!
//! The library exposes the push pipeline and the stdio tool server for
//! integration testing and programmatic use. The binary entrypoint is in
//! `main.rs`.

pub mod cli;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod git;
pub mod github;
pub mod logging;
pub mod push;
