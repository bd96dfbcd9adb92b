//! Subcommands of the `github-file-ops` binary.

pub mod mcp_config;
pub mod push;
pub mod serve;
