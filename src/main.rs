//! github-file-ops: push local commits to GitHub through the API.
//!
//! Quick start:
//!   github-file-ops                     # serve tools on stdin/stdout
//!   github-file-ops push                # recreate HEAD on the remote branch
//!   github-file-ops mcp-config --mode pr-update
//!
//! For more info: github-file-ops --help

use clap::{Parser, Subcommand};
use github_file_ops::cli;
use github_file_ops::cli::mcp_config::ServerCommand;
use github_file_ops::cli::push::PushOptions;
use github_file_ops::config::Environment;
use github_file_ops::logging;
use std::path::PathBuf;

/// Recreate local commits on GitHub so that workflow checks run.
#[derive(Parser)]
#[command(
    name = "github-file-ops",
    version,
    about = "Push local commits to GitHub through the Git Data API"
)]
struct Cli {
    /// Local checkout the tools operate on
    #[arg(long, global = true, env = "GITHUB_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// GitHub API root
    #[arg(long, global = true, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the tools over stdio (the default)
    Serve,

    /// Push one local commit and print the result as JSON
    Push {
        /// Local commit to recreate
        #[arg(long, default_value = "HEAD")]
        commit_ref: String,

        /// pr-gen or pr-update (defaults to DEVSY_MODE)
        #[arg(long)]
        mode: Option<String>,

        /// Target branch (defaults to BRANCH_NAME, then the current checkout)
        #[arg(long)]
        branch: Option<String>,

        /// Push to the head branch of this pull request
        #[arg(long = "pr", value_name = "NUMBER", conflicts_with = "branch")]
        pull_request: Option<u64>,
    },

    /// Print the agent's server configuration, or append it to $GITHUB_OUTPUT
    McpConfig {
        /// pr-gen, pr-update or plan-gen
        #[arg(long, env = "DEVSY_MODE")]
        mode: String,

        /// Command the agent runs to start this server
        #[arg(long, default_value = "github-file-ops")]
        server_command: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();

    let cli = Cli::parse();

    let workspace = match cli.workspace {
        Some(path) => path,
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    let mut env = Environment::from_env();
    if let Some(url) = cli.api_url.filter(|u| !u.trim().is_empty()) {
        env.api_url = Some(url);
    }

    let result = match cli.command {
        None | Some(Commands::Serve) => cli::serve::run_serve(&workspace, env).await,

        Some(Commands::Push {
            commit_ref,
            mode,
            branch,
            pull_request,
        }) => {
            let options = PushOptions {
                commit_ref: Some(commit_ref),
                mode,
                branch,
                pull_request,
            };
            match cli::push::run_push(&workspace, env, options).await {
                Ok(true) => Ok(()),
                Ok(false) => std::process::exit(1),
                Err(e) => Err(e),
            }
        }

        Some(Commands::McpConfig {
            mode,
            server_command,
        }) => {
            let server = ServerCommand {
                command: server_command,
                args: vec!["serve".to_string()],
            };
            cli::mcp_config::run_mcp_config(&mode, &server)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        for cause in e.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
        std::process::exit(1);
    }
}
