//! Tracing setup shared by every subcommand.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "github_file_ops=info";

/// Install the global subscriber.
///
/// Output goes to stderr: stdout carries protocol traffic in `serve` and the
/// result JSON in `push`. `RUST_LOG` overrides the default filter.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    // try_init: a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .compact()
        .try_init();
}
