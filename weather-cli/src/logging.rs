//! Logging via `tracing-subscriber`, written to stderr so it never mixes with
//! the rendered screen on stdout.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the `-v` count.
pub fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
