//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Rendering the weather screen in the terminal

use clap::Parser;

mod browse;
mod cli;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logging::init_logging(cmd.verbose)?;
    cmd.run().await
}
