//! Sift CLI application
//!
//! Runs an analyzer over every eligible file in a source tree with bounded
//! concurrency, retries and progress reporting.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/sift-cli
//! ```
//!
//! # Commands
//!
//! - `sift analyze <path>`: analyze files and print a summary (or `--json`)
//! - `sift plan <path>`: show the priority order and batches only
//! - `sift config show`: print the effective options
//!
//! Options are read from `sift.toml` (or `--config`), then `SIFT_*`
//! environment variables, then command-line flags.

mod analyzers;
mod args;
mod commands;
mod console;
mod progress;
mod router;
mod tree;

use args::Cli;
use clap::Parser;
use sift_core::SiftResult;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> SiftResult<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    router::route(cli).await
}
