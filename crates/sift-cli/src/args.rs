//! CLI argument definitions using clap
//!
//! - sift analyze <path>        # Run an analyzer over a project
//! - sift plan <path>           # Show the batch plan without analyzing
//! - sift config show           # Print the effective options

use clap::{Args, Parser, Subcommand};
use sift_core::AnalysisOptions;
use std::path::PathBuf;

/// Default configuration file name used across all CLI commands.
pub const DEFAULT_CONFIG_FILE: &str = "sift.toml";

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Sift - bounded-concurrency file analysis for source trees")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze every eligible file under a directory
    Analyze {
        /// Project root to analyze
        path: PathBuf,

        /// Analyzer to run (defaults to the first registered one)
        #[arg(long)]
        analyzer: Option<String>,

        #[command(flatten)]
        options: OptionArgs,

        /// Disable the progress bar
        #[arg(long)]
        no_progress: bool,

        /// Log throughput and memory figures at the end of the run
        #[arg(long)]
        perf: bool,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how files would be prioritized and batched
    Plan {
        /// Project root to plan
        path: PathBuf,

        #[command(flatten)]
        options: OptionArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Display the effective options after file and environment overrides
    Show {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
}

/// Flags shared by commands that build a pipeline
#[derive(Args, Clone, Debug, Default)]
pub struct OptionArgs {
    /// Path to configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Maximum simultaneous analyze calls
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Maximum files per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Byte cap per batch
    #[arg(long)]
    pub max_batch_bytes: Option<u64>,

    /// Skip files larger than this many bytes
    #[arg(long)]
    pub max_file_size: Option<u64>,

    /// Retries after a failed analyze call
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Base backoff delay in milliseconds
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    /// Pause between batches in milliseconds
    #[arg(long)]
    pub batch_delay_ms: Option<u64>,

    /// Glob of paths to leave out (repeatable)
    #[arg(long = "exclude", value_name = "GLOB")]
    pub excludes: Vec<String>,

    /// Include files ignored by .gitignore
    #[arg(long)]
    pub no_gitignore: bool,
}

impl OptionArgs {
    /// Layer command-line flags over already loaded options
    pub fn apply(&self, mut options: AnalysisOptions) -> AnalysisOptions {
        if let Some(v) = self.concurrency {
            options.concurrent_limit = v;
        }
        if let Some(v) = self.batch_size {
            options.batch_size = v;
        }
        if let Some(v) = self.max_batch_bytes {
            options.max_batch_bytes = v;
        }
        if let Some(v) = self.max_file_size {
            options.max_file_size = v;
        }
        if let Some(v) = self.max_retries {
            options.max_retries = v;
        }
        if let Some(v) = self.retry_delay_ms {
            options.retry_delay_ms = v;
        }
        if let Some(v) = self.batch_delay_ms {
            options.batch_delay_ms = v;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_flags() {
        let cli = Cli::parse_from([
            "sift",
            "analyze",
            "./src",
            "--concurrency",
            "8",
            "--exclude",
            "target/**",
            "--exclude",
            "*.lock",
            "--json",
        ]);

        match cli.command {
            Commands::Analyze {
                path,
                options,
                json,
                no_progress,
                ..
            } => {
                assert_eq!(path, PathBuf::from("./src"));
                assert_eq!(options.concurrency, Some(8));
                assert_eq!(options.excludes, vec!["target/**", "*.lock"]);
                assert_eq!(options.config, PathBuf::from(DEFAULT_CONFIG_FILE));
                assert!(json);
                assert!(!no_progress);
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_flags_override_loaded_options() {
        let args = OptionArgs {
            batch_size: Some(3),
            max_retries: Some(0),
            ..OptionArgs::default()
        };
        let options = args.apply(AnalysisOptions::default().with_concurrent_limit(7));

        assert_eq!(options.batch_size, 3);
        assert_eq!(options.max_retries, 0);
        assert_eq!(options.concurrent_limit, 7);
    }
}
