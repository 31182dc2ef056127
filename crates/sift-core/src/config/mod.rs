//! Configuration management for Sift

pub mod loader;
mod options;

pub use loader::{apply_env_overrides, load_from_file, load_options};
pub use options::{
    AnalysisOptions, DEFAULT_BATCH_SIZE, DEFAULT_CONCURRENT_LIMIT, DEFAULT_MAX_BATCH_BYTES,
    DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_RETRIES, DEFAULT_MAX_RETRY_DELAY_MS,
    DEFAULT_PROGRESS_INTERVAL, DEFAULT_RETRY_DELAY_MS,
};
