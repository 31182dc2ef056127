//! Pipeline options

use crate::error::{SiftError, SiftResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_CONCURRENT_LIMIT: usize = 5;
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_MAX_BATCH_BYTES: u64 = 512 * 1024;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_MAX_RETRY_DELAY_MS: u64 = 60_000;
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10;

/// Immutable configuration for one pipeline run
///
/// `batch_size` counts files and `max_batch_bytes` caps bytes; the two are
/// independent limits and a batch is flushed when either would be exceeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Maximum simultaneous analyze calls
    pub concurrent_limit: usize,
    /// Maximum files per batch
    pub batch_size: usize,
    /// Byte cap per batch
    pub max_batch_bytes: u64,
    /// Files larger than this are skipped without being attempted
    pub max_file_size: u64,
    /// Retry attempts after the first failure
    pub max_retries: u32,
    /// Base backoff delay
    pub retry_delay_ms: u64,
    /// Upper bound for a single backoff delay
    pub max_retry_delay_ms: u64,
    /// Pause between batches
    pub batch_delay_ms: u64,
    /// Emit a progress event every N handled files
    pub progress_interval: u64,
    /// Per-call timeout for the analyzer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyze_timeout_ms: Option<u64>,
    pub enable_progress: bool,
    pub enable_performance_monitoring: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            concurrent_limit: DEFAULT_CONCURRENT_LIMIT,
            batch_size: DEFAULT_BATCH_SIZE,
            max_batch_bytes: DEFAULT_MAX_BATCH_BYTES,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            max_retry_delay_ms: DEFAULT_MAX_RETRY_DELAY_MS,
            batch_delay_ms: 0,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            analyze_timeout_ms: None,
            enable_progress: true,
            enable_performance_monitoring: false,
        }
    }
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_concurrent_limit(mut self, limit: usize) -> Self {
        self.concurrent_limit = limit;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_max_batch_bytes(mut self, bytes: u64) -> Self {
        self.max_batch_bytes = bytes;
        self
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_retry_delay_ms(mut self, millis: u64) -> Self {
        self.retry_delay_ms = millis;
        self
    }

    pub fn with_max_retry_delay_ms(mut self, millis: u64) -> Self {
        self.max_retry_delay_ms = millis;
        self
    }

    pub fn with_batch_delay_ms(mut self, millis: u64) -> Self {
        self.batch_delay_ms = millis;
        self
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_analyze_timeout_ms(mut self, millis: Option<u64>) -> Self {
        self.analyze_timeout_ms = millis;
        self
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.enable_progress = enabled;
        self
    }

    pub fn with_performance_monitoring(mut self, enabled: bool) -> Self {
        self.enable_performance_monitoring = enabled;
        self
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn max_retry_delay(&self) -> Duration {
        Duration::from_millis(self.max_retry_delay_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn analyze_timeout(&self) -> Option<Duration> {
        self.analyze_timeout_ms.map(Duration::from_millis)
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> SiftResult<()> {
        if self.concurrent_limit < 1 {
            return Err(SiftError::config("concurrent_limit must be at least 1"));
        }
        if self.batch_size < 1 {
            return Err(SiftError::config("batch_size must be at least 1"));
        }
        if self.max_batch_bytes < 1 {
            return Err(SiftError::config("max_batch_bytes must be at least 1"));
        }
        if self.progress_interval < 1 {
            return Err(SiftError::config("progress_interval must be at least 1"));
        }
        if self.max_retry_delay_ms < self.retry_delay_ms {
            return Err(SiftError::config(format!(
                "max_retry_delay_ms ({}) must not be smaller than retry_delay_ms ({})",
                self.max_retry_delay_ms, self.retry_delay_ms
            )));
        }
        if self.analyze_timeout_ms == Some(0) {
            return Err(SiftError::config(
                "analyze_timeout_ms must be greater than 0 (omit it for no timeout)",
            ));
        }
        Ok(())
    }
}
