//! Per-file execution with bounded concurrency and retry
//!
//! [`RetryExecutor::run`] owns everything that can go wrong with one file:
//! waiting for a permit, the analyze call itself, timeouts, and the backoff
//! between attempts. Errors never escape; the caller always receives an
//! [`AnalysisResult`].

use super::backoff::{BackoffConfig, BackoffStrategy, ExponentialBackoff};
use crate::analyzer::SharedAnalyzer;
use crate::concurrency::SharedLimiter;
use crate::config::AnalysisOptions;
use crate::error::{SiftError, SiftResult};
use crate::telemetry::PerformanceTracker;
use crate::types::{AnalysisOutcome, AnalysisResult, FileTask};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Retry settings for analyze calls
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first failed attempt
    pub max_retries: u32,
    /// Backoff timing
    pub backoff: BackoffConfig,
    /// Time budget for a single analyze call
    pub timeout: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from_options(&AnalysisOptions::default())
    }
}

impl RetryConfig {
    pub fn from_options(options: &AnalysisOptions) -> Self {
        Self {
            max_retries: options.max_retries,
            backoff: BackoffConfig::with_initial_delay(options.retry_delay())
                .max_delay(options.max_retry_delay()),
            timeout: options.analyze_timeout(),
        }
    }

    /// Create a config that never retries
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            backoff: BackoffConfig::with_initial_delay(Duration::ZERO).max_delay(Duration::ZERO),
            timeout: None,
        }
    }

    /// Total analyze calls allowed per file
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Runs one file through the analyzer with permits and retries
pub struct RetryExecutor {
    analyzer: SharedAnalyzer,
    limiter: SharedLimiter,
    tracker: Arc<PerformanceTracker>,
    backoff: Box<dyn BackoffStrategy>,
    config: RetryConfig,
    cancel: CancellationToken,
}

impl RetryExecutor {
    pub fn new(
        analyzer: SharedAnalyzer,
        limiter: SharedLimiter,
        tracker: Arc<PerformanceTracker>,
        config: RetryConfig,
    ) -> Self {
        let backoff = Box::new(ExponentialBackoff::with_config(config.backoff.clone()));
        Self {
            analyzer,
            limiter,
            tracker,
            backoff,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Set custom backoff strategy
    pub fn with_backoff<B: BackoffStrategy + 'static>(mut self, backoff: B) -> Self {
        self.backoff = Box::new(backoff);
        self
    }

    /// Stop admitting work once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Analyze one file, retrying failures with backoff
    ///
    /// Metrics are updated once, with the terminal outcome.
    pub async fn run(&self, task: &FileTask) -> AnalysisResult {
        let mut attempt: u32 = 0;

        loop {
            if self.cancel.is_cancelled() {
                return self.cancelled(task, attempt);
            }

            let permit = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return self.cancelled(task, attempt),
                permit = self.limiter.acquire() => permit,
            };
            let permit = match permit {
                Ok(permit) => permit,
                Err(_) => return self.cancelled(task, attempt),
            };

            self.tracker
                .record_high_water_mark(self.limiter.in_flight());
            let outcome = self.call(task).await;
            permit.release();

            match outcome {
                Ok(Some(payload)) => {
                    self.tracker.update_file_stats(1, 0, 0, task.size);
                    return AnalysisResult::new(
                        task,
                        attempt + 1,
                        AnalysisOutcome::Success { payload },
                    );
                }
                Ok(None) => {
                    tracing::debug!(path = %task.path, "Analyzer returned no result");
                    self.tracker.update_file_stats(1, 0, 0, task.size);
                    return AnalysisResult::new(task, attempt + 1, AnalysisOutcome::Empty);
                }
                Err(error) => {
                    self.tracker.record_failed_attempt();
                    tracing::warn!(
                        path = %task.path,
                        attempt = attempt + 1,
                        max_attempts = self.config.max_attempts(),
                        %error,
                        "Analyze attempt failed"
                    );

                    if attempt >= self.config.max_retries {
                        self.tracker.update_file_stats(0, 1, 0, 0);
                        return AnalysisResult::new(
                            task,
                            attempt + 1,
                            AnalysisOutcome::Failed {
                                error: error.to_string(),
                            },
                        );
                    }

                    let delay = self.backoff.delay_for_attempt(attempt);
                    tracing::debug!(path = %task.path, ?delay, "Backing off before retry");
                    tokio::select! {
                        biased;
                        _ = self.cancel.cancelled() => return self.cancelled(task, attempt + 1),
                        _ = sleep(delay) => {}
                    }
                    attempt += 1;
                }
            }
        }
    }

    async fn call(&self, task: &FileTask) -> SiftResult<Option<Value>> {
        let request = task.request();
        match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.analyzer.analyze(&request))
                .await
                .map_err(|_| SiftError::timeout(limit.as_millis() as u64))?,
            None => self.analyzer.analyze(&request).await,
        }
    }

    fn cancelled(&self, task: &FileTask, attempts: u32) -> AnalysisResult {
        tracing::debug!(path = %task.path, "Cancelled before analysis");
        self.tracker.update_file_stats(0, 0, 1, 0);
        AnalysisResult::new(task, attempts, AnalysisOutcome::Cancelled)
    }
}
