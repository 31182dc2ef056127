//! Sift Core Library
//!
//! This crate provides the analysis pipeline behind Sift: collecting files
//! from a project tree, batching them, and running a pluggable analyzer over
//! each file with bounded concurrency, retries and metrics.

pub mod analyzer;
pub mod batch;
pub mod collector;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod recovery;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use analyzer::{Analyzer, AnalyzerRegistry, SharedAnalyzer};
pub use batch::{Batch, BatchBuilder, BatchSummary};
pub use collector::{Collection, FileCollector, priority_score};
pub use concurrency::{ConcurrencyLimiter, FifoLimiter, Permit, SharedLimiter};
pub use config::{AnalysisOptions, load_options};
pub use error::{SiftError, SiftResult};
pub use orchestrator::{
    Orchestrator, OrchestratorBuilder, PipelinePlan, PipelineReport, PipelineState,
};
pub use recovery::{BackoffConfig, BackoffStrategy, ExponentialBackoff, RetryConfig, RetryExecutor};
pub use telemetry::{
    ChannelProgressSink, LogProgressSink, MetricsSnapshot, PerformanceTracker, ProgressEvent,
    ProgressSink,
};
pub use types::*;
