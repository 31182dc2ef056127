//! Telemetry for pipeline runs
//!
//! Counters and throughput figures live in [`PerformanceTracker`]; progress
//! notifications are throttled by [`ProgressReporter`] and delivered to a
//! [`ProgressSink`].

pub mod memory;
pub mod progress;
pub mod tracker;

pub use memory::resident_memory_bytes;
pub use progress::{
    ChannelProgressSink, LogProgressSink, ProgressEvent, ProgressReporter, ProgressSink,
};
pub use tracker::{MetricsSnapshot, PerformanceTracker};
