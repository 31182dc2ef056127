//! Failure recovery for analyze calls
//!
//! - Deterministic backoff strategies
//! - Per-file retry executor with permit handling and cancellation

pub mod backoff;
pub mod retry;

pub use backoff::{BackoffConfig, BackoffStrategy, ConstantBackoff, ExponentialBackoff};
pub use retry::{RetryConfig, RetryExecutor};
