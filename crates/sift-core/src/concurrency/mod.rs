//! Concurrency primitives for the analysis pipeline
//!
//! A single [`ConcurrencyLimiter`] arbitrates admission of analyze calls for
//! a whole run. The default [`FifoLimiter`] wraps tokio's fair semaphore;
//! tests can inject their own implementation to observe admission order.

mod limiter;
mod permit;

pub use limiter::{ConcurrencyLimiter, FifoLimiter, SharedLimiter};
pub use permit::Permit;
