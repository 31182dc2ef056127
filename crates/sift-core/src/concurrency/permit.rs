//! RAII permit returned by a [`ConcurrencyLimiter`](super::ConcurrencyLimiter)

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::OwnedSemaphorePermit;

/// Authorization for one in-flight operation
///
/// The permit is returned to its limiter when dropped, so release happens on
/// every exit path, including errors, timeouts and unwinding.
#[must_use = "dropping a permit releases it immediately"]
pub struct Permit {
    _guard: Box<dyn Any + Send + Sync>,
}

impl Permit {
    /// Wrap any guard whose `Drop` releases the underlying slot
    pub fn new<G: Any + Send + Sync>(guard: G) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }

    /// Give the permit back explicitly
    pub fn release(self) {
        drop(self);
    }
}

impl fmt::Debug for Permit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Permit").finish_non_exhaustive()
    }
}

/// Semaphore permit that keeps the limiter's in-flight gauge accurate
pub(super) struct TrackedPermit {
    // Field drop runs after `Drop::drop`, so the gauge is decremented before
    // the slot becomes available to the next waiter.
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl TrackedPermit {
    pub(super) fn new(permit: OwnedSemaphorePermit, in_flight: Arc<AtomicUsize>) -> Self {
        Self {
            _permit: permit,
            in_flight,
        }
    }
}

impl Drop for TrackedPermit {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
