//! Counting semaphore that bounds in-flight analyze calls

use super::permit::{Permit, TrackedPermit};
use crate::error::{SiftError, SiftResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

/// Admission control for concurrent operations
///
/// Implementations hand out at most `capacity()` permits at a time and wake
/// waiters in the order they arrived.
#[async_trait]
pub trait ConcurrencyLimiter: Send + Sync {
    /// Wait for a free slot
    async fn acquire(&self) -> SiftResult<Permit>;

    /// Total number of permits
    fn capacity(&self) -> usize;

    /// Permits not currently held
    fn available(&self) -> usize;

    /// Permits currently held
    fn in_flight(&self) -> usize {
        self.capacity().saturating_sub(self.available())
    }

    /// Highest `in_flight` observed since creation or the last reset
    fn high_water_mark(&self) -> usize;

    fn reset_high_water_mark(&self);
}

/// Shared handle to a limiter
pub type SharedLimiter = Arc<dyn ConcurrencyLimiter>;

/// FIFO limiter backed by tokio's fair semaphore
#[derive(Debug)]
pub struct FifoLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    in_flight: Arc<AtomicUsize>,
    high_water: AtomicUsize,
}

impl FifoLimiter {
    /// Create a limiter with `limit` permits
    pub fn new(limit: usize) -> SiftResult<Self> {
        if limit < 1 {
            return Err(SiftError::config("concurrency limit must be at least 1"));
        }
        if limit > Semaphore::MAX_PERMITS {
            return Err(SiftError::config(format!(
                "concurrency limit {} exceeds the maximum of {}",
                limit,
                Semaphore::MAX_PERMITS
            )));
        }

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            capacity: limit,
            in_flight: Arc::new(AtomicUsize::new(0)),
            high_water: AtomicUsize::new(0),
        })
    }

    /// Create a shared limiter
    pub fn shared(limit: usize) -> SiftResult<SharedLimiter> {
        Ok(Arc::new(Self::new(limit)?))
    }
}

#[async_trait]
impl ConcurrencyLimiter for FifoLimiter {
    async fn acquire(&self) -> SiftResult<Permit> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| SiftError::Cancelled)?;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(now, Ordering::SeqCst);

        Ok(Permit::new(TrackedPermit::new(
            permit,
            self.in_flight.clone(),
        )))
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn high_water_mark(&self) -> usize {
        self.high_water.load(Ordering::SeqCst)
    }

    fn reset_high_water_mark(&self) {
        self.high_water.store(self.in_flight(), Ordering::SeqCst);
    }
}
