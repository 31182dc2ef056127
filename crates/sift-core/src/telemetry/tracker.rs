//! Run-level counters, clock and throughput figures

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Immutable view of the run metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub total_files: u64,
    pub processed: u64,
    pub failed: u64,
    pub skipped: u64,
    /// Bytes of files whose analysis completed
    pub total_bytes: u64,
    /// Analyze attempts that returned an error, including retried ones
    pub failed_attempts: u64,
    /// Most analyze calls observed in flight at once
    pub high_water_mark: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    pub progress_percentage: f64,
    /// MB/s over the elapsed time
    pub processing_speed: f64,
    /// Milliseconds per handled file
    pub average_processing_time: f64,
}

impl MetricsSnapshot {
    /// Files with a terminal outcome
    pub fn handled(&self) -> u64 {
        self.processed + self.failed + self.skipped
    }

    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

#[derive(Debug)]
struct TrackerState {
    total_files: u64,
    processed: u64,
    failed: u64,
    skipped: u64,
    total_bytes: u64,
    failed_attempts: u64,
    high_water_mark: usize,
    started: Instant,
    start_time: DateTime<Utc>,
    frozen: Option<MetricsSnapshot>,
}

impl TrackerState {
    fn new() -> Self {
        Self {
            total_files: 0,
            processed: 0,
            failed: 0,
            skipped: 0,
            total_bytes: 0,
            failed_attempts: 0,
            high_water_mark: 0,
            started: Instant::now(),
            start_time: Utc::now(),
            frozen: None,
        }
    }

    fn handled(&self) -> u64 {
        self.processed + self.failed + self.skipped
    }

    fn snapshot(&self, elapsed: Duration, end_time: Option<DateTime<Utc>>) -> MetricsSnapshot {
        MetricsSnapshot {
            total_files: self.total_files,
            processed: self.processed,
            failed: self.failed,
            skipped: self.skipped,
            total_bytes: self.total_bytes,
            failed_attempts: self.failed_attempts,
            high_water_mark: self.high_water_mark,
            start_time: self.start_time,
            end_time,
            elapsed,
            progress_percentage: progress_percentage(self.handled(), self.total_files),
            processing_speed: processing_speed(self.total_bytes, elapsed),
            average_processing_time: average_processing_time(self.handled(), elapsed),
        }
    }
}

fn progress_percentage(handled: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * handled as f64 / total as f64
    }
}

fn processing_speed(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        0.0
    } else {
        bytes as f64 / BYTES_PER_MB / secs
    }
}

fn average_processing_time(handled: u64, elapsed: Duration) -> f64 {
    if handled == 0 {
        0.0
    } else {
        elapsed.as_secs_f64() * 1000.0 / handled as f64
    }
}

/// Thread-safe metrics owner for one pipeline run
///
/// Once [`finish`](Self::finish) has been called the tracker is frozen:
/// late updates from still-draining workers are dropped with a warning so
/// the final report cannot change after it was produced.
#[derive(Debug)]
pub struct PerformanceTracker {
    state: Mutex<TrackerState>,
}

impl Default for PerformanceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TrackerState::new()),
        }
    }

    pub fn set_total_files(&self, total: u64) {
        let mut state = self.state.lock();
        if state.frozen.is_some() {
            tracing::warn!(total, "Ignoring set_total_files after finish");
            return;
        }
        state.total_files = total;
    }

    /// Add deltas to the counters; returns false if the tracker is frozen
    pub fn update_file_stats(&self, processed: u64, failed: u64, skipped: u64, bytes: u64) -> bool {
        let mut state = self.state.lock();
        if state.frozen.is_some() {
            tracing::warn!(
                processed,
                failed,
                skipped,
                bytes,
                "Ignoring metrics update after finish"
            );
            return false;
        }
        state.processed += processed;
        state.failed += failed;
        state.skipped += skipped;
        state.total_bytes += bytes;
        true
    }

    pub fn record_failed_attempt(&self) {
        let mut state = self.state.lock();
        if state.frozen.is_some() {
            tracing::warn!("Ignoring failed attempt recorded after finish");
            return;
        }
        state.failed_attempts += 1;
    }

    /// Raise the recorded high-water mark to at least `in_flight`
    pub fn record_high_water_mark(&self, in_flight: usize) {
        let mut state = self.state.lock();
        if state.frozen.is_some() {
            tracing::warn!(in_flight, "Ignoring high-water mark recorded after finish");
            return;
        }
        state.high_water_mark = state.high_water_mark.max(in_flight);
    }

    /// Files with a terminal outcome so far
    pub fn handled(&self) -> u64 {
        self.state.lock().handled()
    }

    pub fn elapsed(&self) -> Duration {
        let state = self.state.lock();
        match &state.frozen {
            Some(frozen) => frozen.elapsed,
            None => state.started.elapsed(),
        }
    }

    pub fn progress_percentage(&self) -> f64 {
        let state = self.state.lock();
        progress_percentage(state.handled(), state.total_files)
    }

    /// Throughput in MB/s
    pub fn processing_speed(&self) -> f64 {
        let bytes = self.state.lock().total_bytes;
        processing_speed(bytes, self.elapsed())
    }

    /// Average wall-clock milliseconds per handled file
    pub fn average_processing_time(&self) -> f64 {
        let handled = self.handled();
        average_processing_time(handled, self.elapsed())
    }

    /// Current counters; the frozen snapshot once finished
    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.state.lock();
        match &state.frozen {
            Some(frozen) => frozen.clone(),
            None => state.snapshot(state.started.elapsed(), None),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state.lock().frozen.is_some()
    }

    /// Freeze the counters and stamp the end time
    ///
    /// Calling `finish` again returns the snapshot taken the first time.
    pub fn finish(&self) -> MetricsSnapshot {
        let mut state = self.state.lock();
        if let Some(frozen) = &state.frozen {
            return frozen.clone();
        }
        let snapshot = state.snapshot(state.started.elapsed(), Some(Utc::now()));
        state.frozen = Some(snapshot.clone());
        snapshot
    }

    /// Start over with zeroed counters and a fresh clock
    pub fn reset(&self) {
        *self.state.lock() = TrackerState::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percentage() {
        let tracker = PerformanceTracker::new();
        assert_eq!(tracker.progress_percentage(), 0.0);

        tracker.set_total_files(8);
        tracker.update_file_stats(2, 1, 1, 0);
        assert_eq!(tracker.progress_percentage(), 50.0);
        assert_eq!(tracker.handled(), 4);
    }

    #[test]
    fn test_zero_total_is_zero_percent() {
        let tracker = PerformanceTracker::new();
        tracker.update_file_stats(3, 0, 0, 0);
        assert_eq!(tracker.progress_percentage(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_speed_and_average() {
        let tracker = PerformanceTracker::new();
        tracker.set_total_files(4);
        tracker.update_file_stats(4, 0, 0, 2 * 1024 * 1024);

        tokio::time::advance(Duration::from_secs(2)).await;

        assert!((tracker.processing_speed() - 1.0).abs() < 1e-9);
        assert!((tracker.average_processing_time() - 500.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finish_freezes_state() {
        let tracker = PerformanceTracker::new();
        tracker.set_total_files(3);
        tracker.update_file_stats(1, 0, 0, 100);
        tracker.record_failed_attempt();
        tracker.record_high_water_mark(2);

        tokio::time::advance(Duration::from_millis(250)).await;
        let snapshot = tracker.finish();

        assert!(snapshot.is_finished());
        assert_eq!(snapshot.processed, 1);
        assert_eq!(snapshot.failed_attempts, 1);
        assert_eq!(snapshot.high_water_mark, 2);
        assert_eq!(snapshot.elapsed, Duration::from_millis(250));

        assert!(!tracker.update_file_stats(1, 1, 1, 1));
        tracker.record_failed_attempt();
        tracker.record_high_water_mark(7);
        tracker.set_total_files(99);
        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(tracker.snapshot(), snapshot);
        assert_eq!(tracker.finish(), snapshot);
        assert_eq!(tracker.elapsed(), Duration::from_millis(250));
    }

    #[test]
    fn test_reset_allows_reuse() {
        let tracker = PerformanceTracker::new();
        tracker.set_total_files(1);
        tracker.update_file_stats(1, 0, 0, 10);
        tracker.finish();

        tracker.reset();
        assert!(!tracker.is_finished());
        assert!(tracker.update_file_stats(0, 1, 0, 0));

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.total_files, 0);
        assert_eq!(snapshot.processed, 0);
        assert_eq!(snapshot.failed, 1);
    }

    #[test]
    fn test_snapshot_serializes_elapsed_ms() {
        let tracker = PerformanceTracker::new();
        let value = serde_json::to_value(tracker.finish()).unwrap();
        assert!(value.get("elapsed_ms").is_some());
        assert!(value.get("elapsed").is_none());
    }

    #[test]
    fn test_concurrent_updates() {
        let tracker = std::sync::Arc::new(PerformanceTracker::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = tracker.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        tracker.update_file_stats(1, 0, 0, 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = tracker.finish();
        assert_eq!(snapshot.processed, 8000);
        assert_eq!(snapshot.total_bytes, 8000);
    }
}
