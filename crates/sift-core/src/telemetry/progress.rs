//! Periodic progress notifications

use super::tracker::PerformanceTracker;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::mpsc;

/// Progress of a running pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub handled: u64,
    pub total: u64,
    pub processed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub percentage: f64,
    /// 1-based index of the batch being run
    pub batch: usize,
    pub batches: usize,
    pub elapsed_ms: u64,
}

/// Receiver of progress notifications
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn on_progress(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Writes progress to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn on_progress(&self, event: &ProgressEvent) {
        tracing::info!(
            "Progress: {}/{} files ({:.1}%), batch {}/{}, {} failed, {} skipped",
            event.handled,
            event.total,
            event.percentage,
            event.batch,
            event.batches,
            event.failed,
            event.skipped
        );
    }
}

/// Forwards progress events over a channel
#[derive(Debug, Clone)]
pub struct ChannelProgressSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelProgressSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelProgressSink {
    fn on_progress(&self, event: &ProgressEvent) {
        // a dropped receiver just means nobody is listening any more
        let _ = self.tx.send(event.clone());
    }
}

/// Rate-limits progress events to one per `interval` handled files
///
/// Concurrent workers may observe the tracker in any order; each interval
/// boundary is reported at most once, and completion is reported once. The
/// caller observes once more after the last batch so that runs with only
/// skipped files still report completion.
pub struct ProgressReporter {
    sink: Arc<dyn ProgressSink>,
    interval: u64,
    enabled: bool,
    last_bucket: AtomicU64,
    completed: AtomicBool,
}

impl ProgressReporter {
    pub fn new(sink: Arc<dyn ProgressSink>, interval: u64, enabled: bool) -> Self {
        Self {
            sink,
            interval: interval.max(1),
            enabled,
            last_bucket: AtomicU64::new(0),
            completed: AtomicBool::new(false),
        }
    }

    pub fn reset(&self) {
        self.last_bucket.store(0, Ordering::SeqCst);
        self.completed.store(false, Ordering::SeqCst);
    }

    /// Report if the tracker crossed an interval boundary or completed
    pub fn observe(&self, tracker: &PerformanceTracker, batch: usize, batches: usize) {
        if !self.enabled {
            return;
        }

        let snapshot = tracker.snapshot();
        let handled = snapshot.handled();
        let complete = snapshot.total_files > 0 && handled >= snapshot.total_files;

        let bucket = handled / self.interval;
        let previous = self.last_bucket.fetch_max(bucket, Ordering::SeqCst);
        let crossed = bucket > previous;

        let first_completion = complete && !self.completed.swap(true, Ordering::SeqCst);
        if !crossed && !first_completion {
            return;
        }

        self.sink.on_progress(&ProgressEvent {
            handled,
            total: snapshot.total_files,
            processed: snapshot.processed,
            failed: snapshot.failed,
            skipped: snapshot.skipped,
            percentage: snapshot.progress_percentage,
            batch,
            batches,
            elapsed_ms: snapshot.elapsed.as_millis() as u64,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recording_sink() -> (Arc<dyn ProgressSink>, Arc<Mutex<Vec<ProgressEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let captured = events.clone();
        let sink: Arc<dyn ProgressSink> =
            Arc::new(move |event: &ProgressEvent| captured.lock().push(event.clone()));
        (sink, events)
    }

    #[test]
    fn test_reports_every_interval_and_on_completion() {
        let (sink, events) = recording_sink();
        let reporter = ProgressReporter::new(sink, 3, true);
        let tracker = PerformanceTracker::new();
        tracker.set_total_files(7);

        for _ in 0..7 {
            tracker.update_file_stats(1, 0, 0, 0);
            reporter.observe(&tracker, 1, 1);
        }

        let handled: Vec<_> = events.lock().iter().map(|e| e.handled).collect();
        assert_eq!(handled, vec![3, 6, 7]);
        assert_eq!(events.lock().last().map(|e| e.percentage), Some(100.0));
    }

    #[test]
    fn test_repeated_observation_is_deduplicated() {
        let (sink, events) = recording_sink();
        let reporter = ProgressReporter::new(sink, 2, true);
        let tracker = PerformanceTracker::new();
        tracker.set_total_files(10);
        tracker.update_file_stats(2, 0, 0, 0);

        reporter.observe(&tracker, 1, 2);
        reporter.observe(&tracker, 1, 2);
        assert_eq!(events.lock().len(), 1);
    }

    #[test]
    fn test_disabled_reporter_is_silent() {
        let (sink, events) = recording_sink();
        let reporter = ProgressReporter::new(sink, 1, false);
        let tracker = PerformanceTracker::new();
        tracker.set_total_files(1);
        tracker.update_file_stats(1, 0, 0, 0);

        reporter.observe(&tracker, 1, 1);
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_completion_reported_once_for_skipped_files() {
        let (sink, events) = recording_sink();
        let reporter = ProgressReporter::new(sink, 10, true);
        let tracker = PerformanceTracker::new();
        tracker.set_total_files(2);
        tracker.update_file_stats(0, 0, 2, 0);

        reporter.observe(&tracker, 0, 0);
        reporter.observe(&tracker, 0, 0);

        let events = events.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].handled, 2);
        assert_eq!(events[0].skipped, 2);
        assert_eq!(events[0].percentage, 100.0);
    }

    #[tokio::test]
    async fn test_channel_sink() {
        let (sink, mut rx) = ChannelProgressSink::new();
        let reporter = ProgressReporter::new(Arc::new(sink), 1, true);
        let tracker = PerformanceTracker::new();
        tracker.set_total_files(2);
        tracker.update_file_stats(1, 0, 1, 0);

        reporter.observe(&tracker, 1, 1);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.handled, 2);
        assert_eq!(event.skipped, 1);
    }
}
