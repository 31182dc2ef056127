//! Terminal progress bar fed by pipeline progress events

use indicatif::{ProgressBar, ProgressStyle};
use sift_core::{ProgressEvent, ProgressSink};

/// Renders [`ProgressEvent`]s on an indicatif bar
pub struct BarProgressSink {
    bar: ProgressBar,
}

impl BarProgressSink {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.blue} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        Self { bar }
    }

    /// Clear the bar once the run is over
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for BarProgressSink {
    fn on_progress(&self, event: &ProgressEvent) {
        self.bar.set_length(event.total);
        self.bar.set_position(event.handled);
        self.bar.set_message(format!(
            "batch {}/{} · {} failed",
            event.batch, event.batches, event.failed
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_tracks_events() {
        let sink = BarProgressSink::new();
        sink.on_progress(&ProgressEvent {
            handled: 4,
            total: 10,
            processed: 3,
            failed: 1,
            skipped: 0,
            percentage: 40.0,
            batch: 1,
            batches: 2,
            elapsed_ms: 12,
        });

        assert_eq!(sink.bar.position(), 4);
        assert_eq!(sink.bar.length(), Some(10));
        sink.finish();
    }
}
