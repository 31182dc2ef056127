//! Core orchestrator implementation

use crate::analyzer::{AnalyzerRegistry, SharedAnalyzer};
use crate::batch::{Batch, BatchBuilder, BatchSummary};
use crate::collector::FileCollector;
use crate::concurrency::{FifoLimiter, SharedLimiter};
use crate::config::AnalysisOptions;
use crate::error::SiftResult;
use crate::recovery::{RetryConfig, RetryExecutor};
use crate::telemetry::{
    MetricsSnapshot, PerformanceTracker, ProgressReporter, ProgressSink, resident_memory_bytes,
};
use crate::types::{AnalysisResult, TreeNode};
use std::sync::Arc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::builder::OrchestratorBuilder;
use super::report::{PipelinePlan, PipelineReport};
use super::state::PipelineState;

/// Drives a run: collect, batch, analyze, finalize
///
/// Batches run one after another; the files inside a batch run
/// concurrently, bounded by one limiter shared across the whole run.
pub struct Orchestrator {
    pub(super) options: AnalysisOptions,
    pub(super) registry: AnalyzerRegistry,
    pub(super) analyzer_name: Option<String>,
    pub(super) limiter: Option<SharedLimiter>,
    pub(super) tracker: Arc<PerformanceTracker>,
    pub(super) progress_sink: Arc<dyn ProgressSink>,
    pub(super) cancel: CancellationToken,
    pub(super) state: PipelineState,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Token that stops admission of new work when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Live metrics of the current or last run
    pub fn metrics(&self) -> MetricsSnapshot {
        self.tracker.snapshot()
    }

    /// Collect and batch without analyzing anything
    pub fn plan(&self, root: &TreeNode) -> SiftResult<PipelinePlan> {
        self.options.validate()?;

        let collection = FileCollector::new().collect(root, &self.options);
        let files = collection.files.clone();
        let batches = BatchBuilder::new().build(collection.files, &self.options);

        Ok(PipelinePlan {
            files,
            skipped: collection.skipped,
            total_bytes: collection.total_bytes,
            batches: summarize(&batches),
        })
    }

    /// Run the whole pipeline over `root`
    ///
    /// Only setup problems are returned as errors; per-file failures end up
    /// in the report.
    pub async fn run(&mut self, root: &TreeNode) -> SiftResult<PipelineReport> {
        match self.state {
            PipelineState::Idle => {}
            state if state.is_terminal() => self.transition(PipelineState::Idle),
            abandoned => {
                // a previous run future was dropped before it finished
                tracing::warn!(state = %abandoned, "Previous run was abandoned, starting over");
                self.state = PipelineState::Idle;
            }
        }
        self.tracker.reset();

        let (analyzer, limiter) = match self.prepare() {
            Ok(parts) => parts,
            Err(error) => {
                tracing::error!(%error, "Pipeline setup failed");
                self.transition(PipelineState::Failed);
                return Err(error);
            }
        };
        limiter.reset_high_water_mark();

        self.transition(PipelineState::Collecting);
        let collection = FileCollector::new().collect(root, &self.options);
        self.tracker.set_total_files(collection.total_files());
        self.tracker.update_file_stats(0, 0, collection.skipped, 0);

        self.transition(PipelineState::Batching);
        let batches = BatchBuilder::new().build(collection.files, &self.options);
        let summaries = summarize(&batches);

        self.transition(PipelineState::Running);
        let results = self.run_batches(&batches, analyzer, limiter).await;

        self.transition(PipelineState::Finalizing);
        let metrics = self.tracker.finish();
        self.report_summary(&metrics);

        self.transition(PipelineState::Done);
        Ok(PipelineReport {
            results,
            metrics,
            batches: summaries,
        })
    }

    fn prepare(&self) -> SiftResult<(SharedAnalyzer, SharedLimiter)> {
        self.options.validate()?;
        let analyzer = self.registry.resolve(self.analyzer_name.as_deref())?;
        let limiter = match &self.limiter {
            Some(limiter) => limiter.clone(),
            None => FifoLimiter::shared(self.options.concurrent_limit)?,
        };
        Ok((analyzer, limiter))
    }

    async fn run_batches(
        &self,
        batches: &[Batch],
        analyzer: SharedAnalyzer,
        limiter: SharedLimiter,
    ) -> Vec<AnalysisResult> {
        let executor = RetryExecutor::new(
            analyzer,
            limiter,
            self.tracker.clone(),
            RetryConfig::from_options(&self.options),
        )
        .with_cancellation(self.cancel.clone());
        let reporter = ProgressReporter::new(
            self.progress_sink.clone(),
            self.options.progress_interval,
            self.options.enable_progress,
        );

        let count = batches.len();
        let mut results = Vec::new();

        for (index, batch) in batches.iter().enumerate() {
            if self.cancel.is_cancelled() {
                let remaining: usize = batches[index..].iter().map(Batch::len).sum();
                tracing::warn!(remaining, "Run cancelled, skipping remaining batches");
                self.tracker.update_file_stats(0, 0, remaining as u64, 0);
                break;
            }

            tracing::debug!(
                batch = index + 1,
                batches = count,
                files = batch.len(),
                bytes = batch.total_bytes,
                "Dispatching batch"
            );

            let runs = batch.tasks.iter().map(|task| {
                let executor = &executor;
                let reporter = &reporter;
                let tracker = &self.tracker;
                async move {
                    let result = executor.run(task).await;
                    reporter.observe(tracker, index + 1, count);
                    result
                }
            });
            let batch_results = futures::future::join_all(runs).await;
            results.extend(batch_results.into_iter().filter(|r| r.is_reportable()));

            let delay = self.options.batch_delay();
            if index + 1 < count && !delay.is_zero() {
                tokio::select! {
                    _ = self.cancel.cancelled() => {}
                    _ = sleep(delay) => {}
                }
            }
        }

        // covers runs where no file reached the executor
        reporter.observe(&self.tracker, count, count);
        results
    }

    fn report_summary(&self, metrics: &MetricsSnapshot) {
        tracing::info!(
            "Analysis complete: {} processed, {} failed, {} skipped of {} files in {:.2}s ({:.3} MB/s)",
            metrics.processed,
            metrics.failed,
            metrics.skipped,
            metrics.total_files,
            metrics.elapsed.as_secs_f64(),
            metrics.processing_speed
        );

        if self.options.enable_performance_monitoring {
            tracing::info!(
                throughput_mb_s = metrics.processing_speed,
                avg_ms_per_file = metrics.average_processing_time,
                failed_attempts = metrics.failed_attempts,
                high_water_mark = metrics.high_water_mark,
                resident_memory_bytes = resident_memory_bytes(),
                "Performance report"
            );
        }
    }

    fn transition(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = %self.state, to = %next, "Pipeline state change");
        self.state = next;
    }
}

fn summarize(batches: &[Batch]) -> Vec<BatchSummary> {
    batches
        .iter()
        .enumerate()
        .map(|(index, batch)| batch.summary(index))
        .collect()
}
