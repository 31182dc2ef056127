//! Output of a pipeline run

use crate::batch::BatchSummary;
use crate::telemetry::MetricsSnapshot;
use crate::types::{AnalysisResult, FileTask};
use serde::Serialize;

/// Results and metrics of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Successes and terminal failures, in priority order
    pub results: Vec<AnalysisResult>,
    pub metrics: MetricsSnapshot,
    pub batches: Vec<BatchSummary>,
}

impl PipelineReport {
    pub fn successes(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.results.iter().filter(|r| r.is_failed())
    }
}

/// What a run would do, without calling the analyzer
#[derive(Debug, Clone, Serialize)]
pub struct PipelinePlan {
    /// Collected files in priority order
    pub files: Vec<FileTask>,
    pub skipped: u64,
    pub total_bytes: u64,
    pub batches: Vec<BatchSummary>,
}
