//! Builder pattern for Orchestrator

use std::sync::Arc;

use crate::analyzer::{AnalyzerRegistry, SharedAnalyzer};
use crate::concurrency::SharedLimiter;
use crate::config::AnalysisOptions;
use crate::telemetry::{LogProgressSink, PerformanceTracker, ProgressSink};
use tokio_util::sync::CancellationToken;

use super::pipeline::Orchestrator;
use super::state::PipelineState;

/// Builder for Orchestrator
pub struct OrchestratorBuilder {
    options: AnalysisOptions,
    registry: AnalyzerRegistry,
    analyzer_name: Option<String>,
    limiter: Option<SharedLimiter>,
    progress_sink: Option<Arc<dyn ProgressSink>>,
    cancel: Option<CancellationToken>,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            options: AnalysisOptions::default(),
            registry: AnalyzerRegistry::new(),
            analyzer_name: None,
            limiter: None,
            progress_sink: None,
            cancel: None,
        }
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_registry(mut self, registry: AnalyzerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register a single analyzer on the builder's registry
    pub fn with_analyzer(mut self, analyzer: SharedAnalyzer) -> Self {
        self.registry.register(analyzer);
        self
    }

    /// Pick an analyzer by name instead of the registry default
    pub fn with_analyzer_name(mut self, name: impl Into<String>) -> Self {
        self.analyzer_name = Some(name.into());
        self
    }

    /// Use a specific limiter instead of one sized from the options
    pub fn with_limiter(mut self, limiter: SharedLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress_sink = Some(sink);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Build the orchestrator
    ///
    /// Options are validated when a run starts, so that an invalid setup
    /// surfaces as a `Failed` run rather than a builder error.
    pub fn build(self) -> Orchestrator {
        Orchestrator {
            options: self.options,
            registry: self.registry,
            analyzer_name: self.analyzer_name,
            limiter: self.limiter,
            tracker: Arc::new(PerformanceTracker::new()),
            progress_sink: self
                .progress_sink
                .unwrap_or_else(|| Arc::new(LogProgressSink)),
            cancel: self.cancel.unwrap_or_default(),
            state: PipelineState::Idle,
        }
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
