//! Analyzer interface and registry
//!
//! What "analysis" means is up to the [`Analyzer`] implementation; the
//! pipeline only guarantees how the calls are scheduled. Analyzers are
//! handed to the orchestrator through an explicit [`AnalyzerRegistry`], so
//! several pipelines with different analyzers can run in one process.

use crate::error::{SiftError, SiftResult};
use crate::types::AnalyzeRequest;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Analyzes a single file
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Registry name
    fn name(&self) -> &str;

    /// Analyze one file
    ///
    /// `Ok(None)` means the file was analyzed but produced nothing worth
    /// reporting; it is not a failure and is not retried.
    async fn analyze(&self, request: &AnalyzeRequest) -> SiftResult<Option<Value>>;
}

/// Shared handle to an analyzer
pub type SharedAnalyzer = Arc<dyn Analyzer>;

/// Named analyzers available to a pipeline
#[derive(Clone, Default)]
pub struct AnalyzerRegistry {
    analyzers: HashMap<String, SharedAnalyzer>,
    default: Option<String>,
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an analyzer under its own name
    ///
    /// The first analyzer registered becomes the default. Registering a
    /// second analyzer with the same name replaces the first.
    pub fn register(&mut self, analyzer: SharedAnalyzer) {
        let name = analyzer.name().to_string();
        if self.default.is_none() {
            self.default = Some(name.clone());
        }
        self.analyzers.insert(name, analyzer);
    }

    pub fn with_analyzer(mut self, analyzer: SharedAnalyzer) -> Self {
        self.register(analyzer);
        self
    }

    pub fn set_default(&mut self, name: &str) -> SiftResult<()> {
        if !self.analyzers.contains_key(name) {
            return Err(self.unknown(name));
        }
        self.default = Some(name.to_string());
        Ok(())
    }

    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<SharedAnalyzer> {
        self.analyzers.get(name).cloned()
    }

    /// Look up `name`, or the default analyzer when `name` is `None`
    pub fn resolve(&self, name: Option<&str>) -> SiftResult<SharedAnalyzer> {
        let name = match name.or(self.default.as_deref()) {
            Some(name) => name,
            None => return Err(SiftError::config("No analyzers registered")),
        };
        self.get(name).ok_or_else(|| self.unknown(name))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.analyzers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    fn unknown(&self, name: &str) -> SiftError {
        SiftError::config(format!(
            "Unknown analyzer '{}'. Available analyzers: {}",
            name,
            self.names().join(", ")
        ))
    }
}

impl fmt::Debug for AnalyzerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerRegistry")
            .field("analyzers", &self.names())
            .field("default", &self.default)
            .finish()
    }
}
