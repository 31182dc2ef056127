//! Packing prioritized files into bounded batches

use crate::config::AnalysisOptions;
use crate::types::FileTask;
use serde::Serialize;

/// An ordered group of files analyzed together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub tasks: Vec<FileTask>,
    pub total_bytes: u64,
}

impl Batch {
    fn push(&mut self, task: FileTask) {
        self.total_bytes += task.size;
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn summary(&self, index: usize) -> BatchSummary {
        BatchSummary {
            index,
            files: self.tasks.len(),
            bytes: self.total_bytes,
        }
    }
}

/// Size of one batch, as reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub index: usize,
    pub files: usize,
    pub bytes: u64,
}

/// Greedy packer bounded by file count and byte total
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchBuilder;

impl BatchBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Pack files in the given order
    ///
    /// A file that alone exceeds `max_batch_bytes` gets a batch of its own
    /// rather than being split or dropped.
    pub fn build(&self, files: Vec<FileTask>, options: &AnalysisOptions) -> Vec<Batch> {
        let mut batches = Vec::new();
        let mut current = Batch::default();

        for file in files {
            let over_bytes = current.total_bytes + file.size > options.max_batch_bytes;
            let over_count = current.len() >= options.batch_size;

            if !current.is_empty() && (over_bytes || over_count) {
                batches.push(std::mem::take(&mut current));
            }
            current.push(file);
        }

        if !current.is_empty() {
            batches.push(current);
        }

        tracing::debug!(batches = batches.len(), "Built batches");
        batches
    }
}
