//! Pipeline lifecycle states

use serde::Serialize;
use std::fmt;

/// Where a pipeline run currently is
///
/// A run moves `Idle → Collecting → Batching → Running → Finalizing → Done`.
/// `Failed` is entered when setup fails, before any file is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Collecting,
    Batching,
    Running,
    Finalizing,
    Done,
    Failed,
}

impl PipelineState {
    /// True once a run has ended, successfully or not
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether `next` is a legal successor of `self`
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Idle, Collecting)
                | (Collecting, Batching)
                | (Batching, Running)
                | (Running, Finalizing)
                | (Finalizing, Done)
                | (_, Failed)
                | (Done | Failed, Idle)
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Collecting => "collecting",
            Self::Batching => "batching",
            Self::Running => "running",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}
