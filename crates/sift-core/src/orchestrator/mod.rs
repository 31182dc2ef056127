//! Pipeline orchestration
//!
//! The [`Orchestrator`] wires the collector, batch builder, limiter, retry
//! executor and tracker together for one run:
//!
//! ```text
//! tree ─► FileCollector ─► BatchBuilder ─► [batch 1] ─► [batch 2] ─► ... ─► report
//!                                              │
//!                                    RetryExecutor per file
//!                                    (shared limiter, backoff)
//! ```

mod builder;
mod pipeline;
mod report;
mod state;

pub use builder::OrchestratorBuilder;
pub use pipeline::Orchestrator;
pub use report::{PipelinePlan, PipelineReport};
pub use state::PipelineState;
