//! CLI commands

pub mod analyze;
pub mod config;
pub mod plan;

pub use analyze::AnalyzeArgs;
