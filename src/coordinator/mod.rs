//! Learning Coordinator
//!
//! Receives a learning outcome from every decision policy after each task
//! execution and reports system-wide trends over the shared outcome log.

pub mod outcomes;
pub mod types;

pub use outcomes::{CoordinatorConfig, LearningCoordinator};
pub use types::{ActionPattern, GlobalMetrics, LearningOutcome, PatternAnalysis};
