//! Performance Monitor
//!
//! Periodically snapshots each agent type's recent execution statistics and
//! classifies its trend against a frozen early baseline.

pub mod tracker;
pub mod types;

pub use tracker::{MonitorConfig, PerformanceMonitor};
pub use types::{
    AgentReport, BaselineMetrics, ExecutionRecord, PerformanceSnapshot, SystemReport, Trend,
};
