//! Core data types for the performance monitor

use crate::agents::AgentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded task execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub success: bool,
    /// Decision confidence reported for the execution (0.0-1.0)
    pub confidence: f64,
    /// Wall-clock duration in seconds
    pub execution_time: f64,
    /// Cost attributed to the execution
    pub cost: f64,
    pub timestamp: DateTime<Utc>,
}

/// Point-in-time statistics over an agent type's trailing window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub agent_type: AgentType,
    /// Executions inside the trailing window
    pub execution_count: usize,
    pub success_count: usize,
    pub success_rate: f64,
    pub avg_confidence: f64,
    pub avg_execution_time: f64,
    pub total_cost: f64,
    /// Lifetime executions for the agent type
    pub episodes_completed: usize,
    pub timestamp: DateTime<Utc>,
}

/// Early-performance reference an agent type is compared against.
/// Frozen once per agent type unless explicitly reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineMetrics {
    pub success_rate: f64,
    pub avg_confidence: f64,
    pub avg_execution_time: f64,
    pub avg_cost: f64,
    pub captured_at: DateTime<Utc>,
}

/// Performance trend relative to the frozen baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::Declining => "declining",
        };
        write!(f, "{}", name)
    }
}

/// Per-agent-type entry in a system report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentReport {
    pub agent_type: AgentType,
    pub episodes_completed: usize,
    pub trend: Trend,
    /// Success-rate change relative to baseline, in percent.
    /// None while the agent type is still calibrating its baseline.
    pub improvement_pct: Option<f64>,
    /// Operator guidance for declining or strongly improving agent types
    pub recommendation: Option<String>,
}

/// Aggregate summary across all observed agent types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemReport {
    pub generated_at: DateTime<Utc>,
    /// Lifetime executions across all agent types
    pub total_executions: usize,
    pub improving_count: usize,
    pub stable_count: usize,
    pub declining_count: usize,
    /// Mean improvement percentage over agent types with a baseline
    pub avg_improvement_pct: Option<f64>,
    pub agents: Vec<AgentReport>,
}
