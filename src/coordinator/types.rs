//! Core data types for the learning coordinator

use crate::agents::AgentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One reinforcement-learning transition, appended after a task execution.
/// State strings are opaque context encodings, comparable only by equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningOutcome {
    /// Identifier of the executing agent instance
    pub agent_id: String,
    /// Agent category the outcome belongs to
    pub agent_type: AgentType,
    /// Action taken
    pub action: String,
    /// State the action was chosen in
    pub state: String,
    /// Scalar learning signal, unbounded sign
    pub reward: f64,
    /// State after the action
    pub next_state: String,
    /// Whether the task succeeded
    pub success: bool,
    /// Caller confidence in the outcome (0.0-1.0)
    pub confidence: f64,
    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
}

impl LearningOutcome {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        agent_id: impl Into<String>,
        agent_type: AgentType,
        action: impl Into<String>,
        state: impl Into<String>,
        reward: f64,
        next_state: impl Into<String>,
        success: bool,
        confidence: f64,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            agent_type,
            action: action.into(),
            state: state.into(),
            reward,
            next_state: next_state.into(),
            success,
            confidence: confidence.clamp(0.0, 1.0),
            timestamp: Utc::now(),
        }
    }
}

/// Running system-wide counters, updated on every registered outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalMetrics {
    /// Outcomes registered so far
    pub total_episodes: usize,
    /// Sum of all rewards
    pub total_reward: f64,
    /// Fraction of successful outcomes
    pub success_rate: f64,
    /// Mean reported confidence
    pub avg_confidence: f64,
    /// Configured Q-update step size, echoed for operational tooling
    pub learning_rate: f64,
    /// Sample-size-weighted success rate (0.0-1.0)
    pub adaptation_score: f64,
}

impl GlobalMetrics {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            total_episodes: 0,
            total_reward: 0.0,
            success_rate: 0.0,
            avg_confidence: 0.0,
            learning_rate,
            adaptation_score: 0.0,
        }
    }
}

/// Per-action aggregate over the outcome log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionPattern {
    pub action: String,
    pub count: usize,
    pub avg_reward: f64,
    pub success_rate: f64,
}

/// Full-history pattern analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternAnalysis {
    /// Outcomes analyzed
    pub total_outcomes: usize,
    /// Overall fraction of successes
    pub success_rate: f64,
    /// Relative reward change, recent window vs earliest window.
    /// None until the log is large enough to partition.
    pub improvement_rate: Option<f64>,
    /// Aggregates per action label, highest average reward first
    pub actions: Vec<ActionPattern>,
}

impl PatternAnalysis {
    /// Explicit empty-result shape for an empty log
    pub fn empty() -> Self {
        Self {
            total_outcomes: 0,
            success_rate: 0.0,
            improvement_rate: None,
            actions: Vec::new(),
        }
    }
}
