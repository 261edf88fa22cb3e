//! Core data types for decision policies

use serde::{Deserialize, Serialize};

/// Result of one action selection
#[derive(Debug, Clone)]
pub struct ActionChoice {
    /// Chosen action label from the agent type's vocabulary
    pub action: String,
    /// Confidence in the choice (0.0-1.0)
    pub confidence: f64,
    /// Whether this was an exploration step
    pub explored: bool,
}

/// Read-only snapshot of a policy's learning progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyMetrics {
    /// Total actions learned from
    pub total_actions: usize,
    /// Updates with positive reward
    pub success_count: usize,
    /// success_count / total_actions
    pub success_rate: f64,
    /// Rolling average reward
    pub avg_reward: f64,
    /// Rolling average selection confidence
    pub avg_confidence: f64,
    /// Current exploration rate
    pub epsilon: f64,
}
