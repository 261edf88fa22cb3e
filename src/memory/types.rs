//! Core data types for the experience memory store

use crate::agents::AgentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for experience records
pub type ExperienceId = uuid::Uuid;

/// Experience record: an immutable fact about one past action.
///
/// Created by a caller after task completion and never mutated;
/// retrieval is read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceRecord {
    /// Unique record identifier
    pub id: ExperienceId,
    /// Agent category the experience belongs to
    pub agent_type: AgentType,
    /// Action label from the agent type's vocabulary
    pub action: String,
    /// Free text describing the situation
    pub context: String,
    /// Free text describing what happened
    pub outcome: String,
    /// How well the action worked (0.0-1.0)
    pub success_score: f64,
    /// Relative retention and ranking weight (0.0-1.0)
    pub importance_score: f64,
    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
}

impl ExperienceRecord {
    /// Create a new record with a generated id. Scores are clamped into [0, 1].
    pub fn new(
        agent_type: AgentType,
        action: impl Into<String>,
        context: impl Into<String>,
        outcome: impl Into<String>,
        success_score: f64,
        importance_score: f64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            agent_type,
            action: action.into(),
            context: context.into(),
            outcome: outcome.into(),
            success_score: success_score.clamp(0.0, 1.0),
            importance_score: importance_score.clamp(0.0, 1.0),
            timestamp: Utc::now(),
        }
    }

    /// Concatenated text used for similarity scoring
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.action, self.context, self.outcome)
    }
}

/// A retrieved record together with its similarity to the query
#[derive(Debug, Clone)]
pub struct SimilarExperience {
    /// Matched record
    pub record: ExperienceRecord,
    /// Similarity score (0.0-1.0)
    pub similarity: f64,
}
