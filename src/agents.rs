//! Agent type registry
//!
//! Each agent type is a closed category of task work with its own fixed
//! action vocabulary and its own decision policy instance. The vocabulary
//! is static so an action label outside it is a caller bug, not a fallback.

use crate::errors::LearningError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of agent categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    /// Information gathering and synthesis
    Research,
    /// Solution shaping and architecture
    Design,
    /// Construction of the actual artifact
    Build,
    /// Quality inspection of produced work
    Review,
    /// Running and maintaining deployed work
    Operations,
}

impl AgentType {
    /// All agent types, in registration order
    pub const ALL: [AgentType; 5] = [
        AgentType::Research,
        AgentType::Design,
        AgentType::Build,
        AgentType::Review,
        AgentType::Operations,
    ];

    /// Fixed action vocabulary for this agent type.
    /// Order matters: exploit-mode ties resolve to the first entry.
    pub fn actions(&self) -> &'static [&'static str] {
        match self {
            AgentType::Research => &["broad_survey", "focused_inquiry", "synthesize_sources"],
            AgentType::Design => &["reuse_template", "first_principles", "iterate_prototype"],
            AgentType::Build => &["incremental", "scaffold_first", "test_driven"],
            AgentType::Review => &["checklist_pass", "deep_audit", "spot_check"],
            AgentType::Operations => &["run_playbook", "diagnose_first", "escalate"],
        }
    }

    /// Check whether an action label belongs to this type's vocabulary
    pub fn has_action(&self, action: &str) -> bool {
        self.actions().contains(&action)
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentType::Research => "research",
            AgentType::Design => "design",
            AgentType::Build => "build",
            AgentType::Review => "review",
            AgentType::Operations => "operations",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for AgentType {
    type Err = LearningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "research" => Ok(AgentType::Research),
            "design" => Ok(AgentType::Design),
            "build" => Ok(AgentType::Build),
            "review" => Ok(AgentType::Review),
            "operations" => Ok(AgentType::Operations),
            other => Err(LearningError::UnknownAgentType(other.to_string())),
        }
    }
}
