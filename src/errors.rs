//! Error types for the learncore crate
//!
//! Provides the error taxonomy shared by the memory store, decision
//! policies, coordinator, and monitor.

use thiserror::Error;

/// Main error type for the learning core
#[derive(Error, Debug)]
pub enum LearningError {
    /// A write or read against the experience store or outcome log failed.
    /// Callers should retry with backoff; data is never dropped silently.
    #[error("Storage failure during {operation}: {reason}")]
    Storage { operation: String, reason: String },

    /// An agent-type label did not match any registered agent-type
    #[error("Unknown agent type: {0}")]
    UnknownAgentType(String),

    /// An action label outside the agent-type's fixed vocabulary
    #[error("Unknown action '{action}' for agent type {agent_type}")]
    UnknownAction { agent_type: String, action: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for learning-core operations
pub type Result<T> = std::result::Result<T, LearningError>;

impl LearningError {
    /// Build a storage error for a named operation
    pub fn storage(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        LearningError::Storage {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

/// Convert anyhow errors raised by backends into storage failures
impl From<anyhow::Error> for LearningError {
    fn from(err: anyhow::Error) -> Self {
        LearningError::storage("backend", err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = LearningError::storage("append", "disk full");
        assert!(err.to_string().contains("append"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_unknown_action_error() {
        let err = LearningError::UnknownAction {
            agent_type: "research".to_string(),
            action: "guess".to_string(),
        };
        assert!(err.to_string().contains("research"));
        assert!(err.to_string().contains("guess"));
    }
}
