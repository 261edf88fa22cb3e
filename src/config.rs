//! Learning configuration
//!
//! All tunable constants recognized by the learning core, loadable from a
//! TOML file with sane defaults. Values are validated on load so a bad
//! config fails loudly instead of corrupting the learning signal.

use crate::errors::{LearningError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Q-update step size (alpha)
    pub learning_rate: f64,
    /// Future reward discount (gamma)
    pub discount_factor: f64,
    /// Starting exploration probability
    pub epsilon_initial: f64,
    /// Exploration floor
    pub epsilon_min: f64,
    /// Multiplicative epsilon decay applied after every update
    pub epsilon_decay: f64,
    /// Executions observed before an agent type's baseline freezes
    pub baseline_sample_size: usize,
    /// Trailing window for rolling statistics and execution history
    pub rolling_window_size: usize,
    /// Retained performance snapshots per agent type
    pub snapshot_history_size: usize,
    /// Success-rate delta separating improving/stable/declining
    pub improvement_threshold: f64,
    /// Default result cap for similarity search
    pub similarity_result_limit: usize,
    /// In-memory experience store capacity
    pub memory_capacity: usize,
    /// Minimum outcome-log size before trend partitioning kicks in
    pub min_pattern_window: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.95,
            epsilon_initial: 0.3,
            epsilon_min: 0.01,
            epsilon_decay: 0.995,
            baseline_sample_size: 50,
            rolling_window_size: 100,
            snapshot_history_size: 20,
            improvement_threshold: 0.05,
            similarity_result_limit: 5,
            memory_capacity: 10_000,
            min_pattern_window: 10,
        }
    }
}

impl LearningConfig {
    /// Load configuration from the default path, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = LearningConfig::default();
            config.save()?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: LearningConfig = toml::from_str(&contents)
            .map_err(|e| LearningError::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| LearningError::Config(format!("failed to serialize config: {}", e)))?;

        fs::write(&config_path, toml_string)?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| LearningError::Config("could not determine home directory".to_string()))?;

        Ok(home.join(".learncore").join("config.toml"))
    }

    /// Reject configurations that would corrupt learning
    pub fn validate(&self) -> Result<()> {
        let unit_interval = [
            ("learning_rate", self.learning_rate),
            ("discount_factor", self.discount_factor),
            ("epsilon_initial", self.epsilon_initial),
            ("epsilon_min", self.epsilon_min),
            ("epsilon_decay", self.epsilon_decay),
            ("improvement_threshold", self.improvement_threshold),
        ];
        for (name, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(LearningError::Config(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.epsilon_min > self.epsilon_initial {
            return Err(LearningError::Config(format!(
                "epsilon_min {} exceeds epsilon_initial {}",
                self.epsilon_min, self.epsilon_initial
            )));
        }

        let non_zero = [
            ("baseline_sample_size", self.baseline_sample_size),
            ("rolling_window_size", self.rolling_window_size),
            ("snapshot_history_size", self.snapshot_history_size),
            ("similarity_result_limit", self.similarity_result_limit),
            ("memory_capacity", self.memory_capacity),
            ("min_pattern_window", self.min_pattern_window),
        ];
        for (name, value) in non_zero {
            if value == 0 {
                return Err(LearningError::Config(format!("{} must be non-zero", name)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LearningConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.discount_factor, 0.95);
    }

    #[test]
    fn test_rejects_out_of_range_rate() {
        let config = LearningConfig {
            learning_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(LearningError::Config(_))));
    }

    #[test]
    fn test_rejects_epsilon_floor_above_initial() {
        let config = LearningConfig {
            epsilon_min: 0.5,
            epsilon_initial: 0.3,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let config = LearningConfig {
            memory_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = LearningConfig::default();
        let toml_string = toml::to_string(&config).unwrap();
        let parsed: LearningConfig = toml::from_str(&toml_string).unwrap();
        assert_eq!(parsed.rolling_window_size, config.rolling_window_size);
    }
}
