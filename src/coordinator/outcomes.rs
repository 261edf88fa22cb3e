//! Learning coordinator
//!
//! Aggregates learning outcomes from every decision policy. Cheap running
//! counters answer health queries instantly; the O(n) pattern analysis is
//! reserved for periodic out-of-band jobs.

use crate::config::LearningConfig;
use crate::coordinator::types::{ActionPattern, GlobalMetrics, LearningOutcome, PatternAnalysis};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Coordinator configuration
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Echoed into global metrics for operational tooling
    pub learning_rate: f64,
    /// Minimum log size before trend partitioning kicks in
    pub min_pattern_window: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            min_pattern_window: 10,
        }
    }
}

impl From<&LearningConfig> for CoordinatorConfig {
    fn from(config: &LearningConfig) -> Self {
        Self {
            learning_rate: config.learning_rate,
            min_pattern_window: config.min_pattern_window,
        }
    }
}

/// System-wide learning aggregator
pub struct LearningCoordinator {
    config: CoordinatorConfig,
    log: Vec<LearningOutcome>,
    success_count: usize,
    confidence_sum: f64,
    metrics: GlobalMetrics,
}

impl LearningCoordinator {
    /// Create a coordinator with default configuration
    pub fn new() -> Self {
        Self::with_config(CoordinatorConfig::default())
    }

    /// Create a coordinator with custom configuration
    pub fn with_config(config: CoordinatorConfig) -> Self {
        let metrics = GlobalMetrics::new(config.learning_rate);
        Self {
            config,
            log: Vec::new(),
            success_count: 0,
            confidence_sum: 0.0,
            metrics,
        }
    }

    /// Rebuild a coordinator by replaying a persisted outcome log
    pub fn from_outcomes(config: CoordinatorConfig, outcomes: Vec<LearningOutcome>) -> Self {
        let mut coordinator = Self::with_config(config);
        for outcome in outcomes {
            coordinator.register_outcome(outcome);
        }
        coordinator
    }

    /// Append one outcome and update the running counters.
    ///
    /// The durable append happens before this call reaches the in-memory
    /// log; a storage failure surfaces to the caller and nothing is
    /// registered here.
    pub fn register_outcome(&mut self, outcome: LearningOutcome) {
        if outcome.success {
            self.success_count += 1;
        }
        self.confidence_sum += outcome.confidence;

        self.metrics.total_episodes += 1;
        self.metrics.total_reward += outcome.reward;

        let episodes = self.metrics.total_episodes as f64;
        self.metrics.success_rate = self.success_count as f64 / episodes;
        self.metrics.avg_confidence = self.confidence_sum / episodes;
        // Sample-size-weighted success rate: a perfect run over a handful of
        // episodes must not read as full adaptation.
        self.metrics.adaptation_score =
            self.metrics.success_rate * (1.0 - (-episodes / 50.0).exp());

        self.log.push(outcome);
    }

    /// Running counters as of the last registered outcome. O(1).
    pub fn global_metrics(&self) -> GlobalMetrics {
        self.metrics.clone()
    }

    /// Scan the full outcome log for per-action aggregates and the
    /// early-vs-recent reward trend. An empty log yields the explicit
    /// empty shape, never an error.
    pub fn analyze_patterns(&self) -> PatternAnalysis {
        if self.log.is_empty() {
            return PatternAnalysis::empty();
        }

        let mut per_action: HashMap<&str, (usize, f64, usize)> = HashMap::new();
        for outcome in &self.log {
            let entry = per_action.entry(outcome.action.as_str()).or_insert((0, 0.0, 0));
            entry.0 += 1;
            entry.1 += outcome.reward;
            if outcome.success {
                entry.2 += 1;
            }
        }

        let mut actions: Vec<ActionPattern> = per_action
            .into_iter()
            .map(|(action, (count, reward_sum, successes))| ActionPattern {
                action: action.to_string(),
                count,
                avg_reward: reward_sum / count as f64,
                success_rate: successes as f64 / count as f64,
            })
            .collect();
        actions.sort_by(|a, b| {
            b.avg_reward
                .partial_cmp(&a.avg_reward)
                .unwrap_or(Ordering::Equal)
        });

        let window = self.config.min_pattern_window;
        let improvement_rate = (self.log.len() > window).then(|| {
            let older_avg = Self::avg_reward(&self.log[..window]);
            let recent_avg = Self::avg_reward(&self.log[self.log.len() - window..]);
            (recent_avg - older_avg) / older_avg.abs().max(1.0)
        });

        PatternAnalysis {
            total_outcomes: self.log.len(),
            success_rate: self.metrics.success_rate,
            improvement_rate,
            actions,
        }
    }

    /// Outcomes registered so far
    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    fn avg_reward(outcomes: &[LearningOutcome]) -> f64 {
        outcomes.iter().map(|o| o.reward).sum::<f64>() / outcomes.len() as f64
    }
}

impl Default for LearningCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentType;

    fn outcome(action: &str, reward: f64, success: bool) -> LearningOutcome {
        LearningOutcome::new(
            "agent-1",
            AgentType::Research,
            action,
            "s1",
            reward,
            "s2",
            success,
            0.7,
        )
    }

    #[test]
    fn test_success_rate_incremental_mean() {
        let mut coordinator = LearningCoordinator::new();

        coordinator.register_outcome(outcome("broad_survey", 1.0, true));
        coordinator.register_outcome(outcome("broad_survey", -1.0, false));
        coordinator.register_outcome(outcome("focused_inquiry", 1.0, true));

        let metrics = coordinator.global_metrics();
        assert_eq!(metrics.total_episodes, 3);
        assert!((metrics.total_reward - 1.0).abs() < 1e-9);
        assert!((metrics.success_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!((metrics.avg_confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_empty_log_analysis() {
        let coordinator = LearningCoordinator::new();
        let analysis = coordinator.analyze_patterns();

        assert_eq!(analysis.total_outcomes, 0);
        assert!(analysis.actions.is_empty());
        assert!(analysis.improvement_rate.is_none());
    }

    #[test]
    fn test_per_action_aggregates() {
        let mut coordinator = LearningCoordinator::new();
        coordinator.register_outcome(outcome("broad_survey", 2.0, true));
        coordinator.register_outcome(outcome("broad_survey", 4.0, true));
        coordinator.register_outcome(outcome("focused_inquiry", -1.0, false));

        let analysis = coordinator.analyze_patterns();

        assert_eq!(analysis.actions.len(), 2);
        assert_eq!(analysis.actions[0].action, "broad_survey");
        assert_eq!(analysis.actions[0].count, 2);
        assert!((analysis.actions[0].avg_reward - 3.0).abs() < 1e-9);
        assert!((analysis.actions[1].success_rate - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_improvement_rate_needs_enough_outcomes() {
        let mut coordinator = LearningCoordinator::with_config(CoordinatorConfig {
            min_pattern_window: 3,
            ..Default::default()
        });

        for _ in 0..3 {
            coordinator.register_outcome(outcome("broad_survey", 1.0, true));
        }
        assert!(coordinator.analyze_patterns().improvement_rate.is_none());

        coordinator.register_outcome(outcome("broad_survey", 1.0, true));
        assert!(coordinator.analyze_patterns().improvement_rate.is_some());
    }

    #[test]
    fn test_improvement_rate_detects_rising_rewards() {
        let mut coordinator = LearningCoordinator::with_config(CoordinatorConfig {
            min_pattern_window: 3,
            ..Default::default()
        });

        for _ in 0..3 {
            coordinator.register_outcome(outcome("broad_survey", 1.0, true));
        }
        for _ in 0..3 {
            coordinator.register_outcome(outcome("broad_survey", 3.0, true));
        }

        let improvement = coordinator.analyze_patterns().improvement_rate.unwrap();
        // (3.0 - 1.0) / max(1, |1.0|) = 2.0
        assert!((improvement - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_adaptation_score_grows_with_sample_size() {
        let mut coordinator = LearningCoordinator::new();

        coordinator.register_outcome(outcome("broad_survey", 1.0, true));
        let early = coordinator.global_metrics().adaptation_score;

        for _ in 0..99 {
            coordinator.register_outcome(outcome("broad_survey", 1.0, true));
        }
        let late = coordinator.global_metrics().adaptation_score;

        assert!(early < late);
        assert!(late <= 1.0);
        assert_eq!(coordinator.global_metrics().success_rate, 1.0);
    }

    #[test]
    fn test_replay_rebuilds_counters() {
        let outcomes = vec![
            outcome("broad_survey", 1.0, true),
            outcome("broad_survey", -1.0, false),
        ];
        let coordinator =
            LearningCoordinator::from_outcomes(CoordinatorConfig::default(), outcomes);

        assert_eq!(coordinator.len(), 2);
        assert!((coordinator.global_metrics().success_rate - 0.5).abs() < 1e-9);
    }
}
