//! Per-agent-type decision policy
//!
//! Epsilon-greedy action selection over a state-keyed value table with the
//! standard Q-learning update. "State" is an opaque caller-provided string;
//! the table is keyed by exact (state, action) equality.

use crate::agents::AgentType;
use crate::config::LearningConfig;
use crate::errors::{LearningError, Result};
use crate::policy::types::{ActionChoice, PolicyMetrics};
use rand::Rng;
use std::collections::{HashMap, VecDeque};

/// Decision policy configuration
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Q-update step size (alpha)
    pub learning_rate: f64,
    /// Future reward discount (gamma)
    pub discount_factor: f64,
    /// Starting exploration probability
    pub epsilon_initial: f64,
    /// Exploration floor
    pub epsilon_min: f64,
    /// Multiplicative decay applied after every update
    pub epsilon_decay: f64,
    /// Rolling reward/confidence history size
    pub history_window: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.95,
            epsilon_initial: 0.3,
            epsilon_min: 0.01,
            epsilon_decay: 0.995,
            history_window: 100,
        }
    }
}

impl From<&LearningConfig> for PolicyConfig {
    fn from(config: &LearningConfig) -> Self {
        Self {
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            epsilon_initial: config.epsilon_initial,
            epsilon_min: config.epsilon_min,
            epsilon_decay: config.epsilon_decay,
            history_window: config.rolling_window_size,
        }
    }
}

/// Value-learning policy owned by exactly one agent type.
///
/// Single-writer: concurrent tasks for the same agent type must serialize
/// their updates through whatever lock wraps this instance.
pub struct DecisionPolicy {
    agent_type: AgentType,
    config: PolicyConfig,
    /// (state, action) -> learned value; unseen pairs read as 0.0
    q_table: HashMap<(String, String), f64>,
    epsilon: f64,
    total_actions: usize,
    success_count: usize,
    reward_history: VecDeque<f64>,
    confidence_history: VecDeque<f64>,
}

impl DecisionPolicy {
    /// Create a policy with default configuration
    pub fn new(agent_type: AgentType) -> Self {
        Self::with_config(agent_type, PolicyConfig::default())
    }

    /// Create a policy with custom configuration
    pub fn with_config(agent_type: AgentType, config: PolicyConfig) -> Self {
        let epsilon = config.epsilon_initial;
        Self {
            agent_type,
            config,
            q_table: HashMap::new(),
            epsilon,
            total_actions: 0,
            success_count: 0,
            reward_history: VecDeque::new(),
            confidence_history: VecDeque::new(),
        }
    }

    pub fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    /// Select an action for the given state.
    ///
    /// With probability epsilon a random vocabulary action is explored at a
    /// fixed 0.5 confidence; otherwise the highest-valued action is
    /// exploited, ties resolving to the first in vocabulary order.
    pub fn choose_action(&mut self, state: &str) -> ActionChoice {
        let actions = self.agent_type.actions();
        let mut rng = rand::thread_rng();

        let choice = if rng.gen::<f64>() < self.epsilon {
            let action = actions[rng.gen_range(0..actions.len())];
            ActionChoice {
                action: action.to_string(),
                confidence: 0.5,
                explored: true,
            }
        } else {
            let mut best_action = actions[0];
            let mut best_value = self.value(state, actions[0]);
            for action in &actions[1..] {
                let value = self.value(state, action);
                if value > best_value {
                    best_value = value;
                    best_action = action;
                }
            }
            ActionChoice {
                action: best_action.to_string(),
                confidence: Self::value_confidence(best_value),
                explored: false,
            }
        };

        Self::push_bounded(
            &mut self.confidence_history,
            choice.confidence,
            self.config.history_window,
        );
        choice
    }

    /// Apply the Q-learning update and decay epsilon.
    ///
    /// value(s,a) += alpha * (reward + gamma * max_a' value(s',a') - value(s,a))
    pub fn update(&mut self, state: &str, action: &str, reward: f64, next_state: &str) -> Result<()> {
        if !self.agent_type.has_action(action) {
            return Err(LearningError::UnknownAction {
                agent_type: self.agent_type.to_string(),
                action: action.to_string(),
            });
        }

        let current = self.value(state, action);
        let max_next = self.max_value(next_state);
        let target = reward + self.config.discount_factor * max_next;
        let updated = current + self.config.learning_rate * (target - current);

        self.q_table
            .insert((state.to_string(), action.to_string()), updated);

        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.epsilon_min);

        self.total_actions += 1;
        if reward > 0.0 {
            self.success_count += 1;
        }
        Self::push_bounded(&mut self.reward_history, reward, self.config.history_window);

        Ok(())
    }

    /// Read-only learning progress snapshot
    pub fn performance_metrics(&self) -> PolicyMetrics {
        PolicyMetrics {
            total_actions: self.total_actions,
            success_count: self.success_count,
            success_rate: if self.total_actions > 0 {
                self.success_count as f64 / self.total_actions as f64
            } else {
                0.0
            },
            avg_reward: Self::mean(&self.reward_history),
            avg_confidence: Self::mean(&self.confidence_history),
            epsilon: self.epsilon,
        }
    }

    /// Highest-valued action for a state, if any value has been learned
    pub fn best_action(&self, state: &str) -> Option<(String, f64)> {
        self.agent_type
            .actions()
            .iter()
            .filter_map(|action| {
                self.q_table
                    .get(&(state.to_string(), action.to_string()))
                    .map(|v| (action.to_string(), *v))
            })
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Learned value for a (state, action) pair; unseen pairs are 0.0
    pub fn value(&self, state: &str, action: &str) -> f64 {
        self.q_table
            .get(&(state.to_string(), action.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Restore the initial exploration rate
    pub fn reset_exploration(&mut self) {
        self.epsilon = self.config.epsilon_initial;
    }

    fn max_value(&self, state: &str) -> f64 {
        // Vocabularies are non-empty and unseen pairs read as 0.0, so this
        // is 0.0 for a never-visited next state.
        self.agent_type
            .actions()
            .iter()
            .map(|action| self.value(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    fn value_confidence(value: f64) -> f64 {
        (0.5 + 0.4 * value / (1.0 + value.abs())).clamp(0.1, 0.9)
    }

    fn push_bounded(history: &mut VecDeque<f64>, value: f64, window: usize) {
        history.push_back(value);
        while history.len() > window {
            history.pop_front();
        }
    }

    fn mean(history: &VecDeque<f64>) -> f64 {
        if history.is_empty() {
            0.0
        } else {
            history.iter().sum::<f64>() / history.len() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greedy_policy() -> DecisionPolicy {
        let config = PolicyConfig {
            epsilon_initial: 0.0,
            epsilon_min: 0.0,
            ..Default::default()
        };
        DecisionPolicy::with_config(AgentType::Research, config)
    }

    #[test]
    fn test_empty_table_exploit_is_deterministic() {
        let mut policy = greedy_policy();

        for _ in 0..10 {
            let choice = policy.choose_action("s1");
            assert_eq!(choice.action, "broad_survey");
            assert_eq!(choice.confidence, 0.5);
            assert!(!choice.explored);
        }
    }

    #[test]
    fn test_unseen_pair_reads_zero() {
        let policy = greedy_policy();
        assert_eq!(policy.value("never-seen", "broad_survey"), 0.0);
    }

    #[test]
    fn test_first_update_arithmetic() {
        let mut policy = greedy_policy();

        policy.update("s1", "broad_survey", 10.0, "s2").unwrap();

        // 0 + 0.1 * (10 + 0.95 * 0 - 0) = 1.0
        assert!((policy.value("s1", "broad_survey") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_update_prefers_learned_action() {
        let mut policy = greedy_policy();

        policy.update("s1", "focused_inquiry", 10.0, "s2").unwrap();

        let choice = policy.choose_action("s1");
        assert_eq!(choice.action, "focused_inquiry");
        assert!(choice.confidence > 0.5);
    }

    #[test]
    fn test_zero_reward_decays_value_toward_zero() {
        let mut policy = greedy_policy();
        policy.update("s1", "broad_survey", 10.0, "s2").unwrap();
        let before = policy.value("s1", "broad_survey");

        // next state s2 has no recorded actions, so max_next = 0
        policy.update("s1", "broad_survey", 0.0, "s2").unwrap();
        let after = policy.value("s1", "broad_survey");

        let expected = before + 0.1 * (0.0 - before);
        assert!((after - expected).abs() < 1e-9);
        assert!(after < before);
    }

    #[test]
    fn test_epsilon_never_increases_and_floors() {
        let config = PolicyConfig {
            epsilon_initial: 0.3,
            epsilon_min: 0.05,
            epsilon_decay: 0.5,
            ..Default::default()
        };
        let mut policy = DecisionPolicy::with_config(AgentType::Build, config);

        let mut last = policy.epsilon();
        for _ in 0..20 {
            policy.update("s", "incremental", 1.0, "s").unwrap();
            let current = policy.epsilon();
            assert!(current <= last);
            assert!(current >= 0.05);
            last = current;
        }
        assert!((policy.epsilon() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_action_rejected() {
        let mut policy = greedy_policy();
        let result = policy.update("s1", "escalate", 1.0, "s2");
        assert!(matches!(result, Err(LearningError::UnknownAction { .. })));
        assert_eq!(policy.performance_metrics().total_actions, 0);
    }

    #[test]
    fn test_explore_step_has_fixed_confidence() {
        let config = PolicyConfig {
            epsilon_initial: 1.0,
            epsilon_min: 1.0,
            epsilon_decay: 1.0,
            ..Default::default()
        };
        let mut policy = DecisionPolicy::with_config(AgentType::Review, config);

        let choice = policy.choose_action("s1");
        assert!(choice.explored);
        assert_eq!(choice.confidence, 0.5);
        assert!(AgentType::Review.has_action(&choice.action));
    }

    #[test]
    fn test_metrics_track_rewards() {
        let mut policy = greedy_policy();
        policy.update("s1", "broad_survey", 1.0, "s2").unwrap();
        policy.update("s1", "broad_survey", -1.0, "s2").unwrap();
        policy.update("s1", "broad_survey", 1.0, "s2").unwrap();

        let metrics = policy.performance_metrics();
        assert_eq!(metrics.total_actions, 3);
        assert_eq!(metrics.success_count, 2);
        assert!((metrics.success_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!((metrics.avg_reward - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_monotone_in_value() {
        let low = DecisionPolicy::value_confidence(0.5);
        let mid = DecisionPolicy::value_confidence(2.0);
        let high = DecisionPolicy::value_confidence(50.0);
        assert!(low < mid);
        assert!(mid < high);
        assert!(high <= 0.9);
        assert!(DecisionPolicy::value_confidence(-50.0) >= 0.1);
        assert_eq!(DecisionPolicy::value_confidence(0.0), 0.5);
    }

    #[test]
    fn test_reset_exploration() {
        let config = PolicyConfig {
            epsilon_initial: 0.3,
            epsilon_decay: 0.5,
            ..Default::default()
        };
        let mut policy = DecisionPolicy::with_config(AgentType::Operations, config);

        policy.update("s", "escalate", 1.0, "s").unwrap();
        assert!(policy.epsilon() < 0.3);

        policy.reset_exploration();
        assert_eq!(policy.epsilon(), 0.3);
    }

    #[test]
    fn test_best_action_none_without_learning() {
        let policy = greedy_policy();
        assert!(policy.best_action("s1").is_none());
    }

    #[test]
    fn test_bounded_reward_history() {
        let config = PolicyConfig {
            history_window: 5,
            epsilon_initial: 0.0,
            epsilon_min: 0.0,
            ..Default::default()
        };
        let mut policy = DecisionPolicy::with_config(AgentType::Build, config);

        for i in 0..10 {
            policy.update("s", "incremental", i as f64, "s").unwrap();
        }

        // rolling mean covers the last 5 rewards only: 5..=9
        let metrics = policy.performance_metrics();
        assert!((metrics.avg_reward - 7.0).abs() < 1e-9);
    }
}
