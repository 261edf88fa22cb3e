//! Performance monitor
//!
//! Tracks recent executions per agent type, freezes an early baseline, and
//! classifies each agent type's trend against it. Scans run out-of-band;
//! nothing here belongs on a task-execution path.

use crate::agents::AgentType;
use crate::config::LearningConfig;
use crate::monitor::types::{
    AgentReport, BaselineMetrics, ExecutionRecord, PerformanceSnapshot, SystemReport, Trend,
};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};

/// Monitor configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Executions observed before a baseline freezes
    pub baseline_sample_size: usize,
    /// Trailing execution window per agent type
    pub rolling_window_size: usize,
    /// Retained snapshots per agent type
    pub snapshot_history_size: usize,
    /// Success-rate delta separating improving/stable/declining
    pub improvement_threshold: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            baseline_sample_size: 50,
            rolling_window_size: 100,
            snapshot_history_size: 20,
            improvement_threshold: 0.05,
        }
    }
}

impl From<&LearningConfig> for MonitorConfig {
    fn from(config: &LearningConfig) -> Self {
        Self {
            baseline_sample_size: config.baseline_sample_size,
            rolling_window_size: config.rolling_window_size,
            snapshot_history_size: config.snapshot_history_size,
            improvement_threshold: config.improvement_threshold,
        }
    }
}

/// Baseline-relative performance tracking across all agent types
pub struct PerformanceMonitor {
    config: MonitorConfig,
    histories: HashMap<AgentType, VecDeque<ExecutionRecord>>,
    lifetime_counts: HashMap<AgentType, usize>,
    baselines: HashMap<AgentType, BaselineMetrics>,
    snapshots: HashMap<AgentType, VecDeque<PerformanceSnapshot>>,
    last_improvement: HashMap<AgentType, DateTime<Utc>>,
}

impl PerformanceMonitor {
    /// Create a monitor with default configuration
    pub fn new() -> Self {
        Self::with_config(MonitorConfig::default())
    }

    /// Create a monitor with custom configuration
    pub fn with_config(config: MonitorConfig) -> Self {
        Self {
            config,
            histories: HashMap::new(),
            lifetime_counts: HashMap::new(),
            baselines: HashMap::new(),
            snapshots: HashMap::new(),
            last_improvement: HashMap::new(),
        }
    }

    /// Append one execution to the agent type's bounded history.
    /// The first time the history reaches the baseline sample size, the
    /// baseline freezes over those executions.
    pub fn record_execution(
        &mut self,
        agent_type: AgentType,
        success: bool,
        confidence: f64,
        execution_time: f64,
        cost: f64,
    ) {
        let history = self.histories.entry(agent_type).or_default();
        history.push_back(ExecutionRecord {
            success,
            confidence: confidence.clamp(0.0, 1.0),
            execution_time,
            cost,
            timestamp: Utc::now(),
        });
        while history.len() > self.config.rolling_window_size {
            history.pop_front();
        }

        *self.lifetime_counts.entry(agent_type).or_insert(0) += 1;

        if !self.baselines.contains_key(&agent_type)
            && history.len() >= self.config.baseline_sample_size
        {
            let baseline = Self::baseline_over(history);
            tracing::debug!(
                agent_type = %agent_type,
                success_rate = baseline.success_rate,
                "baseline frozen"
            );
            self.baselines.insert(agent_type, baseline);
        }
    }

    /// Compute a snapshot over the trailing window. Returns None while no
    /// history exists; that is a normal condition, not an error.
    pub fn snapshot(&mut self, agent_type: AgentType) -> Option<PerformanceSnapshot> {
        let history = self.histories.get(&agent_type)?;
        if history.is_empty() {
            return None;
        }

        let count = history.len();
        let success_count = history.iter().filter(|r| r.success).count();
        let snapshot = PerformanceSnapshot {
            agent_type,
            execution_count: count,
            success_count,
            success_rate: success_count as f64 / count as f64,
            avg_confidence: history.iter().map(|r| r.confidence).sum::<f64>() / count as f64,
            avg_execution_time: history.iter().map(|r| r.execution_time).sum::<f64>()
                / count as f64,
            total_cost: history.iter().map(|r| r.cost).sum(),
            episodes_completed: self.lifetime_counts.get(&agent_type).copied().unwrap_or(0),
            timestamp: Utc::now(),
        };

        let retained = self.snapshots.entry(agent_type).or_default();
        retained.push_back(snapshot.clone());
        while retained.len() > self.config.snapshot_history_size {
            retained.pop_front();
        }

        Some(snapshot)
    }

    /// Classify the agent type's trend against its frozen baseline.
    /// Without a baseline (still calibrating) the trend is Stable.
    pub fn check_improvement(&mut self, agent_type: AgentType) -> Trend {
        let current = match self.snapshot(agent_type) {
            Some(snapshot) => snapshot.success_rate,
            None => return Trend::Stable,
        };
        let baseline = match self.baselines.get(&agent_type) {
            Some(baseline) => baseline.success_rate,
            None => return Trend::Stable,
        };

        let delta = current - baseline;
        if delta > self.config.improvement_threshold {
            self.last_improvement.insert(agent_type, Utc::now());
            Trend::Improving
        } else if delta < -self.config.improvement_threshold {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }

    /// Aggregate summary across every observed agent type. Best-effort:
    /// agent types without a baseline appear as still calibrating.
    pub fn report(&mut self) -> SystemReport {
        let mut agents = Vec::new();
        let mut improvement_sum = 0.0;
        let mut improvement_samples = 0usize;
        let mut improving = 0usize;
        let mut stable = 0usize;
        let mut declining = 0usize;

        let observed: Vec<AgentType> = AgentType::ALL
            .into_iter()
            .filter(|t| self.histories.contains_key(t))
            .collect();

        for agent_type in observed {
            let trend = self.check_improvement(agent_type);
            match trend {
                Trend::Improving => improving += 1,
                Trend::Stable => stable += 1,
                Trend::Declining => declining += 1,
            }

            let improvement_pct = self.improvement_pct(agent_type);
            if let Some(pct) = improvement_pct {
                improvement_sum += pct;
                improvement_samples += 1;
            }

            agents.push(AgentReport {
                agent_type,
                episodes_completed: self.lifetime_counts.get(&agent_type).copied().unwrap_or(0),
                trend,
                improvement_pct,
                recommendation: self.recommendation(agent_type, trend, improvement_pct),
            });
        }

        SystemReport {
            generated_at: Utc::now(),
            total_executions: self.lifetime_counts.values().sum(),
            improving_count: improving,
            stable_count: stable,
            declining_count: declining,
            avg_improvement_pct: (improvement_samples > 0)
                .then(|| improvement_sum / improvement_samples as f64),
            agents,
        }
    }

    /// Human-readable summary lines derived from the current report
    pub fn insights(&mut self) -> Vec<String> {
        let report = self.report();
        let mut lines = Vec::new();

        lines.push(format!(
            "{} executions across {} agent types: {} improving, {} stable, {} declining",
            report.total_executions,
            report.agents.len(),
            report.improving_count,
            report.stable_count,
            report.declining_count,
        ));

        if let Some(avg) = report.avg_improvement_pct {
            lines.push(format!("average success-rate change vs baseline: {:+.1}%", avg));
        }

        for agent in &report.agents {
            if let Some(recommendation) = &agent.recommendation {
                lines.push(format!("{}: {}", agent.agent_type, recommendation));
            } else if agent.improvement_pct.is_none() {
                lines.push(format!(
                    "{}: still calibrating baseline ({} executions)",
                    agent.agent_type, agent.episodes_completed,
                ));
            }
        }

        lines
    }

    /// Timestamp of the last observed improvement for an agent type
    pub fn last_improvement(&self, agent_type: AgentType) -> Option<DateTime<Utc>> {
        self.last_improvement.get(&agent_type).copied()
    }

    /// Frozen baseline for an agent type, if calibrated
    pub fn baseline(&self, agent_type: AgentType) -> Option<&BaselineMetrics> {
        self.baselines.get(&agent_type)
    }

    /// Drop the frozen baseline; it re-freezes once the history next
    /// reaches the baseline sample size.
    pub fn reset_baseline(&mut self, agent_type: AgentType) {
        self.baselines.remove(&agent_type);
    }

    fn improvement_pct(&mut self, agent_type: AgentType) -> Option<f64> {
        let baseline = self.baselines.get(&agent_type)?.success_rate;
        let current = self.snapshot(agent_type)?.success_rate;
        Some((current - baseline) / baseline.abs().max(0.01) * 100.0)
    }

    fn recommendation(
        &self,
        agent_type: AgentType,
        trend: Trend,
        improvement_pct: Option<f64>,
    ) -> Option<String> {
        let strong_gain = improvement_pct
            .map(|pct| pct >= 2.0 * self.config.improvement_threshold * 100.0)
            .unwrap_or(false);

        match trend {
            Trend::Declining => Some(format!(
                "success rate below baseline ({:+.1}%); raise exploration or reset the {} baseline after process changes",
                improvement_pct.unwrap_or(0.0),
                agent_type,
            )),
            Trend::Improving if strong_gain => Some(format!(
                "sustained gains ({:+.1}%); consider lowering exploration to lock in the learned {} strategy",
                improvement_pct.unwrap_or(0.0),
                agent_type,
            )),
            _ => None,
        }
    }

    fn baseline_over(history: &VecDeque<ExecutionRecord>) -> BaselineMetrics {
        let count = history.len().max(1) as f64;
        BaselineMetrics {
            success_rate: history.iter().filter(|r| r.success).count() as f64 / count,
            avg_confidence: history.iter().map(|r| r.confidence).sum::<f64>() / count,
            avg_execution_time: history.iter().map(|r| r.execution_time).sum::<f64>() / count,
            avg_cost: history.iter().map(|r| r.cost).sum::<f64>() / count,
            captured_at: Utc::now(),
        }
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}
