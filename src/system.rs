//! Learning core facade
//!
//! Wires the experience store, per-agent-type decision policies, learning
//! coordinator, and performance monitor behind one handle. Instances are
//! constructed explicitly and passed around; there is no process-wide
//! singleton, so tests and multi-tenant deployments stay isolated.
//!
//! Locking follows ownership: one lock per decision policy serializes that
//! agent type's read-modify-write updates, while the shared store, outcome
//! log, and monitor each take a single writer for the duration of one
//! insert.

use crate::agents::AgentType;
use crate::config::LearningConfig;
use crate::coordinator::{CoordinatorConfig, GlobalMetrics, LearningCoordinator, LearningOutcome, PatternAnalysis};
use crate::errors::Result;
use crate::memory::{
    ExperienceRecord, ExperienceStore, InMemoryBackend, SimilarExperience, StorageBackend,
};
use crate::monitor::{MonitorConfig, PerformanceMonitor, PerformanceSnapshot, SystemReport, Trend};
use crate::policy::{ActionChoice, DecisionPolicy, PolicyConfig, PolicyMetrics};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle over the four learning components
pub struct LearningCore {
    config: LearningConfig,
    store: Arc<RwLock<ExperienceStore>>,
    policies: HashMap<AgentType, Arc<RwLock<DecisionPolicy>>>,
    coordinator: Arc<RwLock<LearningCoordinator>>,
    monitor: Arc<RwLock<PerformanceMonitor>>,
    backend: Arc<dyn StorageBackend>,
}

impl LearningCore {
    /// Create a core with a volatile backend
    pub fn new(config: LearningConfig) -> Self {
        Self::assemble(
            config.clone(),
            ExperienceStore::new(config.memory_capacity),
            LearningCoordinator::with_config(CoordinatorConfig::from(&config)),
            Arc::new(InMemoryBackend::new()),
        )
    }

    /// Create a core with default configuration and a volatile backend
    pub fn default_config() -> Self {
        Self::new(LearningConfig::default())
    }

    /// Create a core over a durable backend, replaying its history into the
    /// in-memory store and coordinator counters
    pub async fn with_backend(
        config: LearningConfig,
        backend: Arc<dyn StorageBackend>,
    ) -> Result<Self> {
        let records = backend.load_records().await?;
        let outcomes = backend.load_outcomes().await?;

        let store = ExperienceStore::from_records(config.memory_capacity, records);
        let coordinator =
            LearningCoordinator::from_outcomes(CoordinatorConfig::from(&config), outcomes);

        Ok(Self::assemble(config, store, coordinator, backend))
    }

    fn assemble(
        config: LearningConfig,
        store: ExperienceStore,
        coordinator: LearningCoordinator,
        backend: Arc<dyn StorageBackend>,
    ) -> Self {
        let policies = AgentType::ALL
            .into_iter()
            .map(|agent_type| {
                let policy = DecisionPolicy::with_config(agent_type, PolicyConfig::from(&config));
                (agent_type, Arc::new(RwLock::new(policy)))
            })
            .collect();

        let monitor = PerformanceMonitor::with_config(MonitorConfig::from(&config));

        Self {
            store: Arc::new(RwLock::new(store)),
            policies,
            coordinator: Arc::new(RwLock::new(coordinator)),
            monitor: Arc::new(RwLock::new(monitor)),
            backend,
            config,
        }
    }

    /// Select an action for a task in the given state
    pub async fn choose_action(&self, agent_type: AgentType, state: &str) -> ActionChoice {
        self.policy(agent_type).write().await.choose_action(state)
    }

    /// Feed one task result back into the agent type's value table
    pub async fn update(
        &self,
        agent_type: AgentType,
        state: &str,
        action: &str,
        reward: f64,
        next_state: &str,
    ) -> Result<()> {
        self.policy(agent_type)
            .write()
            .await
            .update(state, action, reward, next_state)
    }

    /// Store an experience record: durable append first, then the in-memory
    /// index. A duplicate id or failed write surfaces as a storage error.
    pub async fn add_memory(&self, record: ExperienceRecord) -> Result<()> {
        let mut store = self.store.write().await;
        if store.contains(&record.id) {
            return Err(crate::errors::LearningError::storage(
                "add",
                format!("duplicate experience id {}", record.id),
            ));
        }

        if let Err(e) = self.backend.append_record(&record).await {
            tracing::warn!(error = %e, "experience append failed; record not stored");
            return Err(e);
        }
        store.add(record)
    }

    /// Retrieve experiences similar to the query text.
    /// `limit` falls back to the configured similarity result limit.
    pub async fn search_similar_memories(
        &self,
        query: &str,
        agent_type: Option<AgentType>,
        limit: Option<usize>,
    ) -> Vec<SimilarExperience> {
        let limit = limit.unwrap_or(self.config.similarity_result_limit);
        self.store.read().await.search_similar(query, agent_type, limit)
    }

    /// High-scoring experiences for an agent type, best first
    pub async fn successful_patterns(
        &self,
        agent_type: AgentType,
        min_success_score: f64,
    ) -> Vec<ExperienceRecord> {
        self.store
            .read()
            .await
            .successful_patterns(agent_type, min_success_score)
    }

    /// Register a learning outcome: durable append first, then the running
    /// counters. A storage failure surfaces to the caller for retry;
    /// nothing is dropped silently.
    pub async fn register_outcome(&self, outcome: LearningOutcome) -> Result<()> {
        if let Err(e) = self.backend.append_outcome(&outcome).await {
            tracing::warn!(error = %e, "outcome append failed; counters not updated");
            return Err(e);
        }
        self.coordinator.write().await.register_outcome(outcome);
        Ok(())
    }

    /// Record one execution for baseline-relative performance tracking
    pub async fn record_execution(
        &self,
        agent_type: AgentType,
        success: bool,
        confidence: f64,
        execution_time: f64,
        cost: f64,
    ) {
        self.monitor
            .write()
            .await
            .record_execution(agent_type, success, confidence, execution_time, cost);
    }

    /// Read-only learning progress for one agent type's policy
    pub async fn performance_metrics(&self, agent_type: AgentType) -> PolicyMetrics {
        self.policy(agent_type).read().await.performance_metrics()
    }

    /// Highest-valued learned action for a state, if any
    pub async fn best_action(&self, agent_type: AgentType, state: &str) -> Option<(String, f64)> {
        self.policy(agent_type).read().await.best_action(state)
    }

    /// Restore an agent type's initial exploration rate
    pub async fn reset_exploration(&self, agent_type: AgentType) {
        self.policy(agent_type).write().await.reset_exploration();
    }

    /// System-wide running counters. Cheap; does not rescan the log.
    pub async fn global_metrics(&self) -> GlobalMetrics {
        self.coordinator.read().await.global_metrics()
    }

    /// Full-history pattern analysis. O(n); run out-of-band, not on a
    /// task-execution path.
    pub async fn analyze_patterns(&self) -> PatternAnalysis {
        self.coordinator.read().await.analyze_patterns()
    }

    /// Trailing-window snapshot for one agent type
    pub async fn snapshot(&self, agent_type: AgentType) -> Option<PerformanceSnapshot> {
        self.monitor.write().await.snapshot(agent_type)
    }

    /// Trend of one agent type against its frozen baseline
    pub async fn check_improvement(&self, agent_type: AgentType) -> Trend {
        self.monitor.write().await.check_improvement(agent_type)
    }

    /// Aggregate performance report across all observed agent types
    pub async fn report(&self) -> SystemReport {
        self.monitor.write().await.report()
    }

    /// Human-readable summary lines with per-agent-type recommendations
    pub async fn insights(&self) -> Vec<String> {
        self.monitor.write().await.insights()
    }

    /// Drop an agent type's frozen baseline so it re-freezes
    pub async fn reset_baseline(&self, agent_type: AgentType) {
        self.monitor.write().await.reset_baseline(agent_type);
    }

    /// Active configuration
    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    fn policy(&self, agent_type: AgentType) -> &Arc<RwLock<DecisionPolicy>> {
        // Policies are pre-built for every AgentType variant
        self.policies
            .get(&agent_type)
            .expect("policy exists for every agent type")
    }
}
