//! Experience store: append-mostly log with similarity retrieval
//!
//! Records arrive continuously from many concurrent agents, so retrieval
//! stays cheap: token-set overlap against the stored text, no training step.

use crate::agents::AgentType;
use crate::errors::{LearningError, Result};
use crate::memory::similarity::{tokenize, SimilarityScorer, TokenOverlapScorer};
use crate::memory::types::{ExperienceId, ExperienceRecord, SimilarExperience};
use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};

/// In-memory experience store with bounded retention.
///
/// Retention: at capacity, the record with the lowest importance score is
/// evicted, oldest first among equals. The durable log behind the store
/// keeps the full history.
pub struct ExperienceStore {
    records: VecDeque<ExperienceRecord>,
    ids: HashSet<ExperienceId>,
    capacity: usize,
    scorer: Box<dyn SimilarityScorer>,
}

impl ExperienceStore {
    /// Create a store with the default token-overlap scorer
    pub fn new(capacity: usize) -> Self {
        Self::with_scorer(capacity, Box::new(TokenOverlapScorer))
    }

    /// Create a store with a custom similarity scorer
    pub fn with_scorer(capacity: usize, scorer: Box<dyn SimilarityScorer>) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            ids: HashSet::new(),
            capacity,
            scorer,
        }
    }

    /// Rebuild a store from previously persisted records
    pub fn from_records(capacity: usize, records: Vec<ExperienceRecord>) -> Self {
        let mut store = Self::new(capacity);
        for record in records {
            // Duplicate ids in a replayed log collapse to the first write
            let _ = store.add(record);
        }
        store
    }

    /// Store a record. Fails if the id is already present; an experience is
    /// an immutable fact and a repeated id is a caller bug.
    pub fn add(&mut self, record: ExperienceRecord) -> Result<()> {
        if self.ids.contains(&record.id) {
            return Err(LearningError::storage(
                "add",
                format!("duplicate experience id {}", record.id),
            ));
        }

        if self.records.len() >= self.capacity {
            self.evict_least_important();
        }

        self.ids.insert(record.id);
        self.records.push_back(record);
        Ok(())
    }

    /// Return up to `limit` records ordered by descending similarity to the
    /// query, ties broken by most recent first. An empty store yields an
    /// empty result, never an error.
    pub fn search_similar(
        &self,
        query: &str,
        agent_type: Option<AgentType>,
        limit: usize,
    ) -> Vec<SimilarExperience> {
        let query_tokens = tokenize(query);

        let mut matches: Vec<SimilarExperience> = self
            .records
            .iter()
            .filter(|r| agent_type.map_or(true, |t| r.agent_type == t))
            .filter_map(|record| {
                let doc_tokens = tokenize(&record.search_text());
                let similarity = self.scorer.score(&query_tokens, &doc_tokens);
                (similarity > 0.0).then(|| SimilarExperience {
                    record: record.clone(),
                    similarity,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.record.timestamp.cmp(&a.record.timestamp))
        });
        matches.truncate(limit);
        matches
    }

    /// All records for an agent type at or above `min_success_score`,
    /// best first, most recent first among equals
    pub fn successful_patterns(
        &self,
        agent_type: AgentType,
        min_success_score: f64,
    ) -> Vec<ExperienceRecord> {
        let mut patterns: Vec<ExperienceRecord> = self
            .records
            .iter()
            .filter(|r| r.agent_type == agent_type && r.success_score >= min_success_score)
            .cloned()
            .collect();

        patterns.sort_by(|a, b| {
            b.success_score
                .partial_cmp(&a.success_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.timestamp.cmp(&a.timestamp))
        });
        patterns
    }

    /// Whether a record with this id is currently retained
    pub fn contains(&self, id: &ExperienceId) -> bool {
        self.ids.contains(id)
    }

    /// Number of records currently retained
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict_least_important(&mut self) {
        let victim = self
            .records
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.importance_score
                    .partial_cmp(&b.importance_score)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.timestamp.cmp(&b.timestamp))
            })
            .map(|(idx, _)| idx);

        if let Some(idx) = victim {
            if let Some(evicted) = self.records.remove(idx) {
                self.ids.remove(&evicted.id);
                tracing::debug!(
                    id = %evicted.id,
                    importance = evicted.importance_score,
                    "evicted experience at capacity"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        agent_type: AgentType,
        action: &str,
        context: &str,
        success: f64,
        importance: f64,
    ) -> ExperienceRecord {
        ExperienceRecord::new(agent_type, action, context, "done", success, importance)
    }

    #[test]
    fn test_add_and_len() {
        let mut store = ExperienceStore::new(10);
        store
            .add(record(AgentType::Research, "broad_survey", "survey", 0.8, 0.5))
            .unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut store = ExperienceStore::new(10);
        let rec = record(AgentType::Research, "broad_survey", "survey", 0.8, 0.5);
        let dup = rec.clone();

        store.add(rec).unwrap();
        let result = store.add(dup);

        assert!(matches!(result, Err(LearningError::Storage { .. })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_search_empty_store_returns_empty() {
        let store = ExperienceStore::new(10);
        let matches = store.search_similar("anything at all", None, 5);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let mut store = ExperienceStore::new(10);
        store
            .add(record(
                AgentType::Research,
                "broad_survey",
                "survey parsing crates for config files",
                0.8,
                0.5,
            ))
            .unwrap();
        store
            .add(record(
                AgentType::Research,
                "focused_inquiry",
                "deploy the staging service",
                0.7,
                0.5,
            ))
            .unwrap();

        let matches = store.search_similar("survey config parsing", None, 5);

        assert!(!matches.is_empty());
        assert_eq!(matches[0].record.action, "broad_survey");
        for pair in matches.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }

    #[test]
    fn test_search_respects_limit() {
        let mut store = ExperienceStore::new(20);
        for i in 0..8 {
            store
                .add(record(
                    AgentType::Build,
                    "incremental",
                    &format!("build step {}", i),
                    0.6,
                    0.5,
                ))
                .unwrap();
        }

        let matches = store.search_similar("build step", None, 3);
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn test_search_filters_by_agent_type() {
        let mut store = ExperienceStore::new(10);
        store
            .add(record(AgentType::Build, "incremental", "build the parser", 0.6, 0.5))
            .unwrap();
        store
            .add(record(AgentType::Review, "deep_audit", "review the parser", 0.9, 0.5))
            .unwrap();

        let matches = store.search_similar("the parser", Some(AgentType::Review), 5);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].record.agent_type, AgentType::Review);
    }

    #[test]
    fn test_successful_patterns_filtered_and_sorted() {
        let mut store = ExperienceStore::new(10);
        store
            .add(record(AgentType::Design, "reuse_template", "a", 0.95, 0.5))
            .unwrap();
        store
            .add(record(AgentType::Design, "first_principles", "b", 0.4, 0.5))
            .unwrap();
        store
            .add(record(AgentType::Design, "iterate_prototype", "c", 0.8, 0.5))
            .unwrap();

        let patterns = store.successful_patterns(AgentType::Design, 0.7);

        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].action, "reuse_template");
        assert_eq!(patterns[1].action, "iterate_prototype");
    }

    #[test]
    fn test_eviction_drops_least_important() {
        let mut store = ExperienceStore::new(2);
        store
            .add(record(AgentType::Research, "broad_survey", "keep high", 0.8, 0.9))
            .unwrap();
        store
            .add(record(AgentType::Research, "focused_inquiry", "drop low", 0.8, 0.1))
            .unwrap();
        store
            .add(record(AgentType::Research, "synthesize_sources", "newest", 0.8, 0.5))
            .unwrap();

        assert_eq!(store.len(), 2);
        let contexts: Vec<&str> = store.records.iter().map(|r| r.context.as_str()).collect();
        assert!(contexts.contains(&"keep high"));
        assert!(contexts.contains(&"newest"));
        assert!(!contexts.contains(&"drop low"));
    }

    #[test]
    fn test_from_records_collapses_duplicates() {
        let rec = record(AgentType::Build, "incremental", "replayed", 0.7, 0.5);
        let store = ExperienceStore::from_records(10, vec![rec.clone(), rec]);
        assert_eq!(store.len(), 1);
    }
}
