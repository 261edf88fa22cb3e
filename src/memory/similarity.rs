//! Text similarity for experience retrieval
//!
//! Similarity is a term-overlap metric over normalized text: cheap,
//! explainable, and incremental. The scorer sits behind a trait so the
//! metric can be swapped without touching the store contract.

use std::collections::HashSet;

/// Tokenize text into a lower-cased, whitespace-split term set
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|s| s.to_string())
        .collect()
}

/// Pluggable similarity metric over tokenized text
pub trait SimilarityScorer: Send + Sync {
    /// Score two token sets; result must lie in [0, 1]
    fn score(&self, query: &HashSet<String>, document: &HashSet<String>) -> f64;
}

/// Jaccard similarity: |intersection| / |union| of the token sets
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenOverlapScorer;

impl SimilarityScorer for TokenOverlapScorer {
    fn score(&self, query: &HashSet<String>, document: &HashSet<String>) -> f64 {
        if query.is_empty() && document.is_empty() {
            return 1.0;
        }

        let intersection = query.intersection(document).count();
        let union = query.union(document).count();

        if union == 0 {
            0.0
        } else {
            intersection as f64 / union as f64
        }
    }
}
