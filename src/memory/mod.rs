//! Experience Memory Store
//!
//! Durable, append-mostly log of past (action, context, outcome) records
//! with similarity-based retrieval.
//!
//! Components:
//! - Experience Store: bounded in-memory log with term-overlap search
//! - Similarity: pluggable scorer (Jaccard token overlap by default)
//! - Persistence: swappable storage backends (in-memory, JSONL)

pub mod persistence;
pub mod similarity;
pub mod store;
pub mod types;

pub use persistence::{InMemoryBackend, JsonlBackend, StorageBackend};
pub use similarity::{SimilarityScorer, TokenOverlapScorer};
pub use store::ExperienceStore;
pub use types::{ExperienceId, ExperienceRecord, SimilarExperience};
