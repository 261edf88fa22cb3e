//! Durable storage backends for experiences and learning outcomes
//!
//! The experience store and the coordinator's outcome log share one backend
//! (both are append-mostly streams). The backend is a swappable adapter:
//! in-memory for tests, line-delimited JSON on disk for production. Each
//! append writes a single complete record, so concurrent writers never
//! interleave partial data.

use crate::coordinator::types::LearningOutcome;
use crate::errors::{LearningError, Result};
use crate::memory::types::ExperienceRecord;
use async_trait::async_trait;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Storage adapter shared by the experience store and the outcome log
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Durably append one experience record
    async fn append_record(&self, record: &ExperienceRecord) -> Result<()>;

    /// Durably append one learning outcome
    async fn append_outcome(&self, outcome: &LearningOutcome) -> Result<()>;

    /// Load all persisted experience records, oldest first
    async fn load_records(&self) -> Result<Vec<ExperienceRecord>>;

    /// Load all persisted learning outcomes, oldest first
    async fn load_outcomes(&self) -> Result<Vec<LearningOutcome>>;
}

/// Volatile backend for tests and ephemeral deployments
#[derive(Default)]
pub struct InMemoryBackend {
    records: Mutex<Vec<ExperienceRecord>>,
    outcomes: Mutex<Vec<LearningOutcome>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    async fn append_record(&self, record: &ExperienceRecord) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| LearningError::storage("append_record", "poisoned lock"))?;
        records.push(record.clone());
        Ok(())
    }

    async fn append_outcome(&self, outcome: &LearningOutcome) -> Result<()> {
        let mut outcomes = self
            .outcomes
            .lock()
            .map_err(|_| LearningError::storage("append_outcome", "poisoned lock"))?;
        outcomes.push(outcome.clone());
        Ok(())
    }

    async fn load_records(&self) -> Result<Vec<ExperienceRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|_| LearningError::storage("load_records", "poisoned lock"))?;
        Ok(records.clone())
    }

    async fn load_outcomes(&self) -> Result<Vec<LearningOutcome>> {
        let outcomes = self
            .outcomes
            .lock()
            .map_err(|_| LearningError::storage("load_outcomes", "poisoned lock"))?;
        Ok(outcomes.clone())
    }
}

/// Append-only JSONL backend
pub struct JsonlBackend {
    storage_dir: PathBuf,
}

impl JsonlBackend {
    /// Create a backend rooted at `storage_dir`, creating it if missing
    pub fn new(storage_dir: PathBuf) -> Result<Self> {
        if !storage_dir.exists() {
            fs::create_dir_all(&storage_dir)?;
        }
        Ok(Self { storage_dir })
    }

    /// Default location under the user's home directory
    pub fn default_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| LearningError::Config("could not determine home directory".to_string()))?;
        Ok(home.join(".learncore").join("store"))
    }

    pub fn storage_dir(&self) -> &PathBuf {
        &self.storage_dir
    }

    fn records_path(&self) -> PathBuf {
        self.storage_dir.join("experiences.jsonl")
    }

    fn outcomes_path(&self) -> PathBuf {
        self.storage_dir.join("outcomes.jsonl")
    }

    fn append_line(&self, path: PathBuf, line: String) -> Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    fn load_lines<T: serde::de::DeserializeOwned>(&self, path: PathBuf) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path)?;
        let mut entries = Vec::new();

        for (line_no, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!(
                        file = %path.display(),
                        line = line_no + 1,
                        error = %e,
                        "skipping unreadable log entry"
                    );
                }
            }
        }

        Ok(entries)
    }
}

#[async_trait]
impl StorageBackend for JsonlBackend {
    async fn append_record(&self, record: &ExperienceRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.append_line(self.records_path(), line)
            .map_err(|e| LearningError::storage("append_record", e.to_string()))
    }

    async fn append_outcome(&self, outcome: &LearningOutcome) -> Result<()> {
        let line = serde_json::to_string(outcome)?;
        self.append_line(self.outcomes_path(), line)
            .map_err(|e| LearningError::storage("append_outcome", e.to_string()))
    }

    async fn load_records(&self) -> Result<Vec<ExperienceRecord>> {
        self.load_lines(self.records_path())
    }

    async fn load_outcomes(&self) -> Result<Vec<LearningOutcome>> {
        self.load_lines(self.outcomes_path())
    }
}
