use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

use crate::core::MatchStore;
use crate::models::MatchResult;

#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error("Store lock poisoned")]
    Poisoned,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only in-process match store
///
/// Writes are serialized through a mutex, so concurrent batches for the
/// same job never interleave a single record.
#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    results: Mutex<Vec<MatchResult>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<MatchResult>>, MemoryStoreError> {
        self.results.lock().map_err(|_| MemoryStoreError::Poisoned)
    }

    /// Snapshot of every stored result in insertion order
    pub fn results(&self) -> Vec<MatchResult> {
        self.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Stored results for one job in insertion order
    pub fn results_for_job(&self, job_id: &str) -> Vec<MatchResult> {
        self.results()
            .into_iter()
            .filter(|r| r.job_id == job_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MatchStore for InMemoryMatchStore {
    type Error = MemoryStoreError;

    async fn store(&self, result: &MatchResult) -> Result<i64, Self::Error> {
        let mut results = self.lock()?;
        results.push(result.clone());
        Ok(results.len() as i64)
    }
}
