use std::collections::HashMap;
use std::sync::Mutex;

use super::records::{RecordId, ReviewRecord};
use super::status::Revision;

/// Storage for reviewable records. `replace_if_current` is the only write
/// path for existing records and must compare-and-set on the stored
/// [`Revision`], status and write counter together.
pub trait ReviewRepository<T: ReviewRecord>: Send + Sync {
    fn fetch(&self, id: &RecordId) -> Result<Option<T>, RepositoryError>;
    fn insert(&self, record: T) -> Result<T, RepositoryError>;
    fn replace_if_current(&self, record: T, expected: Revision) -> Result<T, RepositoryError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record {0} already exists")]
    Conflict(RecordId),
    #[error("record {0} not found")]
    NotFound(RecordId),
    #[error(
        "record {id} is {} at revision {}, expected {} at revision {}",
        .found.status.label(),
        .found.number,
        .expected.status.label(),
        .expected.number
    )]
    Stale {
        id: RecordId,
        expected: Revision,
        found: Revision,
    },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Mutex-guarded map; the revision check and the write happen under one lock.
#[derive(Debug)]
pub struct InMemoryReviewRepository<T> {
    records: Mutex<HashMap<RecordId, T>>,
}

impl<T> Default for InMemoryReviewRepository<T> {
    fn default() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: ReviewRecord> InMemoryReviewRepository<T> {
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id().clone(), record))
            .collect();
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("record store lock poisoned".to_string())
}

impl<T: ReviewRecord> ReviewRepository<T> for InMemoryReviewRepository<T> {
    fn fetch(&self, id: &RecordId) -> Result<Option<T>, RepositoryError> {
        let guard = self.records.lock().map_err(|_| poisoned())?;
        Ok(guard.get(id).cloned())
    }

    fn insert(&self, record: T) -> Result<T, RepositoryError> {
        let mut guard = self.records.lock().map_err(|_| poisoned())?;
        if guard.contains_key(record.id()) {
            return Err(RepositoryError::Conflict(record.id().clone()));
        }
        guard.insert(record.id().clone(), record.clone());
        Ok(record)
    }

    fn replace_if_current(&self, record: T, expected: Revision) -> Result<T, RepositoryError> {
        let mut guard = self.records.lock().map_err(|_| poisoned())?;
        let stored = guard
            .get_mut(record.id())
            .ok_or_else(|| RepositoryError::NotFound(record.id().clone()))?;
        if stored.revision() != expected {
            return Err(RepositoryError::Stale {
                id: record.id().clone(),
                expected,
                found: stored.revision(),
            });
        }
        *stored = record.clone();
        Ok(record)
    }
}
