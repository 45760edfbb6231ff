use std::sync::{Mutex, PoisonError};

use crate::model::FeedbackSubmission;

use super::{StoreError, SubmissionStore};

/// In-memory store. Not durable; for tests and throwaway runs.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Vec<FeedbackSubmission>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store.
    pub fn with_records(records: Vec<FeedbackSubmission>) -> Self {
        Self {
            inner: Mutex::new(records),
        }
    }
}

impl SubmissionStore for MemoryStore {
    fn list_all(&self) -> Result<Vec<FeedbackSubmission>, StoreError> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.clone())
    }

    fn append(&self, record: FeedbackSubmission) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.push(record);
        Ok(())
    }
}
