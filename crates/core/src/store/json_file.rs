use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::model::FeedbackSubmission;

use super::{StoreError, SubmissionStore};

/// Submissions kept as one pretty-printed JSON array on disk.
///
/// The file must already exist and hold a JSON array; it is never created
/// here. Each append rewrites the whole document through a sibling temp file
/// and a rename. Appends are serialized by `write_lock`, so concurrent
/// callers in this process never lose a record. Other processes writing the
/// same file are not coordinated with.
///
/// Every call blocks on file I/O; async callers should run it on a blocking
/// thread.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Store over `path`; nothing is read until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Like [`JsonFileStore::new`] but fails unless the document is readable now.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::new(path);
        let count = store.read()?.len();
        tracing::debug!(path = %store.path.display(), count, "opened submission store");
        Ok(store)
    }

    /// Document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<FeedbackSubmission>, StoreError> {
        let bytes = std::fs::read(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn persist(&self, records: &[FeedbackSubmission]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(records).map_err(StoreError::Encode)?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, bytes).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = std::fs::remove_file(&tmp);
            StoreError::Write {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("feedbacks.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SubmissionStore for JsonFileStore {
    fn list_all(&self) -> Result<Vec<FeedbackSubmission>, StoreError> {
        self.read()
    }

    fn append(&self, record: FeedbackSubmission) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.read()?;
        records.push(record);
        self.persist(&records)?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "persisted submissions");
        Ok(())
    }
}
