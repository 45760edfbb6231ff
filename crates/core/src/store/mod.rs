//! Durable list of accepted submissions.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::FeedbackSubmission;

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// The backing medium could not be read or written.
///
/// Every variant means "store unavailable" to callers; the request that hit it
/// cannot be completed and no partial result is returned.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Missing or unreadable document.
    #[error("read {}: {source}", .path.display())]
    Read {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Document is not a JSON array of submissions.
    #[error("parse {}: {source}", .path.display())]
    Corrupt {
        /// Document path.
        path: PathBuf,
        /// Parse error.
        source: serde_json::Error,
    },
    /// Temp file write or rename failed.
    #[error("write {}: {source}", .path.display())]
    Write {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Records could not be serialized.
    #[error("encode submissions: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Append-only submission log.
///
/// There is deliberately no update or delete.
pub trait SubmissionStore: Send + Sync {
    /// Full sequence, in insertion order.
    fn list_all(&self) -> Result<Vec<FeedbackSubmission>, StoreError>;

    /// Adds `record` as the last element.
    fn append(&self, record: FeedbackSubmission) -> Result<(), StoreError>;
}
