#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Shared models and logic for the feedback form service.

pub mod api;
pub mod model;
pub mod service;
pub mod store;
pub mod validation;

pub use model::{Category, FeedbackSubmission, Field, RawFeedback, Severity};
pub use service::{FeedbackService, SubmitError};
pub use store::{JsonFileStore, MemoryStore, StoreError, SubmissionStore};
pub use validation::{FieldErrors, Schema};
