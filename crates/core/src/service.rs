//! The validate-then-append pipeline.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::model::{FeedbackSubmission, RawFeedback};
use crate::store::{StoreError, SubmissionStore};
use crate::validation::{FieldErrors, Schema};

/// Why a submission was not stored.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The user has to correct and resubmit.
    #[error("submission rejected: {0}")]
    Rejected(FieldErrors),
    /// Storage failed; nothing was written.
    #[error("submission store unavailable: {0}")]
    Store(#[from] StoreError),
}

/// Validate-then-append pipeline shared by every entry point.
pub struct FeedbackService {
    schema: Schema,
    store: Arc<dyn SubmissionStore>,
}

impl FeedbackService {
    /// Service using [`Schema::feedback`].
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self::with_schema(Schema::feedback(), store)
    }

    /// Service using a custom schema.
    pub fn with_schema(schema: Schema, store: Arc<dyn SubmissionStore>) -> Self {
        Self { schema, store }
    }

    /// Schema shared by every entry point.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validates only; never touches the store.
    pub fn check(&self, raw: &RawFeedback) -> FieldErrors {
        self.schema.check(raw)
    }

    /// [`FeedbackService::check`] for an untyped JSON body.
    pub fn check_json(&self, body: &Value) -> FieldErrors {
        self.schema.check_json(body)
    }

    /// Validates `raw` and appends the normalized record.
    pub fn submit(&self, raw: &RawFeedback) -> Result<FeedbackSubmission, SubmitError> {
        self.persist(self.schema.validate(raw))
    }

    /// [`FeedbackService::submit`] for an untyped JSON body; non-string
    /// values are rejected per field.
    pub fn submit_json(&self, body: &Value) -> Result<FeedbackSubmission, SubmitError> {
        self.persist(self.schema.validate_json(body))
    }

    fn persist(
        &self,
        validated: Result<FeedbackSubmission, FieldErrors>,
    ) -> Result<FeedbackSubmission, SubmitError> {
        let record = match validated {
            Ok(record) => record,
            Err(errors) => {
                tracing::debug!(fields = errors.len(), "feedback rejected");
                return Err(SubmitError::Rejected(errors));
            }
        };

        self.store.append(record.clone())?;
        tracing::info!(
            subject = %record.subject,
            category = ?record.category,
            severity = ?record.severity,
            "feedback stored"
        );
        Ok(record)
    }

    /// Every stored submission, oldest first.
    pub fn list_all(&self) -> Result<Vec<FeedbackSubmission>, StoreError> {
        self.store.list_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;
    use crate::store::MemoryStore;

    #[test]
    fn rejected_submission_leaves_store_untouched() {
        let store = Arc::new(MemoryStore::new());
        let svc = FeedbackService::new(store.clone());

        let err = svc
            .submit(&RawFeedback {
                subject: Some("hi".into()),
                message: Some("short".into()),
                ..Default::default()
            })
            .unwrap_err();

        let errors = match err {
            SubmitError::Rejected(errors) => errors,
            other => panic!("expected rejection, got {other:?}"),
        };
        assert!(errors.contains(Field::Subject));
        assert!(errors.contains(Field::Message));
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn check_never_persists() {
        let store = Arc::new(MemoryStore::new());
        let svc = FeedbackService::new(store.clone());
        let raw = RawFeedback {
            subject: Some("Valid subject".into()),
            message: Some("A perfectly valid message".into()),
            ..Default::default()
        };

        assert!(svc.check(&raw).is_empty());
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn json_type_error_is_rejected_without_writing() {
        let store = Arc::new(MemoryStore::new());
        let svc = FeedbackService::new(store.clone());
        let body = serde_json::json!({
            "subject": 42,
            "message": "A perfectly valid message"
        });

        let errors = match svc.submit_json(&body).unwrap_err() {
            SubmitError::Rejected(errors) => errors,
            other => panic!("expected rejection, got {other:?}"),
        };
        assert_eq!(errors.get(Field::Subject), ["Expected string, received number"]);
        assert_eq!(errors.len(), 1);
        assert!(store.list_all().unwrap().is_empty());
    }
}
