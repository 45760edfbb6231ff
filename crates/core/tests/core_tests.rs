//! End-to-end tests for the validate-then-append pipeline.

use std::sync::Arc;

use feedback_core::model::{Category, FeedbackSubmission, RawFeedback, Severity};
use feedback_core::store::{JsonFileStore, SubmissionStore};
use feedback_core::{FeedbackService, SubmitError};

#[test]
fn accepted_submission_is_listed_last() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedbacks.json");
    std::fs::write(
        &path,
        r#"[{"subject": "Existing", "message": "Already in the log"}]"#,
    )
    .unwrap();
    let store = Arc::new(JsonFileStore::open(&path).unwrap());
    let svc = FeedbackService::new(store.clone());

    let stored = svc
        .submit(&RawFeedback {
            subject: Some("Bug in login".into()),
            message: Some("The login button does nothing on click.".into()),
            category: Some("bugs".into()),
            severity: Some("high".into()),
        })
        .unwrap();

    let expected = FeedbackSubmission {
        subject: "Bug in login".into(),
        message: "The login button does nothing on click.".into(),
        category: Some(Category::Bugs),
        severity: Some(Severity::High),
    };
    assert_eq!(stored, expected);

    let all = svc.list_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].subject, "Existing");
    assert_eq!(all.last(), Some(&expected));

    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        on_disk[1],
        serde_json::json!({
            "subject": "Bug in login",
            "message": "The login button does nothing on click.",
            "category": "bugs",
            "severity": "high"
        })
    );
}

#[test]
fn rejected_submission_does_not_touch_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedbacks.json");
    std::fs::write(&path, "[]").unwrap();
    let svc = FeedbackService::new(Arc::new(JsonFileStore::open(&path).unwrap()));

    let err = svc
        .submit(&RawFeedback {
            subject: Some("hi".into()),
            message: Some("short".into()),
            ..Default::default()
        })
        .unwrap_err();

    assert!(matches!(err, SubmitError::Rejected(ref e) if e.len() == 2));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
}

#[test]
fn store_failure_is_distinguishable_from_rejection() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path().join("missing.json")));
    let svc = FeedbackService::new(store.clone());

    let err = svc
        .submit(&RawFeedback {
            subject: Some("Valid subject".into()),
            message: Some("A perfectly valid message".into()),
            ..Default::default()
        })
        .unwrap_err();

    assert!(matches!(err, SubmitError::Store(_)));
    assert!(store.list_all().is_err());
}

#[test]
fn raw_round_trips_from_record() {
    let rec = FeedbackSubmission {
        subject: "Slow page".into(),
        message: "The dashboard takes ages to load.".into(),
        category: Some(Category::Complaints),
        severity: None,
    };
    let raw = RawFeedback::from(&rec);
    assert_eq!(raw.category.as_deref(), Some("complaints"));
    assert_eq!(raw.severity, None);
}

#[test]
fn length_bounds_come_from_the_schema_not_the_record_type() {
    // A rule-less schema accepts an empty body; only the feedback schema
    // enforces the bounds.
    let rec = feedback_core::Schema::empty()
        .validate(&RawFeedback::default())
        .unwrap();
    assert_eq!(rec.subject, "");
    assert!(feedback_core::Schema::feedback()
        .validate(&RawFeedback::from(&rec))
        .is_err());

    let store = feedback_core::MemoryStore::new();
    store.append(rec.clone()).unwrap();
    assert_eq!(store.list_all().unwrap(), vec![rec]);
}
