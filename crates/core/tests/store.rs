use std::path::Path;
use std::sync::Arc;

use feedback_core::model::{Category, FeedbackSubmission, Severity};
use feedback_core::store::{JsonFileStore, MemoryStore, StoreError, SubmissionStore};

fn record(n: usize) -> FeedbackSubmission {
    FeedbackSubmission {
        subject: format!("Subject {n}"),
        message: format!("Message number {n} with detail"),
        category: Some(Category::Suggestions),
        severity: None,
    }
}

fn seeded(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("feedbacks.json");
    std::fs::write(&path, body).unwrap();
    path
}

fn append_then_list(store: &dyn SubmissionStore) {
    let before = store.list_all().unwrap();
    let new = record(before.len() + 100);
    store.append(new.clone()).unwrap();

    let after = store.list_all().unwrap();
    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(&after[..before.len()], &before[..]);
    assert_eq!(after.last(), Some(&new));
}

#[test]
fn file_store_appends_last_and_keeps_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = seeded(dir.path(), "[]");
    let store = JsonFileStore::open(&path).unwrap();

    for n in 0..3 {
        store.append(record(n)).unwrap();
    }
    append_then_list(&store);

    let subjects: Vec<String> = store
        .list_all()
        .unwrap()
        .into_iter()
        .map(|r| r.subject)
        .collect();
    assert_eq!(
        subjects,
        vec!["Subject 0", "Subject 1", "Subject 2", "Subject 103"]
    );
}

#[test]
fn memory_store_appends_last_and_keeps_order() {
    let store = MemoryStore::with_records(vec![record(0), record(1)]);
    append_then_list(&store);
}

#[test]
fn file_store_reads_pre_seeded_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = seeded(
        dir.path(),
        r#"[
  {"subject": "Old one", "message": "Written by an earlier version"},
  {"subject": "Typo", "message": "There is a typo on the page", "category": "bugs", "severity": "low"}
]"#,
    );
    let store = JsonFileStore::new(&path);
    let all = store.list_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].category, Some(Category::Bugs));
    assert_eq!(all[1].severity, Some(Severity::Low));
    assert_eq!(all[0].category, None);
}

#[test]
fn missing_file_is_unavailable_and_not_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedbacks.json");
    let store = JsonFileStore::new(&path);

    assert!(matches!(store.list_all(), Err(StoreError::Read { .. })));
    assert!(matches!(store.append(record(0)), Err(StoreError::Read { .. })));
    assert!(matches!(JsonFileStore::open(&path), Err(StoreError::Read { .. })));
    assert!(!path.exists());
}

#[test]
fn corrupt_file_is_unavailable_and_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    for body in ["", "{not json", r#"{"subject": "not an array"}"#] {
        let path = seeded(dir.path(), body);
        let store = JsonFileStore::new(&path);

        assert!(matches!(store.list_all(), Err(StoreError::Corrupt { .. })));
        assert!(matches!(store.append(record(0)), Err(StoreError::Corrupt { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), body);
    }
}

#[test]
fn concurrent_appends_are_not_lost() {
    let dir = tempfile::tempdir().unwrap();
    let path = seeded(dir.path(), "[]");
    let store = Arc::new(JsonFileStore::open(&path).unwrap());

    let handles: Vec<_> = (0..16)
        .map(|n| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || store.append(record(n)).unwrap())
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let mut subjects: Vec<String> = store
        .list_all()
        .unwrap()
        .into_iter()
        .map(|r| r.subject)
        .collect();
    subjects.sort();
    let mut expected: Vec<String> = (0..16).map(|n| format!("Subject {n}")).collect();
    expected.sort();
    assert_eq!(subjects, expected);
}
