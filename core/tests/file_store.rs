// Persistence through the file backend

use dissector_core::clock::ManualClock;
use dissector_core::richtext::AnnotatedDocument;
use dissector_core::session::{EditorSession, SessionSettings};
use dissector_core::store::{DocumentStore, FileStore, KeyValueStore, DOCUMENTS};
use dissector_core::StoreError;
use serde_json::json;
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;

#[test]
fn test_version_eviction_keeps_fifty() {
    let dir = TempDir::new().unwrap();
    let clock = Rc::new(ManualClock::new(0));
    let mut store = DocumentStore::with_clock(FileStore::new(dir.path()), clock.clone());
    let doc = store.create_document(Some("Long debate"), None).unwrap();

    let mut ids = Vec::new();
    for _ in 0..51 {
        clock.advance(1);
        ids.push(store.create_snapshot(&doc, None).unwrap().id);
    }

    let versions = store.list_versions(&doc.id).unwrap();
    assert_eq!(versions.len(), 50);
    assert!(versions.iter().all(|v| v.id != ids[0]));
    assert_eq!(versions[0].id, ids[50]);
    assert!(store.get_version(&ids[0]).unwrap().is_none());
}

#[test]
fn test_invalid_stored_content_opens_as_empty() {
    let dir = TempDir::new().unwrap();
    let mut backend = FileStore::new(dir.path());
    backend
        .put(
            DOCUMENTS,
            "doc_1_broken",
            &json!({
                "id": "doc_1_broken",
                "title": "Broken",
                "content": [{ "type": "paragraph" }],
                "annotations": {},
                "createdAt": 1,
                "updatedAt": 1
            }),
        )
        .unwrap();

    let store = DocumentStore::new(FileStore::new(dir.path()));
    let mut session = EditorSession::new(store, SessionSettings::default());
    assert!(session.open("doc_1_broken").unwrap());
    assert_eq!(session.editor().document(), &AnnotatedDocument::new());
    assert_eq!(session.title(), "Broken");
    assert!(!session.is_dirty());
}

#[test]
fn test_unreadable_record_enters_load_failed_state() {
    let dir = TempDir::new().unwrap();
    let store = DocumentStore::new(FileStore::new(dir.path()));
    let mut session = EditorSession::new(store, SessionSettings::default());
    let id = session.new_document(Some("Soon corrupt"), None).unwrap();
    session.close();

    let path = dir.path().join(DOCUMENTS).join(format!("{id}.json"));
    fs::write(&path, "{ not json").unwrap();

    let err = session.open(&id).unwrap_err();
    assert!(matches!(err, StoreError::Deserialization { .. } | StoreError::FileRead { .. }));
    assert!(session.load_error().is_some());
    assert!(session.document().is_none());
    assert!(session.editor().document().is_blank());
}

#[test]
fn test_keys_cannot_escape_the_store() {
    let dir = TempDir::new().unwrap();
    let mut backend = FileStore::new(dir.path());
    let err = backend.put(DOCUMENTS, "../outside", &json!({})).unwrap_err();
    assert!(matches!(err, StoreError::InvalidKey(_)));
    assert!(backend.get(DOCUMENTS, "a/b").is_err());
}
