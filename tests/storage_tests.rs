#![allow(missing_docs)]

use evodrive::simulation::brain::Network;
use evodrive::simulation::storage::{
    FileStore, MemoryStore, NetworkRecord, NetworkStore, RECORD_VERSION, StoreError,
};
use tempfile::tempdir;

#[test]
fn test_memory_store_starts_empty() {
    let store = MemoryStore::new();
    assert!(store.raw().is_none());
    assert!(store.load().expect("empty slot loads").is_none());
}

#[test]
fn test_memory_store_save_load_discard() {
    let mut store = MemoryStore::new();
    let network = Network::new(&[5, 6, 4]);

    store.save(&network).expect("save succeeds");
    let loaded = store.load().expect("load succeeds").expect("slot is full");
    assert_eq!(loaded, network);

    // saving again overwrites the slot
    let replacement = Network::new(&[5, 4]);
    store.save(&replacement).expect("save succeeds");
    let loaded = store.load().expect("load succeeds").expect("slot is full");
    assert_eq!(loaded.shape(), vec![5, 4]);

    store.discard().expect("discard succeeds");
    assert!(store.load().expect("load succeeds").is_none());
    // discarding an empty slot is fine
    store.discard().expect("discard succeeds");
}

#[test]
fn test_record_layout() {
    let network = Network::new(&[5, 6, 4]);
    let json = NetworkRecord::encode(&network).expect("encode succeeds");

    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["version"], serde_json::json!(RECORD_VERSION));
    let levels = value["levels"].as_array().expect("levels is an array");
    assert_eq!(levels.len(), 2);
    assert!(levels[0].get("weights").is_some());
    assert!(levels[0].get("biases").is_some());
}

#[test]
fn test_malformed_record_is_a_format_error() {
    let store = MemoryStore::from_raw("{ this is not json");
    assert!(matches!(store.load(), Err(StoreError::Format(_))));

    let store = MemoryStore::from_raw(r#"{"version": 1}"#);
    assert!(matches!(store.load(), Err(StoreError::Format(_))));
}

#[test]
fn test_unknown_version_is_rejected() {
    let network = Network::new(&[5, 6, 4]);
    let json = NetworkRecord::encode(&network).expect("encode succeeds");

    let mut value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    value["version"] = serde_json::json!(7);
    let store = MemoryStore::from_raw(value.to_string());

    match store.load() {
        Err(StoreError::UnsupportedVersion { found }) => assert_eq!(found, 7),
        other => panic!("expected an unsupported version, got {other:?}"),
    }
}

#[test]
fn test_store_error_messages() {
    let error = StoreError::UnsupportedVersion { found: 7 };
    assert!(error.to_string().contains('7'));

    let error = MemoryStore::from_raw("nope")
        .load()
        .expect_err("malformed record");
    assert!(error.to_string().starts_with("malformed network record"));
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn test_file_store_missing_slot() {
    let dir = tempdir().expect("temp dir");
    let mut store = FileStore::new(dir.path(), "best_brain");

    assert_eq!(store.path(), dir.path().join("best_brain.json"));
    assert!(store.load().expect("missing file loads").is_none());
    store.discard().expect("discarding a missing file succeeds");
}

#[test]
fn test_file_store_round_trip() {
    let dir = tempdir().expect("temp dir");
    let mut store = FileStore::new(dir.path().join("nested").join("slots"), "best_brain");
    let network = Network::new(&[5, 6, 4]);

    store.save(&network).expect("save creates the directory");
    assert!(store.path().exists());

    // a second handle on the same slot sees the saved network
    let other = FileStore::new(dir.path().join("nested").join("slots"), "best_brain");
    let loaded = other.load().expect("load succeeds").expect("slot is full");
    assert_eq!(loaded, network);

    store.discard().expect("discard succeeds");
    assert!(!store.path().exists());
    assert!(other.load().expect("load succeeds").is_none());
}

#[test]
fn test_file_store_slots_are_independent() {
    let dir = tempdir().expect("temp dir");
    let mut first = FileStore::new(dir.path(), "first");
    let second = FileStore::new(dir.path(), "second");

    first.save(&Network::new(&[5, 4])).expect("save succeeds");

    assert!(first.load().expect("load succeeds").is_some());
    assert!(second.load().expect("load succeeds").is_none());
}

#[test]
fn test_file_store_malformed_file() {
    let dir = tempdir().expect("temp dir");
    let store = FileStore::new(dir.path(), "broken");
    std::fs::write(store.path(), "[1, 2, 3]").expect("write succeeds");

    assert!(matches!(store.load(), Err(StoreError::Format(_))));
}
