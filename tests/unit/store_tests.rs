/// Persisted store tests against the in-memory and SQLite backends
use std::collections::BTreeMap;
use proptest::prelude::*;
use wellness_tracker::*;

#[test]
fn test_missing_key_returns_default() {
    let store = PersistedStore::new(MemoryBackend::new());
    let value: Vec<u32> = store.load("nothing", vec![7]);
    assert_eq!(value, vec![7]);
}

#[test]
fn test_documents_are_written_in_envelope() {
    let store = PersistedStore::new(MemoryBackend::new());
    store.save("numbers", &vec![1, 2, 3]);

    let raw = store.backend().read("numbers").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["version"], DOCUMENT_VERSION);
    assert_eq!(value["data"], serde_json::json!([1, 2, 3]));
}

#[test]
fn test_bare_legacy_document_loads() {
    let store = PersistedStore::new(MemoryBackend::new());
    store.backend().write("numbers", "[4,5,6]").unwrap();

    let value: Vec<u32> = store.load("numbers", Vec::new());
    assert_eq!(value, vec![4, 5, 6]);
}

#[test]
fn test_malformed_document_falls_back_to_default() {
    let store = PersistedStore::new(MemoryBackend::new());
    store.backend().write("numbers", "{not json").unwrap();
    store.backend().write("streak", r#"{"version":1,"data":"wrong shape"}"#).unwrap();

    let numbers: Vec<u32> = store.load("numbers", vec![0]);
    assert_eq!(numbers, vec![0]);

    let streak: StreakState = store.load("streak", StreakState::new());
    assert_eq!(streak, StreakState::new());
}

#[test]
fn test_quota_failure_is_swallowed() {
    let store = PersistedStore::new(MemoryBackend::with_quota(32));
    store.save("small", &1u8);
    store.save("large", &"x".repeat(100));

    assert!(store.backend().read("large").unwrap().is_none());
    assert_eq!(store.load::<u8>("small", 0), 1);

    let err = store.backend().write("large", &"x".repeat(100)).unwrap_err();
    assert!(matches!(err, StorageError::QuotaExceeded { .. }));
}

#[test]
fn test_remove_then_load_gives_default() {
    let store = PersistedStore::new(SqliteBackend::open_in_memory().unwrap());
    store.save(keys::STREAK_STATE, &StreakState { best_streak: 4, ..StreakState::new() });
    store.remove(keys::STREAK_STATE);
    store.remove(keys::STREAK_STATE);

    let streak: StreakState = store.load(keys::STREAK_STATE, StreakState::new());
    assert_eq!(streak.best_streak, 0);
    assert!(store.backend().keys().unwrap().is_empty());
}

proptest! {
    #[test]
    fn prop_save_then_load_round_trips(map in proptest::collection::btree_map("[a-z]{1,8}", 0u64..10_000, 0..20)) {
        let store = PersistedStore::new(SqliteBackend::open_in_memory().unwrap());
        store.save("map", &map);

        let loaded: BTreeMap<String, u64> = store.load("map", BTreeMap::new());
        prop_assert_eq!(loaded, map);
    }
}
