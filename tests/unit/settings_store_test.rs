use serde_json::{json, Value};
use tempfile::tempdir;

use tabdeck::services::settings_store::{
    JsonFileStore, MemoryStore, SettingsStore, KEY_PINNED_TABS,
};

#[test]
fn memory_store_returns_default_for_missing_keys() {
    let store = MemoryStore::new();
    assert_eq!(store.get("missing", json!([])), json!([]));
    assert_eq!(store.get("missing", Value::Null), Value::Null);
}

#[test]
fn memory_store_roundtrips_values() {
    let mut store = MemoryStore::new();
    store.set("theme", json!("dark")).unwrap();
    assert_eq!(store.get("theme", Value::Null), json!("dark"));

    store.set("theme", json!("light")).unwrap();
    assert_eq!(store.get("theme", Value::Null), json!("light"));
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shell.json");

    {
        let mut store = JsonFileStore::open(&path);
        store
            .set(KEY_PINNED_TABS, json!([{"id": "t1", "order": 0}]))
            .unwrap();
    }

    let store = JsonFileStore::open(&path);
    assert_eq!(
        store.get(KEY_PINNED_TABS, json!([])),
        json!([{"id": "t1", "order": 0}])
    );
}

#[test]
fn file_store_writes_immediately() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shell.json");
    let mut store = JsonFileStore::open(&path);

    store.set("a", json!(1)).unwrap();

    // The file is on disk before the store is dropped.
    let content = std::fs::read_to_string(&path).unwrap();
    let parsed: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["a"], json!(1));
}

#[test]
fn file_store_creates_missing_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("shell.json");
    let mut store = JsonFileStore::open(&path);

    store.set("a", json!(true)).unwrap();
    assert!(path.exists());
}

#[test]
fn missing_file_yields_empty_store() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("absent.json"));
    assert_eq!(store.get("anything", json!("fallback")), json!("fallback"));
}

#[test]
fn malformed_file_yields_empty_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shell.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = JsonFileStore::open(&path);
    assert_eq!(store.get("anything", Value::Null), Value::Null);
}

#[test]
fn no_temp_file_survives_a_write() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shell.json");
    let mut store = JsonFileStore::open(&path);

    store.set("a", json!(1)).unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());
}
