use serde::{Deserialize, Serialize};
use serde_json::json;
use taskboard_core::db::{open_db, open_db_in_memory};
use taskboard_core::{JsonStore, MemoryStore, SqliteStore, StoreBackend};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Preferences {
    theme: String,
    collapsed: Vec<String>,
}

#[test]
fn set_then_get_returns_structurally_equal_value() {
    let conn = open_db_in_memory().unwrap();
    let store = JsonStore::new(SqliteStore::try_new(&conn).unwrap());
    let value = json!({
        "name": "Roadmap",
        "columns": [{"id": "col_1", "tasks": []}],
        "archived": false,
        "size": 42
    });

    assert!(store.set("roadmap", &value));
    assert_eq!(store.get("roadmap", serde_json::Value::Null), value);
    assert!(store.has("roadmap"));
}

#[test]
fn typed_values_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");
    let prefs = Preferences {
        theme: "dark".to_string(),
        collapsed: vec!["col_a".to_string()],
    };

    {
        let conn = open_db(&path).unwrap();
        let store = JsonStore::new(SqliteStore::try_new(&conn).unwrap());
        assert!(store.set("prefs", &prefs));
    }

    let conn = open_db(&path).unwrap();
    let store = JsonStore::new(SqliteStore::try_new(&conn).unwrap());
    let fallback = Preferences {
        theme: "light".to_string(),
        collapsed: Vec::new(),
    };
    assert_eq!(store.get("prefs", fallback), prefs);
}

#[test]
fn last_write_wins_for_one_key() {
    let conn = open_db_in_memory().unwrap();
    let store = JsonStore::new(SqliteStore::try_new(&conn).unwrap());

    assert!(store.set("counter", &1_u32));
    assert!(store.set("counter", &2_u32));

    assert_eq!(store.get("counter", 0_u32), 2);
    assert_eq!(store.keys(), vec!["counter".to_string()]);
}

#[test]
fn corrupt_sqlite_entry_reads_as_default() {
    let conn = open_db_in_memory().unwrap();
    let store = JsonStore::new(SqliteStore::try_new(&conn).unwrap());
    store.backend().write("broken", "{not json").unwrap();

    let value: Vec<String> = store.get("broken", Vec::new());
    assert!(value.is_empty());
    assert!(store.has("broken"));
}

#[test]
fn remove_is_idempotent_and_keys_are_sorted() {
    let store = JsonStore::new(MemoryStore::new());
    assert!(store.set("b", &true));
    assert!(store.set("a", &true));
    assert_eq!(store.keys(), vec!["a".to_string(), "b".to_string()]);

    assert!(store.remove("a"));
    assert!(store.remove("a"));
    assert!(!store.has("a"));
    assert!(!store.get("a", false));
    assert_eq!(store.keys(), vec!["b".to_string()]);
}

#[test]
fn quota_rejection_keeps_previous_value() {
    let store = JsonStore::new(MemoryStore::with_quota(32));
    assert!(store.set("note", &"short"));

    let oversized = "x".repeat(64);
    assert!(!store.set("note", &oversized));
    assert_eq!(store.get("note", String::new()), "short");
}
