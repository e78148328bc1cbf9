use fx_status_checker::store::{SqliteStore, StateStore, VERSION_INFO_KEY};
use tempfile::TempDir;

#[test]
fn put_persists_across_connections() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let store = SqliteStore::new(&db_path).unwrap();
    store.put(VERSION_INFO_KEY, r#"{"vanilla":null}"#).unwrap();
    drop(store);

    let reopened = SqliteStore::new(&db_path).unwrap();
    assert_eq!(
        reopened.get(VERSION_INFO_KEY).unwrap(),
        Some(r#"{"vanilla":null}"#.to_string())
    );
}

#[test]
fn new_fails_when_parent_directory_is_missing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("missing").join("test.db");

    assert!(SqliteStore::new(&db_path).is_err());
}
