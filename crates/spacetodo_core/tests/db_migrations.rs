use rusqlite::Connection;
use spacetodo_core::db::migrations::latest_version;
use spacetodo_core::db::{open_db, open_db_in_memory, DbError};
use spacetodo_core::{KeyValueStore, SqliteKvStore};

#[test]
fn fresh_database_has_kv_schema() {
    let conn = open_db_in_memory().expect("in-memory db should open");

    assert_eq!(user_version(&conn), latest_version());
    assert_eq!(
        kv_columns(&conn),
        vec!["key".to_string(), "value".to_string(), "updated_at".to_string()]
    );
}

#[test]
fn reopening_keeps_entries_and_schema_version() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("spacetodo.sqlite3");

    let store = SqliteKvStore::new(open_db(&path).expect("first open"));
    store.set("useLocalStorage", "true").expect("write flag");
    drop(store);

    let conn = open_db(&path).expect("second open should not re-run migrations");
    assert_eq!(user_version(&conn), latest_version());
    let store = SqliteKvStore::new(conn);
    assert_eq!(
        store.get("useLocalStorage").expect("read flag").as_deref(),
        Some("true")
    );
}

#[test]
fn newer_schema_is_rejected_and_left_untouched() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("future.sqlite3");
    {
        let conn = Connection::open(&path).expect("raw open");
        conn.execute_batch("PRAGMA user_version = 999;")
            .expect("set future version");
    }

    let err = open_db(&path).expect_err("newer schema must not open");
    assert!(
        matches!(
            err,
            DbError::UnsupportedSchemaVersion {
                db_version: 999,
                latest_supported,
            } if latest_supported == latest_version()
        ),
        "unexpected error: {err}"
    );

    let conn = Connection::open(&path).expect("raw reopen");
    assert_eq!(user_version(&conn), 999);
}

#[test]
fn missing_parent_directory_reports_open_failure() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("missing").join("spacetodo.sqlite3");

    match open_db(&path) {
        Err(DbError::Open { mode, .. }) => assert_eq!(mode, "file"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("open should fail without a parent directory"),
    }
}

fn user_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .expect("user_version should be readable")
}

fn kv_columns(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info('kv_entries') ORDER BY cid;")
        .expect("table_info should prepare");
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .expect("table_info should run")
        .collect::<Result<Vec<_>, _>>()
        .expect("column names should decode");
    names
}
