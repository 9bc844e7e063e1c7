use taskboard_core::db::migrations::latest_version;
use taskboard_core::db::{open_db, open_db_in_memory, DbError};

#[test]
fn fresh_database_lands_on_the_latest_version() {
    let conn = open_db_in_memory().unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn all_three_collections_exist_after_bootstrap() {
    let conn = open_db_in_memory().unwrap();
    for table in ["persons", "items", "assignments"] {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 0, "{table} starts empty");
    }
}

#[test]
fn reopening_a_file_database_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        conn.execute(
            "INSERT INTO persons (id, name, email, password) VALUES ('f001', 'Ana', 'a@x.com', 'pw');",
            [],
        )
        .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM persons;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1, "second open must not re-run migrations");
}

#[test]
fn newer_schema_versions_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
            .unwrap();
    }

    match open_db(&path) {
        Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, latest_version() + 1);
            assert_eq!(latest_supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected unsupported schema version error"),
    }
}
