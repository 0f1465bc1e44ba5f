use cinema_core::db::migrations::latest_version;
use cinema_core::db::{open_db, open_db_in_memory, open_db_with_config, DbError};
use cinema_core::PersistenceConfig;
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in [
        "id_sequences",
        "theaters",
        "lines",
        "seats",
        "film_types",
        "films",
        "seances",
        "seat_seance_status",
        "user_roles",
        "users",
    ] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn reference_data_is_seeded_and_sequences_advanced() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(count_rows(&conn, "user_roles"), 3);
    assert_eq!(count_rows(&conn, "film_types"), 3);
    let role_seq: i64 = conn
        .query_row(
            "SELECT value FROM id_sequences WHERE name = 'user_role_id_seq';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(role_seq, 3);
}

#[test]
fn connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);

    let orphan = conn.execute(
        "INSERT INTO lines (line_id, theater_id, line_number) VALUES (1, 42, 1);",
        [],
    );
    assert!(orphan.is_err());
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cinema.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let config = PersistenceConfig {
        busy_timeout_ms: 250,
        ..PersistenceConfig::default()
    };
    let conn_second = open_db_with_config(&path, &config).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_eq!(count_rows(&conn_second, "user_roles"), 3);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reopening_database_with_wiped_roles_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wiped.db");

    let conn = open_db(&path).unwrap();
    conn.execute_batch("DELETE FROM user_roles;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::MissingReferenceData { table } => assert_eq!(table, "user_roles"),
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
