// Integration tests for the migration framework
// Covers idempotency and the destructive rebuild paths

use rusqlite::Connection;
use structure_store::migrations::{apply_migrations, SCHEMA_VERSION};

fn setup_test_db() -> Connection {
    Connection::open_in_memory().expect("Failed to create in-memory database")
}

fn get_table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    // Given: An empty SQLite database
    let mut conn = setup_test_db();

    // When: Migrations are applied
    let report = apply_migrations(&mut conn).unwrap();

    // Then: every table exists
    assert!(!report.rebuilt);
    let tables = get_table_names(&conn);
    for expected in [
        "catalog_seed",
        "movement",
        "movement_skeleton",
        "movement_user_data",
        "routine",
        "schema_version",
        "workout",
    ] {
        assert!(
            tables.contains(&expected.to_string()),
            "Missing table: {}",
            expected
        );
    }
}

#[test]
fn test_migrations_idempotent_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("structure.db");

    {
        let mut conn = Connection::open(&path).unwrap();
        apply_migrations(&mut conn).unwrap();
        conn.execute("INSERT INTO routine (name, is_current) VALUES ('Kept', 0)", [])
            .unwrap();
    }

    let mut conn = Connection::open(&path).unwrap();
    let report = apply_migrations(&mut conn).unwrap();

    assert!(report.applied.is_empty());
    assert!(!report.rebuilt);
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM routine", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_version_mismatch_rebuilds() {
    // Given: a database written by an unknown schema version
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("structure.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE legacy_routines (title TEXT);
             INSERT INTO legacy_routines VALUES ('Old');
             PRAGMA user_version = 7;",
        )
        .unwrap();
    }

    // When: migrations run
    let mut conn = Connection::open(&path).unwrap();
    let report = apply_migrations(&mut conn).unwrap();

    // Then: old tables are gone and the schema is current
    assert!(report.rebuilt);
    assert_eq!(report.applied, vec!["001_initial_schema".to_string()]);
    let tables = get_table_names(&conn);
    assert!(!tables.contains(&"legacy_routines".to_string()));
    let version: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);
}

#[test]
fn test_checksum_mismatch_rebuilds() {
    let mut conn = setup_test_db();
    apply_migrations(&mut conn).unwrap();
    conn.execute("INSERT INTO routine (name, is_current) VALUES ('Lost', 0)", [])
        .unwrap();
    conn.execute(
        "UPDATE schema_version SET checksum = 'edited' WHERE migration_id = '001_initial_schema'",
        [],
    )
    .unwrap();

    let report = apply_migrations(&mut conn).unwrap();

    assert!(report.rebuilt);
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM routine", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_unknown_recorded_migration_rebuilds() {
    let mut conn = setup_test_db();
    apply_migrations(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES ('999_future', 0, 'x')",
        [],
    )
    .unwrap();

    let report = apply_migrations(&mut conn).unwrap();
    assert!(report.rebuilt);
}
