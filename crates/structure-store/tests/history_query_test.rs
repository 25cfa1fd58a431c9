// Integration tests for the per-movement history query

use rusqlite::Connection;
use structure_core::history::group_sessions;
use structure_core::model::MovementUserData;
use structure_store::migrations::apply_migrations;
use structure_store::SqliteRepo;

fn setup_test_db() -> Connection {
    let mut conn = Connection::open_in_memory().expect("Failed to create in-memory database");
    apply_migrations(&mut conn).unwrap();
    conn
}

fn save_session(conn: &mut Connection, movement_id: i64, sets: u32, at_ms: i64) -> Vec<i64> {
    let rows: Vec<MovementUserData> = (0..sets)
        .map(|i| MovementUserData::new(movement_id, "8", format!("{}", 50 + i), i))
        .collect();
    SqliteRepo::insert_user_data_with_timestamp(conn, &rows, at_ms).unwrap()
}

#[test]
fn test_one_save_is_one_session() {
    let mut conn = setup_test_db();
    let ids = save_session(&mut conn, 7, 3, 1_700_000_000_000);
    assert_eq!(ids.len(), 3);

    let rows = SqliteRepo::movement_history(&conn, 7, 5).unwrap();
    assert!(rows.iter().all(|r| r.created == Some(1_700_000_000_000)));
    assert!(rows.iter().all(|r| r.updated == r.created));

    let buckets = group_sessions(rows).unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].len(), 3);
}

#[test]
fn test_session_window_newest_first() {
    // Given: three saves of movement 7 and one of movement 8
    let mut conn = setup_test_db();
    save_session(&mut conn, 7, 3, 100);
    save_session(&mut conn, 7, 2, 200);
    save_session(&mut conn, 8, 4, 250);
    save_session(&mut conn, 7, 2, 300);

    // When: the two most recent sessions of movement 7 are requested
    let rows = SqliteRepo::movement_history(&conn, 7, 2).unwrap();

    // Then: only those sessions come back, newest first, sets in order
    let stamps: Vec<Option<i64>> = rows.iter().map(|r| r.created).collect();
    assert_eq!(stamps, vec![Some(300), Some(300), Some(200), Some(200)]);
    let indexes: Vec<u32> = rows.iter().map(|r| r.set_index).collect();
    assert_eq!(indexes, vec![0, 1, 0, 1]);
    assert!(rows.iter().all(|r| r.movement_id == 7));
}

#[test]
fn test_other_movements_do_not_shrink_window() {
    let mut conn = setup_test_db();
    save_session(&mut conn, 7, 1, 100);
    save_session(&mut conn, 8, 1, 200);
    save_session(&mut conn, 8, 1, 300);

    let rows = SqliteRepo::movement_history(&conn, 7, 1).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].created, Some(100));
}

#[test]
fn test_unlogged_movement_has_no_history() {
    let conn = setup_test_db();
    let rows = SqliteRepo::movement_history(&conn, 42, 3).unwrap();
    assert!(rows.is_empty());
    assert!(group_sessions(rows).unwrap().is_empty());
}
