//! Migration runner
//!
//! Applies migrations with checksums and idempotency. The schema version is
//! kept in `PRAGMA user_version`; when an existing database reports another
//! version, or a recorded migration no longer matches the embedded SQL, every
//! table is dropped and the schema is rebuilt from scratch.

#![allow(clippy::result_large_err)]

use std::collections::HashMap;
use std::time::Instant;

use crate::errors::{checksum_mismatch, from_rusqlite, migration_error, version_mismatch, Result};
use crate::migrations::embedded::{Migration, MIGRATIONS};
use rusqlite::Connection;
use structure_core::errors::ExError;
use structure_core::{log_op_end, log_op_error, log_op_start};

/// Schema version written to `PRAGMA user_version` once all migrations ran
pub const SCHEMA_VERSION: i64 = 1;

/// What `apply_migrations` did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Ids of migrations applied by this call, in order
    pub applied: Vec<String>,

    /// True if existing tables were dropped before migrating
    pub rebuilt: bool,
}

/// Apply all pending migrations to the database
pub fn apply_migrations(conn: &mut Connection) -> Result<MigrationReport> {
    let start = Instant::now();
    log_op_start!("apply_migrations");

    let result = run(conn);

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(report) => log_op_end!(
            "apply_migrations",
            duration_ms = duration_ms,
            applied = report.applied.len(),
            rebuilt = report.rebuilt
        ),
        Err(err) => log_op_error!("apply_migrations", err, duration_ms = duration_ms),
    }
    result
}

fn run(conn: &mut Connection) -> Result<MigrationReport> {
    let mut report = MigrationReport::default();

    if let Some(reason) = untrusted_schema(conn, MIGRATIONS)? {
        tracing::warn!(
            op = "apply_migrations",
            err_code = reason.code(),
            reason = %reason,
            "dropping all tables and rebuilding schema"
        );
        drop_all_tables(conn)?;
        report.rebuilt = true;
    }

    create_schema_version_table(conn)?;

    for migration in MIGRATIONS {
        if apply_migration(conn, migration)? {
            report.applied.push(migration.id.to_string());
        }
    }

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)
        .map_err(from_rusqlite)?;

    Ok(report)
}

/// Why the existing schema cannot be migrated in place, if it cannot
fn untrusted_schema(conn: &Connection, migrations: &[Migration]) -> Result<Option<ExError>> {
    let version: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(from_rusqlite)?;

    if version != 0 && version != SCHEMA_VERSION {
        return Ok(Some(version_mismatch(version, SCHEMA_VERSION)));
    }

    let recorded = recorded_checksums(conn)?;
    let embedded: HashMap<&str, String> = migrations
        .iter()
        .map(|m| (m.id, m.checksum()))
        .collect();

    for (migration_id, checksum) in &recorded {
        match embedded.get(migration_id.as_str()) {
            Some(expected) if Some(expected) == checksum.as_ref() => {}
            Some(expected) => {
                let actual = checksum.as_deref().unwrap_or("<none>");
                return Ok(Some(checksum_mismatch(migration_id, expected, actual)));
            }
            None => {
                return Ok(Some(migration_error(
                    migration_id,
                    "recorded in schema_version but unknown to this build",
                )));
            }
        }
    }

    Ok(None)
}

/// Checksums recorded by earlier runs; empty when the table does not exist
fn recorded_checksums(conn: &Connection) -> Result<Vec<(String, Option<String>)>> {
    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
            [],
            |row| row.get::<_, i64>(0).map(|n| n > 0),
        )
        .map_err(from_rusqlite)?;
    if !exists {
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare("SELECT migration_id, checksum FROM schema_version ORDER BY id")
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

fn drop_all_tables(conn: &mut Connection) -> Result<()> {
    let tables: Vec<String> = {
        let mut stmt = conn
            .prepare(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
            )
            .map_err(from_rusqlite)?;
        let names = stmt
            .query_map([], |row| row.get(0))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        names
    };

    // Foreign keys cannot be toggled inside a transaction
    conn.pragma_update(None, "foreign_keys", false)
        .map_err(from_rusqlite)?;

    let tx = conn.transaction().map_err(from_rusqlite)?;
    for table in &tables {
        tx.execute_batch(&format!("DROP TABLE IF EXISTS \"{}\"", table.replace('"', "\"\"")))
            .map_err(from_rusqlite)?;
    }
    tx.pragma_update(None, "user_version", 0i64)
        .map_err(from_rusqlite)?;
    tx.commit().map_err(from_rusqlite)?;

    conn.pragma_update(None, "foreign_keys", true)
        .map_err(from_rusqlite)?;

    Ok(())
}

/// Create the schema_version table if it doesn't exist
fn create_schema_version_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY,
            migration_id TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL,
            checksum TEXT
        )",
        [],
    )
    .map_err(from_rusqlite)?;

    Ok(())
}

/// Apply a single migration if not already applied
///
/// Returns true if the migration ran.
fn apply_migration(conn: &mut Connection, migration: &Migration) -> Result<bool> {
    let Migration { id: migration_id, sql } = *migration;
    let already_applied: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM schema_version WHERE migration_id = ?",
            [migration_id],
            |row| row.get::<_, i64>(0).map(|n| n > 0),
        )
        .map_err(from_rusqlite)?;

    if already_applied {
        return Ok(false);
    }

    let checksum = migration.checksum();

    let tx = conn.transaction().map_err(from_rusqlite)?;

    tx.execute_batch(sql)
        .map_err(|e| migration_error(migration_id, &e.to_string()))?;

    let now = chrono::Utc::now().timestamp();
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?, ?, ?)",
        rusqlite::params![migration_id, now, checksum],
    )
    .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(op = "apply_migrations", migration_id, "migration applied");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_migrations() {
        let mut conn = Connection::open_in_memory().unwrap();
        let report = apply_migrations(&mut conn).unwrap();
        assert_eq!(report.applied, vec!["001_initial_schema".to_string()]);
        assert!(!report.rebuilt);
    }

    #[test]
    fn test_idempotency() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        let report = apply_migrations(&mut conn).unwrap();
        assert!(report.applied.is_empty());
        assert!(!report.rebuilt);
    }

    #[test]
    fn test_user_version_is_set() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }
}
