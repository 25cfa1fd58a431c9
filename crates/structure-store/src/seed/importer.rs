//! Catalog importer
//!
//! Imports a validated catalog in one transaction and records its digest in
//! `catalog_seed`. A catalog whose digest is already recorded is skipped.

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::time::Instant;

use crate::errors::{from_rusqlite, Result};
use crate::repo::SqliteRepo;
use crate::seed::digest::compute_catalog_digest;
use crate::seed::format::CatalogSeed;
use crate::seed::parser::{parse_catalog_file, parse_catalog_str};
use crate::seed::BUNDLED_CATALOG;
use rusqlite::Connection;
use structure_core::model::MovementSkeleton;
use structure_core::{log_op_end, log_op_error, log_op_start};

/// Result of an import attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub digest: String,

    /// Skeletons written by this call (0 when skipped)
    pub imported: usize,

    /// True if this digest had already been applied
    pub skipped: bool,
}

/// Import the catalog bundled with this crate
pub fn seed_bundled_catalog(conn: &mut Connection) -> Result<ImportOutcome> {
    let seed = parse_catalog_str(BUNDLED_CATALOG)?;
    import_catalog(conn, &seed)
}

/// Parse, validate and import a catalog file
pub fn import_catalog_file(conn: &mut Connection, path: &Path) -> Result<ImportOutcome> {
    let seed = parse_catalog_file(path)?;
    import_catalog(conn, &seed)
}

/// Import an already parsed catalog
///
/// Skeletons are upserted by name, so importing a revised catalog updates
/// muscle groups in place.
pub fn import_catalog(conn: &mut Connection, seed: &CatalogSeed) -> Result<ImportOutcome> {
    let start = Instant::now();
    log_op_start!("import_catalog", skeleton_count = seed.skeletons.len());

    let result = import_inner(conn, seed);

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(outcome) => log_op_end!(
            "import_catalog",
            duration_ms = duration_ms,
            digest = outcome.digest.as_str(),
            imported = outcome.imported,
            skipped = outcome.skipped
        ),
        Err(err) => log_op_error!("import_catalog", err, duration_ms = duration_ms),
    }
    result
}

fn import_inner(conn: &mut Connection, seed: &CatalogSeed) -> Result<ImportOutcome> {
    let digest = compute_catalog_digest(seed)?;

    let already_applied: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM catalog_seed WHERE digest = ?1",
            [&digest],
            |row| row.get::<_, i64>(0).map(|n| n > 0),
        )
        .map_err(from_rusqlite)?;

    if already_applied {
        return Ok(ImportOutcome {
            digest,
            imported: 0,
            skipped: true,
        });
    }

    let tx = conn.transaction().map_err(from_rusqlite)?;

    for seed_skeleton in &seed.skeletons {
        SqliteRepo::upsert_movement_skeleton(&tx, &MovementSkeleton::from(seed_skeleton))?;
    }

    tx.execute(
        "INSERT INTO catalog_seed (digest, applied_at, skeleton_count) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            digest,
            chrono::Utc::now().timestamp_millis(),
            seed.skeletons.len() as i64
        ],
    )
    .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;

    Ok(ImportOutcome {
        digest,
        imported: seed.skeletons.len(),
        skipped: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;

    fn setup_test_db() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_bundled_catalog_parses() {
        let seed = parse_catalog_str(BUNDLED_CATALOG).unwrap();
        assert!(!seed.skeletons.is_empty());
    }

    #[test]
    fn test_second_import_is_skipped() {
        let mut conn = setup_test_db();

        let first = seed_bundled_catalog(&mut conn).unwrap();
        assert!(!first.skipped);
        assert!(first.imported > 0);

        let second = seed_bundled_catalog(&mut conn).unwrap();
        assert!(second.skipped);
        assert_eq!(second.imported, 0);
        assert_eq!(first.digest, second.digest);

        let seeds: i64 = conn
            .query_row("SELECT COUNT(*) FROM catalog_seed", [], |row| row.get(0))
            .unwrap();
        assert_eq!(seeds, 1);
    }
}
