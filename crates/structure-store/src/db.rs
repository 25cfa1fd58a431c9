//! Database connection management
//!
//! Opening a store always yields a connection that is configured, migrated
//! and seeded with the bundled movement catalog.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::migrations::apply_migrations;
use crate::seed::seed_bundled_catalog;
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Configure a connection with the settings every store connection uses
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(from_rusqlite)?;

    // journal_mode reports the resulting mode as a row, so it cannot go
    // through execute(). In-memory databases answer "memory" and stay there.
    let _mode: String = conn
        .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
        .map_err(from_rusqlite)?;

    Ok(())
}

/// Open, configure, migrate and seed a file-backed store
pub fn open_store<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let mut conn = open(path)?;
    prepare(&mut conn)?;
    Ok(conn)
}

/// Open, configure, migrate and seed an in-memory store
pub fn open_store_in_memory() -> Result<Connection> {
    let mut conn = open_in_memory()?;
    prepare(&mut conn)?;
    Ok(conn)
}

fn prepare(conn: &mut Connection) -> Result<()> {
    configure(conn)?;
    apply_migrations(conn)?;
    seed_bundled_catalog(conn)?;
    Ok(())
}
