//! Database worker
//!
//! Owns the single SQLite connection and runs every store call on the
//! blocking pool. Successful writes bump per-table version counters that
//! live queries watch.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use structure_core::errors::{ExError, ExErrorKind};
use structure_store::{db, seed};
use tokio::sync::watch;

use crate::config::EngineConfig;

type Result<T> = std::result::Result<T, ExError>;

/// Tables whose changes live queries can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Routine,
    Workout,
    Movement,
    MovementUserData,
    MovementSkeleton,
}

impl Table {
    pub const ALL: [Table; 5] = [
        Table::Routine,
        Table::Workout,
        Table::Movement,
        Table::MovementUserData,
        Table::MovementSkeleton,
    ];

    fn index(self) -> usize {
        match self {
            Table::Routine => 0,
            Table::Workout => 1,
            Table::Movement => 2,
            Table::MovementUserData => 3,
            Table::MovementSkeleton => 4,
        }
    }
}

/// Write counters, one per table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableVersions([u64; 5]);

impl TableVersions {
    pub fn get(&self, table: Table) -> u64 {
        self.0[table.index()]
    }

    /// Counters of the given tables only
    pub fn project(&self, tables: &[Table]) -> Vec<u64> {
        tables.iter().map(|t| self.get(*t)).collect()
    }

    fn bump(&mut self, tables: &[Table]) {
        for table in tables {
            self.0[table.index()] += 1;
        }
    }
}

/// Shared handle to the store; cheap to clone
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    versions: Arc<watch::Sender<TableVersions>>,
}

impl Database {
    /// Open (migrate, seed) the store described by the configuration
    ///
    /// # Errors
    ///
    /// Any error from opening, migrating or seeding the store
    pub async fn open(config: &EngineConfig) -> Result<Self> {
        let config = config.clone();
        let conn = tokio::task::spawn_blocking(move || -> Result<Connection> {
            let mut conn = if config.in_memory {
                db::open_store_in_memory()?
            } else {
                db::open_store(&config.database_path)?
            };
            if let Some(path) = &config.catalog_path {
                seed::import_catalog_file(&mut conn, path)?;
            }
            Ok(conn)
        })
        .await
        .map_err(join_error)??;

        Ok(Self::from_connection(conn))
    }

    /// Wrap an already prepared connection
    pub fn from_connection(conn: Connection) -> Self {
        let (versions, _) = watch::channel(TableVersions::default());
        Self {
            conn: Arc::new(Mutex::new(conn)),
            versions: Arc::new(versions),
        }
    }

    /// Run a read on the blocking pool
    ///
    /// # Errors
    ///
    /// Whatever `f` returns, or `Concurrency`/`Internal` if the worker fails
    pub async fn read<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| poisoned())?;
            f(&guard)
        })
        .await
        .map_err(join_error)?
    }

    /// Run a write on the blocking pool and notify watchers of `tables`
    ///
    /// Counters move only when `f` succeeds.
    ///
    /// # Errors
    ///
    /// Whatever `f` returns, or `Concurrency`/`Internal` if the worker fails
    pub async fn write<T, F>(&self, tables: &'static [Table], f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        let value = tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| poisoned())?;
            f(&mut guard)
        })
        .await
        .map_err(join_error)??;

        self.versions.send_modify(|v| v.bump(tables));
        Ok(value)
    }

    pub fn versions(&self) -> TableVersions {
        *self.versions.borrow()
    }

    pub fn subscribe_versions(&self) -> watch::Receiver<TableVersions> {
        self.versions.subscribe()
    }
}

fn poisoned() -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op("database_lock")
        .with_message("A previous store call panicked while holding the connection")
}

fn join_error(err: tokio::task::JoinError) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op("spawn_blocking")
        .with_message(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use structure_store::SqliteRepo;

    #[tokio::test]
    async fn test_write_bumps_only_named_tables() {
        let db = Database::open(&EngineConfig::in_memory()).await.unwrap();
        let before = db.versions();

        db.write(&[Table::Routine], |conn| {
            SqliteRepo::insert_routine(conn, &structure_core::Routine::new("A", false))
        })
        .await
        .unwrap();

        let after = db.versions();
        assert_eq!(after.get(Table::Routine), before.get(Table::Routine) + 1);
        assert_eq!(after.get(Table::Workout), before.get(Table::Workout));
    }

    #[tokio::test]
    async fn test_failed_write_does_not_bump() {
        let db = Database::open(&EngineConfig::in_memory()).await.unwrap();
        let before = db.versions();

        let result: Result<()> = db
            .write(&[Table::Routine], |_| Err(ExError::new(ExErrorKind::Internal)))
            .await;

        assert!(result.is_err());
        assert_eq!(db.versions(), before);
    }

    #[tokio::test]
    async fn test_read_sees_seeded_catalog() {
        let db = Database::open(&EngineConfig::in_memory()).await.unwrap();
        let count = db
            .read(|conn| SqliteRepo::count_rows(conn, "movement_skeleton"))
            .await
            .unwrap();
        assert!(count > 0);
    }
}
