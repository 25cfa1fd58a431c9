//! Repository layer for persisting domain models to SQLite
//!
//! `SqliteRepo` holds the row-level operations; `graph` adds the
//! multi-table transactions (draft materialization, cascading delete) and
//! `hydration` assembles nested routine trees for reads.

pub mod graph;
pub mod hydration;
pub mod sqlite_repo;

pub use graph::{CascadeReport, MaterializedRoutine};
pub use sqlite_repo::SqliteRepo;
