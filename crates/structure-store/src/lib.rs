//! Structure Store - SQLite persistence for routines, workouts and set logs
//!
//! Provides:
//! - Connection management and pragmas
//! - Embedded schema migrations with checksums and a destructive rebuild on
//!   version mismatch
//! - Bundled movement catalog seed (YAML) with digest-based provenance
//! - `SqliteRepo`, the typed data-access layer, including draft
//!   materialization and the cascading routine delete
//!
//! Every call is blocking; `structure-engine` moves them off the async runtime.

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod seed;

// Re-export key types
pub use errors::Result;
pub use repo::{CascadeReport, MaterializedRoutine, SqliteRepo};
