//! Migration framework
//!
//! Provides:
//! - Migration runner with checksums and version tracking
//! - Idempotent application
//! - Destructive rebuild when the on-disk schema cannot be trusted
//! - Embedded SQL migrations

mod embedded;
mod runner;

pub use runner::{apply_migrations, MigrationReport, SCHEMA_VERSION};
