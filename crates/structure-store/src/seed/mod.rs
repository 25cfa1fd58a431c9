//! Movement catalog seed
//!
//! Provides:
//! - Catalog seed format (schema version 1)
//! - YAML parser with validation
//! - Digest canonicalization
//! - Importer with digest-based provenance

pub mod digest;
pub mod format;
pub mod importer;
pub mod parser;

pub use digest::compute_catalog_digest;
pub use format::{CatalogSeed, SeedSkeleton};
pub use importer::{import_catalog, import_catalog_file, seed_bundled_catalog, ImportOutcome};
pub use parser::{parse_catalog_file, parse_catalog_str};

/// Catalog shipped with the crate
pub const BUNDLED_CATALOG: &str = include_str!("../../seed/movement_skeletons.yaml");
