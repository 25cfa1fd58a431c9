//! Catalog parser with validation
//!
//! Parses YAML and validates schema version, name uniqueness and required
//! fields

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, seed_validation, Result};
use crate::seed::format::CatalogSeed;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Catalog format version this build understands
pub const CATALOG_SCHEMA_VERSION: u32 = 1;

/// Parse a catalog file from a path
pub fn parse_catalog_file(path: &Path) -> Result<CatalogSeed> {
    let content = fs::read_to_string(path).map_err(|e| io_error("read_catalog", e))?;
    parse_catalog_str(&content)
}

/// Parse a catalog from a string
pub fn parse_catalog_str(content: &str) -> Result<CatalogSeed> {
    let seed: CatalogSeed = serde_yaml::from_str(content)
        .map_err(|e| seed_validation(&format!("YAML parse error: {}", e)))?;

    validate_catalog(&seed)?;

    Ok(seed)
}

fn validate_catalog(seed: &CatalogSeed) -> Result<()> {
    if seed.schema_version != CATALOG_SCHEMA_VERSION {
        return Err(seed_validation(&format!(
            "Unsupported schema_version: {}. Expected {}",
            seed.schema_version, CATALOG_SCHEMA_VERSION
        )));
    }

    let mut names = HashSet::new();
    for (i, skeleton) in seed.skeletons.iter().enumerate() {
        let name = skeleton.name.trim();
        if name.is_empty() {
            return Err(seed_validation(&format!("Skeleton #{} has a blank name", i)));
        }
        if skeleton.muscle_group.trim().is_empty() {
            return Err(seed_validation(&format!(
                "Skeleton {} has a blank muscle_group",
                name
            )));
        }
        if !names.insert(name) {
            return Err(seed_validation(&format!("Duplicate skeleton name: {}", name)));
        }
    }

    Ok(())
}
