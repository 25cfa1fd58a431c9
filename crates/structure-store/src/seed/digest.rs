//! Catalog digest canonicalization
//!
//! Computes stable SHA256 digests of catalogs so that an unchanged catalog
//! is imported only once

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use crate::seed::format::CatalogSeed;
use serde::Serialize;
use sha2::{Digest, Sha256};
use structure_core::errors::{ExError, ExErrorKind};
use structure_core::model::MovementSkeleton;

/// Canonical representation of a catalog for digest calculation
#[derive(Debug, Clone, Serialize)]
struct CanonicalCatalog {
    schema_version: u32,
    skeletons: Vec<CanonicalSkeleton>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord)]
struct CanonicalSkeleton {
    name: String,
    muscle_group: String,
    secondary_muscle_group: Option<String>,
    quaternary_muscle_group: Option<String>,
}

/// Compute a stable digest for a catalog
///
/// Entry order and YAML formatting do not affect the result.
pub fn compute_catalog_digest(seed: &CatalogSeed) -> Result<String> {
    let mut skeletons: Vec<CanonicalSkeleton> = seed
        .skeletons
        .iter()
        .map(|s| {
            let s = MovementSkeleton::from(s);
            CanonicalSkeleton {
                name: s.name,
                muscle_group: s.muscle_group,
                secondary_muscle_group: s.secondary_muscle_group,
                quaternary_muscle_group: s.quaternary_muscle_group,
            }
        })
        .collect();
    skeletons.sort();

    let canonical = CanonicalCatalog {
        schema_version: seed.schema_version,
        skeletons,
    };

    let json = serde_json::to_string(&canonical).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("compute_catalog_digest")
            .with_message(e.to_string())
    })?;

    Ok(hex::encode(Sha256::digest(json.as_bytes())))
}
