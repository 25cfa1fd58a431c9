//! Catalog seed format
//!
//! ```yaml
//! schema_version: 1
//! skeletons:
//!   - name: Bench Press
//!     muscle_group: Chest
//!     secondary_muscle_group: Triceps
//! ```

use serde::{Deserialize, Serialize};
use structure_core::model::MovementSkeleton;

/// Root of a catalog seed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSeed {
    pub schema_version: u32,

    #[serde(default)]
    pub skeletons: Vec<SeedSkeleton>,
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSkeleton {
    pub name: String,
    pub muscle_group: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_muscle_group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quaternary_muscle_group: Option<String>,
}

impl From<&SeedSkeleton> for MovementSkeleton {
    fn from(seed: &SeedSkeleton) -> Self {
        MovementSkeleton {
            name: seed.name.trim().to_string(),
            muscle_group: seed.muscle_group.trim().to_string(),
            secondary_muscle_group: non_blank(&seed.secondary_muscle_group),
            quaternary_muscle_group: non_blank(&seed.quaternary_muscle_group),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
