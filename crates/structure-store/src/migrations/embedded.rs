//! Migrations compiled into the binary, oldest first

use sha2::{Digest, Sha256};

/// One forward-only schema step
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

impl Migration {
    /// Hex SHA-256 of the SQL text, recorded in `schema_version`
    ///
    /// An edited migration no longer matches what older databases recorded.
    pub fn checksum(&self) -> String {
        hex::encode(Sha256::digest(self.sql.as_bytes()))
    }
}

pub const MIGRATIONS: &[Migration] = &[Migration {
    id: "001_initial_schema",
    sql: include_str!("../../migrations/001_initial_schema.sql"),
}];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_tracks_sql() {
        let a = Migration {
            id: "a",
            sql: "SELECT 1",
        };
        let b = Migration { sql: "SELECT 2", ..a };

        assert_eq!(a.checksum().len(), 64);
        assert_eq!(a.checksum(), a.checksum());
        assert_ne!(a.checksum(), b.checksum());
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let ids: Vec<&str> = MIGRATIONS.iter().map(|m| m.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }
}
