use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// MovementUserData - one logged set (reps/weight) of one movement
///
/// Rows are append-only. `id == 0` marks a row that has not been persisted
/// yet; `created`/`updated` are epoch milliseconds assigned on save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementUserData {
    pub id: i64,
    pub movement_id: i64,

    /// Free-form, as typed by the user
    pub reps: String,
    pub weight: String,

    /// Zero-based set number within the movement
    pub set_index: u32,

    pub created: Option<i64>,
    pub updated: Option<i64>,
}

impl MovementUserData {
    /// Unsaved entry for one set of a movement
    pub fn new(
        movement_id: i64,
        reps: impl Into<String>,
        weight: impl Into<String>,
        set_index: u32,
    ) -> Self {
        Self {
            id: 0,
            movement_id,
            reps: reps.into(),
            weight: weight.into(),
            set_index,
            created: None,
            updated: None,
        }
    }

    /// Empty entry for a set the user has not filled in yet
    pub fn blank(movement_id: i64, set_index: u32) -> Self {
        Self::new(movement_id, "", "", set_index)
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Stamp both timestamps with the same instant
    pub fn stamped(mut self, now_ms: i64) -> Self {
        self.created = Some(now_ms);
        self.updated = Some(now_ms);
        self
    }

    /// Calendar date of `created` as `YYYY-MM-DD` (UTC)
    pub fn date_label(&self) -> Option<String> {
        self.created.and_then(format_session_date)
    }
}

/// Render epoch milliseconds as a `YYYY-MM-DD` calendar date (UTC)
pub fn format_session_date(epoch_ms: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms).map(|dt| dt.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_unsaved() {
        let data = MovementUserData::blank(7, 2);
        assert_eq!(data.movement_id, 7);
        assert_eq!(data.set_index, 2);
        assert!(data.reps.is_empty());
        assert!(!data.is_persisted());
        assert!(data.date_label().is_none());
    }

    #[test]
    fn test_stamped_sets_both_timestamps() {
        let data = MovementUserData::new(1, "8", "60", 0).stamped(1_700_000_000_000);
        assert_eq!(data.created, Some(1_700_000_000_000));
        assert_eq!(data.updated, data.created);
    }

    #[test]
    fn test_date_label() {
        // 2023-11-14T22:13:20Z
        let data = MovementUserData::blank(1, 0).stamped(1_700_000_000_000);
        assert_eq!(data.date_label().as_deref(), Some("2023-11-14"));
        assert_eq!(format_session_date(0).as_deref(), Some("1970-01-01"));
    }
}
