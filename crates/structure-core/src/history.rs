//! Per-movement history grouping
//!
//! The store returns a movement's user-data rows newest first. Rows sharing a
//! `created` timestamp were written by one save, i.e. one workout session, so
//! grouping consecutive equal timestamps yields one bucket per session.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, StructureError};
use crate::model::movement_user_data::format_session_date;
use crate::model::MovementUserData;

/// Group consecutive items with equal keys, in input order
///
/// Single pass, stable, no sorting: the caller is responsible for ordering.
/// An empty input yields no groups.
pub fn group_consecutive<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<Vec<T>>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut groups: Vec<Vec<T>> = Vec::new();
    let mut prev: Option<K> = None;

    for item in items {
        let k = key(&item);
        match groups.last_mut() {
            Some(current) if prev.as_ref() == Some(&k) => current.push(item),
            _ => groups.push(vec![item]),
        }
        prev = Some(k);
    }

    groups
}

/// One historical workout session of a movement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionBucket {
    /// Shared creation timestamp (epoch ms)
    pub created: i64,

    /// `created` rendered as `YYYY-MM-DD`
    pub date_label: String,

    pub entries: Vec<MovementUserData>,
}

impl SessionBucket {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group newest-first user-data rows into session buckets
///
/// # Errors
///
/// `MissingTimestamp` if any row was never saved (no `created`)
pub fn group_sessions(rows: Vec<MovementUserData>) -> Result<Vec<SessionBucket>> {
    if let Some(row) = rows.iter().find(|r| r.created.is_none()) {
        return Err(StructureError::MissingTimestamp { id: row.id });
    }

    let buckets = group_consecutive(rows, |r| r.created)
        .into_iter()
        .filter_map(|entries| {
            let created = entries.first()?.created?;
            Some(SessionBucket {
                created,
                date_label: format_session_date(created).unwrap_or_default(),
                entries,
            })
        })
        .collect();

    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, created: i64, set_index: u32) -> MovementUserData {
        let mut data = MovementUserData::new(1, "8", "50", set_index).stamped(created);
        data.id = id;
        data
    }

    #[test]
    fn test_group_consecutive_sizes() {
        let groups = group_consecutive(vec![100, 100, 100, 90, 90, 80, 80], |x| *x);
        let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 2, 2]);
    }

    #[test]
    fn test_group_consecutive_empty() {
        let groups = group_consecutive(Vec::<i64>::new(), |x| *x);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_non_adjacent_equal_keys_stay_separate() {
        let groups = group_consecutive(vec![1, 2, 1], |x| *x);
        assert_eq!(groups, vec![vec![1], vec![2], vec![1]]);
    }

    #[test]
    fn test_group_sessions_labels() {
        let rows = vec![
            row(4, 1_700_086_400_000, 0),
            row(5, 1_700_086_400_000, 1),
            row(1, 1_700_000_000_000, 0),
        ];
        let buckets = group_sessions(rows).unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].date_label, "2023-11-15");
        assert_eq!(buckets[0].len(), 2);
        assert_eq!(buckets[1].date_label, "2023-11-14");
    }

    #[test]
    fn test_group_sessions_rejects_unsaved_rows() {
        let rows = vec![row(1, 100, 0), MovementUserData::blank(1, 1)];
        assert_eq!(
            group_sessions(rows),
            Err(StructureError::MissingTimestamp { id: 0 })
        );
    }
}
