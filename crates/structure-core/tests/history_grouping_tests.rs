//! History grouping tests
//!
//! Covers the session-bucket grouping used by the workout history view.

use proptest::prelude::*;
use structure_core::history::{group_consecutive, group_sessions};
use structure_core::MovementUserData;

fn logged(id: i64, created: i64, set_index: u32) -> MovementUserData {
    let mut data = MovementUserData::new(3, "10", "40", set_index).stamped(created);
    data.id = id;
    data
}

#[test]
fn test_seven_rows_three_sessions() {
    // GIVEN seven rows with descending creation timestamps
    let created = [100, 100, 100, 90, 90, 80, 80];
    let rows: Vec<MovementUserData> = created
        .iter()
        .enumerate()
        .map(|(i, c)| logged(i as i64 + 1, *c, i as u32))
        .collect();

    // WHEN grouped into sessions
    let buckets = group_sessions(rows).unwrap();

    // THEN bucket sizes follow the timestamps, newest first
    let sizes: Vec<usize> = buckets.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![3, 2, 2]);
    let stamps: Vec<i64> = buckets.iter().map(|b| b.created).collect();
    assert_eq!(stamps, vec![100, 90, 80]);
}

#[test]
fn test_empty_history_has_no_buckets() {
    let buckets = group_sessions(Vec::new()).unwrap();
    assert!(buckets.is_empty());
}

#[test]
fn test_bucket_preserves_row_order() {
    let rows = vec![logged(7, 500, 0), logged(8, 500, 1), logged(9, 500, 2)];
    let buckets = group_sessions(rows).unwrap();
    let ids: Vec<i64> = buckets[0].entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![7, 8, 9]);
}

proptest! {
    #[test]
    fn prop_grouping_is_lossless(keys in proptest::collection::vec(0u8..4, 0..64)) {
        let groups = group_consecutive(keys.clone(), |k| *k);
        let flattened: Vec<u8> = groups.iter().flatten().copied().collect();
        prop_assert_eq!(flattened, keys);
    }

    #[test]
    fn prop_groups_are_uniform_and_adjacent_groups_differ(
        keys in proptest::collection::vec(0u8..4, 0..64)
    ) {
        let groups = group_consecutive(keys, |k| *k);
        for group in &groups {
            prop_assert!(!group.is_empty());
            prop_assert!(group.iter().all(|k| *k == group[0]));
        }
        for pair in groups.windows(2) {
            prop_assert_ne!(pair[0][0], pair[1][0]);
        }
    }
}
