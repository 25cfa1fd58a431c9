//! Catalog search for the workout builder

use crate::model::MovementSkeleton;

/// Filter skeletons whose name contains `term`, ignoring case
///
/// An empty (or whitespace-only) term returns the whole catalog. Order is
/// preserved.
pub fn filter_skeletons<'a>(
    skeletons: &'a [MovementSkeleton],
    term: &str,
) -> Vec<&'a MovementSkeleton> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return skeletons.iter().collect();
    }
    skeletons
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<MovementSkeleton> {
        vec![
            MovementSkeleton::new("Bench Press", "Chest"),
            MovementSkeleton::new("Incline Bench Press", "Chest"),
            MovementSkeleton::new("Deadlift", "Back"),
        ]
    }

    #[test]
    fn test_empty_term_returns_all() {
        let catalog = catalog();
        assert_eq!(filter_skeletons(&catalog, "").len(), 3);
        assert_eq!(filter_skeletons(&catalog, "  ").len(), 3);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let catalog = catalog();
        let names: Vec<&str> = filter_skeletons(&catalog, "BENCH")
            .into_iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Bench Press", "Incline Bench Press"]);
    }

    #[test]
    fn test_no_match() {
        assert!(filter_skeletons(&catalog(), "squat").is_empty());
    }
}
