use serde::{Deserialize, Serialize};

/// MovementSkeleton - read-only catalog template for a movement
///
/// Seeded from the bundled catalog snapshot; keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovementSkeleton {
    pub name: String,

    /// Primary muscle group; copied onto movements built from this skeleton
    pub muscle_group: String,

    #[serde(default)]
    pub secondary_muscle_group: Option<String>,

    #[serde(default)]
    pub quaternary_muscle_group: Option<String>,
}

impl MovementSkeleton {
    pub fn new(name: impl Into<String>, muscle_group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            muscle_group: muscle_group.into(),
            secondary_muscle_group: None,
            quaternary_muscle_group: None,
        }
    }

    pub fn with_secondary(mut self, muscle_group: impl Into<String>) -> Self {
        self.secondary_muscle_group = Some(muscle_group.into());
        self
    }

    pub fn with_quaternary(mut self, muscle_group: impl Into<String>) -> Self {
        self.quaternary_muscle_group = Some(muscle_group.into());
        self
    }

    /// All muscle groups this skeleton declares, primary first
    pub fn muscle_groups(&self) -> Vec<&str> {
        std::iter::once(self.muscle_group.as_str())
            .chain(self.secondary_muscle_group.as_deref())
            .chain(self.quaternary_muscle_group.as_deref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muscle_groups_order() {
        let skeleton = MovementSkeleton::new("Bench Press", "Chest")
            .with_secondary("Triceps")
            .with_quaternary("Shoulders");
        assert_eq!(
            skeleton.muscle_groups(),
            vec!["Chest", "Triceps", "Shoulders"]
        );
    }

    #[test]
    fn test_muscle_groups_primary_only() {
        let skeleton = MovementSkeleton::new("Plank", "Core");
        assert_eq!(skeleton.muscle_groups(), vec!["Core"]);
    }
}
