use serde::{Deserialize, Serialize};

use super::movement::Movement;

/// Workout - a named group of movements inside a routine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    /// Monotonically assigned id (max + 1 at materialization time)
    pub workout_id: i64,

    /// Name of the owning routine
    pub parent_routine_name: String,

    pub name: String,

    /// Movements of this workout (derived, ordered by movement id)
    #[serde(default)]
    pub movements: Vec<Movement>,
}

impl Workout {
    pub fn new(
        workout_id: i64,
        parent_routine_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            workout_id,
            parent_routine_name: parent_routine_name.into(),
            name: name.into(),
            movements: Vec::new(),
        }
    }

    pub fn with_movements(mut self, movements: Vec<Movement>) -> Self {
        self.movements = movements;
        self
    }

    /// Total number of sets across all movements
    pub fn total_sets(&self) -> u32 {
        self.movements.iter().map(|m| m.sets).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_sets() {
        let workout = Workout::new(3, "PPL", "Legs").with_movements(vec![
            Movement::new(1, 3, "Squat", "Legs", 5),
            Movement::new(2, 3, "Leg Curl", "Hamstrings", 3),
        ]);
        assert_eq!(workout.total_sets(), 8);
    }
}
