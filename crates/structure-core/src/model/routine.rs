use serde::{Deserialize, Serialize};

use super::workout::Workout;

/// Routine - a named, ordered collection of workouts
///
/// The name is the primary key. `workouts` is never stored on the routine
/// row; it is filled in by joining on `Workout::parent_routine_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    /// Unique routine name
    pub name: String,

    /// Whether this is the routine the user is currently following
    pub is_current: bool,

    /// Workouts belonging to this routine (derived, ordered by workout id)
    #[serde(default)]
    pub workouts: Vec<Workout>,
}

impl Routine {
    pub fn new(name: impl Into<String>, is_current: bool) -> Self {
        Self {
            name: name.into(),
            is_current,
            workouts: Vec::new(),
        }
    }

    /// Attach the joined workouts, consuming self
    pub fn with_workouts(mut self, workouts: Vec<Workout>) -> Self {
        self.workouts = workouts;
        self
    }

    pub fn workout_count(&self) -> usize {
        self.workouts.len()
    }
}
