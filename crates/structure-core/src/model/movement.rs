use serde::{Deserialize, Serialize};

/// Movement - one exercise inside a workout with a target set count
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Movement {
    pub id: i64,
    pub parent_workout_id: i64,
    pub name: String,
    pub muscle_group: String,
    pub sets: u32,
}

impl Movement {
    pub fn new(
        id: i64,
        parent_workout_id: i64,
        name: impl Into<String>,
        muscle_group: impl Into<String>,
        sets: u32,
    ) -> Self {
        Self {
            id,
            parent_workout_id,
            name: name.into(),
            muscle_group: muscle_group.into(),
            sets,
        }
    }
}
