//! Draft builders for routines under construction
//!
//! A `DraftRoutine` lives only in session state until the user commits it;
//! the store then materializes it into routine, workout and movement rows in
//! one transaction (see `structure_store::repo::SqliteRepo::materialize_draft`).

use serde::{Deserialize, Serialize};

use crate::errors::{Result, StructureError};
use crate::model::{Movement, MovementSkeleton, Routine, Workout};

/// In-memory workout draft: a name plus an insertion-ordered
/// skeleton -> set count mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftWorkout {
    pub name: String,
    skeletons_and_sets: Vec<(MovementSkeleton, u32)>,
}

impl DraftWorkout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skeletons_and_sets: Vec::new(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Add a skeleton with zero sets. Re-adding an existing skeleton resets
    /// its set count to zero.
    pub fn add_movement(&mut self, skeleton: MovementSkeleton) {
        match self.position(&skeleton) {
            Some(i) => self.skeletons_and_sets[i].1 = 0,
            None => self.skeletons_and_sets.push((skeleton, 0)),
        }
    }

    /// Builder-style variant of `add_movement` + repeated `increase_sets`
    pub fn with_movement(mut self, skeleton: MovementSkeleton, sets: u32) -> Self {
        match self.position(&skeleton) {
            Some(i) => self.skeletons_and_sets[i].1 = sets,
            None => self.skeletons_and_sets.push((skeleton, sets)),
        }
        self
    }

    /// # Errors
    ///
    /// `MissingSkeleton` if the skeleton was never added
    pub fn increase_sets(&mut self, skeleton: &MovementSkeleton) -> Result<u32> {
        let i = self
            .position(skeleton)
            .ok_or_else(|| missing_skeleton(skeleton))?;
        let entry = &mut self.skeletons_and_sets[i].1;
        *entry = entry.saturating_add(1);
        Ok(*entry)
    }

    /// Decrease sets, floored at zero. Unknown skeletons are ignored.
    pub fn decrease_sets(&mut self, skeleton: &MovementSkeleton) -> u32 {
        match self.position(skeleton) {
            Some(i) => {
                let entry = &mut self.skeletons_and_sets[i].1;
                *entry = entry.saturating_sub(1);
                *entry
            }
            None => 0,
        }
    }

    /// Remove a skeleton; returns whether it was present
    pub fn remove(&mut self, skeleton: &MovementSkeleton) -> bool {
        match self.position(skeleton) {
            Some(i) => {
                self.skeletons_and_sets.remove(i);
                true
            }
            None => false,
        }
    }

    /// # Errors
    ///
    /// `MissingSkeleton` if the skeleton is not part of this draft
    pub fn sets_for(&self, skeleton: &MovementSkeleton) -> Result<u32> {
        self.position(skeleton)
            .map(|i| self.skeletons_and_sets[i].1)
            .ok_or_else(|| missing_skeleton(skeleton))
    }

    pub fn contains(&self, skeleton: &MovementSkeleton) -> bool {
        self.position(skeleton).is_some()
    }

    /// Skeletons in insertion order
    pub fn skeletons(&self) -> impl Iterator<Item = &MovementSkeleton> {
        self.skeletons_and_sets.iter().map(|(s, _)| s)
    }

    /// (skeleton, sets) pairs in insertion order
    pub fn entries(&self) -> &[(MovementSkeleton, u32)] {
        &self.skeletons_and_sets
    }

    pub fn movement_count(&self) -> usize {
        self.skeletons_and_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skeletons_and_sets.is_empty()
    }

    /// Workout row for this draft under the given id and parent
    pub fn to_workout(&self, workout_id: i64, parent_routine_name: &str) -> Workout {
        Workout::new(workout_id, parent_routine_name, self.name.clone())
    }

    /// Movement row for one skeleton of this draft
    ///
    /// # Errors
    ///
    /// `MissingSkeleton` if the skeleton is not part of this draft
    pub fn movement_for(
        &self,
        skeleton: &MovementSkeleton,
        parent_workout_id: i64,
        movement_id: i64,
    ) -> Result<Movement> {
        let sets = self.sets_for(skeleton)?;
        Ok(Movement::new(
            movement_id,
            parent_workout_id,
            skeleton.name.clone(),
            skeleton.muscle_group.clone(),
            sets,
        ))
    }

    fn position(&self, skeleton: &MovementSkeleton) -> Option<usize> {
        self.skeletons_and_sets.iter().position(|(s, _)| s == skeleton)
    }
}

fn missing_skeleton(skeleton: &MovementSkeleton) -> StructureError {
    StructureError::MissingSkeleton {
        skeleton: skeleton.name.clone(),
    }
}

/// In-memory routine draft: a name plus ordered workout drafts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRoutine {
    pub name: String,
    pub workouts: Vec<DraftWorkout>,
}

impl DraftRoutine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            workouts: Vec::new(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn add_workout(&mut self, workout: DraftWorkout) {
        self.workouts.push(workout);
    }

    pub fn with_workout(mut self, workout: DraftWorkout) -> Self {
        self.workouts.push(workout);
        self
    }

    pub fn workout_count(&self) -> usize {
        self.workouts.len()
    }

    /// Total movements across all workout drafts
    pub fn movement_count(&self) -> usize {
        self.workouts.iter().map(DraftWorkout::movement_count).sum()
    }

    /// Forget what `committed` already saved
    ///
    /// An unchanged draft is reset. Workouts appended after the commit was
    /// snapshotted are kept, and a draft that no longer starts with the
    /// committed workouts is left alone.
    pub fn release_committed(&mut self, committed: &DraftRoutine) {
        if *self == *committed {
            *self = DraftRoutine::default();
        } else if self.workouts.starts_with(&committed.workouts) {
            self.workouts = self.workouts.split_off(committed.workouts.len());
        }
    }

    /// Routine row for this draft
    pub fn to_routine(&self, is_current: bool) -> Routine {
        Routine::new(self.name.clone(), is_current)
    }

    /// Check the draft can be committed
    ///
    /// # Errors
    ///
    /// `InvalidName` if the routine name is empty or whitespace-only
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(StructureError::InvalidName {
                reason: "Routine name cannot be empty or whitespace-only".to_string(),
            });
        }
        Ok(())
    }
}
