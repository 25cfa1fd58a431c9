//! Set log for an active workout session
//!
//! Holds one editable `MovementUserData` per planned set of every movement in
//! the workout being performed. The movement list arrives from a live query
//! and may be re-delivered at any time, so `sync_movements` reconciles rather
//! than rebuilds.

use crate::errors::{Result, StructureError};
use crate::model::{Movement, MovementUserData};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetLog {
    entries: Vec<(Movement, Vec<MovementUserData>)>,
}

impl SetLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log for the given movements with blank sets
    pub fn for_movements(movements: &[Movement]) -> Self {
        let mut log = Self::new();
        log.sync_movements(movements);
        log
    }

    /// Reconcile with the latest movement list
    ///
    /// Keeps values already typed for sets that still exist, grows or
    /// truncates per-movement lists to the current set count, and drops
    /// movements that are no longer part of the workout.
    pub fn sync_movements(&mut self, movements: &[Movement]) {
        let mut previous = std::mem::take(&mut self.entries);

        for movement in movements {
            let mut sets = previous
                .iter()
                .position(|(m, _)| m.id == movement.id)
                .map(|i| previous.swap_remove(i).1)
                .unwrap_or_default();

            sets.truncate(movement.sets as usize);
            for set_index in sets.len() as u32..movement.sets {
                sets.push(MovementUserData::blank(movement.id, set_index));
            }

            self.entries.push((movement.clone(), sets));
        }
    }

    /// # Errors
    ///
    /// `MissingSet` if the movement or set index is not in the log
    pub fn update_reps(&mut self, movement_id: i64, set_index: u32, reps: &str) -> Result<()> {
        self.entry_mut(movement_id, set_index)?.reps = reps.to_string();
        Ok(())
    }

    /// # Errors
    ///
    /// `MissingSet` if the movement or set index is not in the log
    pub fn update_weight(&mut self, movement_id: i64, set_index: u32, weight: &str) -> Result<()> {
        self.entry_mut(movement_id, set_index)?.weight = weight.to_string();
        Ok(())
    }

    /// # Errors
    ///
    /// `MissingSet` if the movement or set index is not in the log
    pub fn entry(&self, movement_id: i64, set_index: u32) -> Result<&MovementUserData> {
        self.sets_for(movement_id)
            .and_then(|sets| sets.get(set_index as usize))
            .ok_or(StructureError::MissingSet {
                movement_id,
                set_index,
            })
    }

    pub fn sets_for(&self, movement_id: i64) -> Option<&[MovementUserData]> {
        self.entries
            .iter()
            .find(|(m, _)| m.id == movement_id)
            .map(|(_, sets)| sets.as_slice())
    }

    pub fn movements(&self) -> impl Iterator<Item = &Movement> {
        self.entries.iter().map(|(m, _)| m)
    }

    /// All set entries flattened in movement order, ready to be saved
    pub fn rows(&self) -> Vec<MovementUserData> {
        self.entries
            .iter()
            .flat_map(|(_, sets)| sets.iter().cloned())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, movement_id: i64, set_index: u32) -> Result<&mut MovementUserData> {
        self.entries
            .iter_mut()
            .find(|(m, _)| m.id == movement_id)
            .and_then(|(_, sets)| sets.get_mut(set_index as usize))
            .ok_or(StructureError::MissingSet {
                movement_id,
                set_index,
            })
    }
}
