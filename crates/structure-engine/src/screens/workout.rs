//! Workout: log reps and weight for the selected workout

use std::sync::Arc;

use structure_core::errors::ExError;
use structure_core::history::{group_sessions, SessionBucket};
use structure_core::model::{Movement, Workout};
use structure_core::set_log::SetLog;

use crate::live::{LoadState, Subscription};
use crate::repository::StructureRepository;
use crate::session::SessionHandle;

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutState {
    pub workout: Workout,
    pub set_log: SetLog,
}

pub struct WorkoutScreen {
    repo: Arc<dyn StructureRepository>,
    workout: Workout,
    movements: Subscription<Vec<Movement>>,
    set_log: SetLog,
    history_sessions: u32,
}

impl WorkoutScreen {
    /// # Errors
    ///
    /// `NotFound` if no workout is selected in the session
    pub fn new(
        repo: Arc<dyn StructureRepository>,
        session: &SessionHandle,
        history_sessions: u32,
    ) -> Result<Self, ExError> {
        let workout = session
            .snapshot()
            .require_workout()
            .map_err(ExError::from)?
            .clone();
        Ok(Self {
            movements: repo.load_movements_for(workout.workout_id).subscribe(),
            repo,
            workout,
            set_log: SetLog::new(),
            history_sessions,
        })
    }

    /// Current view, reconciling the set log with the latest movements
    pub fn state(&mut self) -> LoadState<WorkoutState> {
        let movements = self.movements.current();
        if let Some(movements) = movements.success() {
            self.set_log.sync_movements(movements);
        }
        let workout = self.workout.clone();
        let set_log = self.set_log.clone();
        movements.map(|_| WorkoutState { workout, set_log })
    }

    pub async fn loaded(&mut self) -> LoadState<WorkoutState> {
        self.movements.loaded().await;
        self.state()
    }

    /// Wait for the movement list to change, then reconcile
    pub async fn changed(&mut self) -> Option<LoadState<WorkoutState>> {
        self.movements.changed().await?;
        Some(self.state())
    }

    pub fn set_log(&self) -> &SetLog {
        &self.set_log
    }

    /// # Errors
    ///
    /// `MissingMapping` if the movement or set is not in the log
    pub fn update_reps(&mut self, movement_id: i64, set_index: u32, reps: &str) -> Result<(), ExError> {
        self.set_log
            .update_reps(movement_id, set_index, reps)
            .map_err(ExError::from)
    }

    /// # Errors
    ///
    /// `MissingMapping` if the movement or set is not in the log
    pub fn update_weight(
        &mut self,
        movement_id: i64,
        set_index: u32,
        weight: &str,
    ) -> Result<(), ExError> {
        self.set_log
            .update_weight(movement_id, set_index, weight)
            .map_err(ExError::from)
    }

    /// Save every set of the log as one session
    ///
    /// # Errors
    ///
    /// Any persistence error; nothing is saved in that case
    pub async fn save_workout(&self) -> Result<Vec<i64>, ExError> {
        self.repo
            .insert_user_data_with_timestamp(self.set_log.rows())
            .await
    }

    /// History of one movement grouped by session, newest first
    ///
    /// `sessions` defaults to the configured session count.
    pub async fn load_history(
        &self,
        movement_id: i64,
        sessions: Option<u32>,
    ) -> LoadState<Vec<SessionBucket>> {
        let sessions = sessions.unwrap_or(self.history_sessions);
        LoadState::from(
            self.repo
                .get_history_for_movement(movement_id, sessions)
                .await,
        )
        .and_then(|rows| group_sessions(rows).map_err(ExError::from))
    }
}
