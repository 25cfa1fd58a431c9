//! Single routine: the selected routine with its live workouts

use std::sync::Arc;

use structure_core::errors::ExError;
use structure_core::model::{Routine, Workout};

use crate::live::{LoadState, Subscription};
use crate::repository::StructureRepository;
use crate::session::SessionHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleRoutineState {
    pub routine: Routine,
    pub workouts: Vec<Workout>,
}

pub struct SingleRoutineScreen {
    session: SessionHandle,
    routine: Routine,
    workouts: Subscription<Vec<Workout>>,
}

impl SingleRoutineScreen {
    /// # Errors
    ///
    /// `NotFound` if no routine is selected in the session
    pub fn new(repo: Arc<dyn StructureRepository>, session: SessionHandle) -> Result<Self, ExError> {
        let routine = session
            .snapshot()
            .require_routine()
            .map_err(ExError::from)?
            .clone();
        Ok(Self {
            workouts: repo.load_workouts_for(&routine.name).subscribe(),
            routine,
            session,
        })
    }

    pub fn state(&mut self) -> LoadState<SingleRoutineState> {
        let routine = self.routine.clone();
        self.workouts
            .current()
            .map(|workouts| SingleRoutineState { routine, workouts })
    }

    pub async fn loaded(&mut self) -> LoadState<SingleRoutineState> {
        self.workouts.loaded().await;
        self.state()
    }

    /// # Errors
    ///
    /// `Concurrency` if the session actor is gone
    pub async fn select_workout(&self, workout: Workout) -> Result<(), ExError> {
        self.session.select_workout(workout).await.map(|_| ())
    }
}
