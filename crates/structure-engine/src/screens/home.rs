//! Home: the current routine and its workouts

use std::sync::Arc;

use structure_core::errors::ExError;
use structure_core::model::{Routine, Workout};

use crate::live::{LoadState, Subscription};
use crate::repository::StructureRepository;
use crate::session::SessionHandle;

pub struct HomeScreen {
    session: SessionHandle,
    current: Subscription<Option<Routine>>,
}

impl HomeScreen {
    pub fn new(repo: Arc<dyn StructureRepository>, session: SessionHandle) -> Self {
        Self {
            current: repo.load_current_routine().subscribe(),
            session,
        }
    }

    /// `Success(None)` when no routine is current
    pub fn state(&mut self) -> LoadState<Option<Routine>> {
        self.current.current()
    }

    /// Wait for the first result
    pub async fn loaded(&mut self) -> LoadState<Option<Routine>> {
        self.current.loaded().await
    }

    /// Wait for the next change
    pub async fn changed(&mut self) -> Option<LoadState<Option<Routine>>> {
        self.current.changed().await
    }

    /// # Errors
    ///
    /// `Concurrency` if the session actor is gone
    pub async fn select_workout(&self, workout: Workout) -> Result<(), ExError> {
        self.session.select_workout(workout).await.map(|_| ())
    }
}
