//! My routines: every routine, selection, deletion and the current flag

use std::sync::Arc;

use structure_core::errors::ExError;
use structure_core::model::Routine;
use structure_store::CascadeReport;

use crate::live::{LoadState, Subscription};
use crate::repository::StructureRepository;
use crate::session::SessionHandle;

pub struct MyRoutinesScreen {
    repo: Arc<dyn StructureRepository>,
    session: SessionHandle,
    routines: Subscription<Vec<Routine>>,
}

impl MyRoutinesScreen {
    pub fn new(repo: Arc<dyn StructureRepository>, session: SessionHandle) -> Self {
        Self {
            routines: repo.load_all_routines().subscribe(),
            repo,
            session,
        }
    }

    pub fn state(&mut self) -> LoadState<Vec<Routine>> {
        self.routines.current()
    }

    pub async fn loaded(&mut self) -> LoadState<Vec<Routine>> {
        self.routines.loaded().await
    }

    pub async fn changed(&mut self) -> Option<LoadState<Vec<Routine>>> {
        self.routines.changed().await
    }

    /// # Errors
    ///
    /// `Concurrency` if the session actor is gone
    pub async fn select_routine(&self, routine: Routine) -> Result<(), ExError> {
        self.session.select_routine(routine).await.map(|_| ())
    }

    /// # Errors
    ///
    /// Any persistence error; the routine is left intact in that case
    pub async fn delete_routine(&self, routine: &Routine) -> Result<CascadeReport, ExError> {
        self.repo.delete_routine_cascade(routine).await
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown routine
    pub async fn make_current(&self, routine: &Routine) -> Result<(), ExError> {
        self.repo.set_current_routine(&routine.name).await
    }
}
