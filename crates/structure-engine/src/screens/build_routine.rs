//! Build routine: name the routine draft and commit it

use std::sync::Arc;

use structure_core::draft::DraftRoutine;
use structure_core::errors::ExError;
use structure_store::MaterializedRoutine;

use crate::repository::StructureRepository;
use crate::session::SessionHandle;

pub struct BuildRoutineScreen {
    repo: Arc<dyn StructureRepository>,
    session: SessionHandle,
}

impl BuildRoutineScreen {
    pub fn new(repo: Arc<dyn StructureRepository>, session: SessionHandle) -> Self {
        Self { repo, session }
    }

    /// The routine draft as held by the session
    pub fn draft(&self) -> DraftRoutine {
        self.session.snapshot().draft
    }

    /// # Errors
    ///
    /// `Concurrency` if the session actor is gone
    pub async fn set_routine_name(&self, name: impl Into<String>) -> Result<(), ExError> {
        self.session.set_draft_name(name).await.map(|_| ())
    }

    /// Validate and commit the routine draft, then release it
    ///
    /// Workouts added to the session draft while the commit was running are
    /// not part of it and stay in the draft.
    ///
    /// # Errors
    ///
    /// `InvalidName` for a blank routine name, or any persistence error. The
    /// draft is kept on failure.
    pub async fn save_routine(&self) -> Result<MaterializedRoutine, ExError> {
        let draft = self.draft();
        draft.validate().map_err(ExError::from)?;

        let materialized = self.repo.insert_draft_routine(&draft).await?;
        self.session.draft_committed(draft).await?;
        Ok(materialized)
    }

    /// Drop the routine draft
    ///
    /// # Errors
    ///
    /// `Concurrency` if the session actor is gone
    pub async fn cancel(&self) -> Result<(), ExError> {
        self.session.clear_draft().await.map(|_| ())
    }
}
