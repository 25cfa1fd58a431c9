//! Build workout: search the catalog and assemble one workout draft

use std::sync::Arc;

use structure_core::draft::DraftWorkout;
use structure_core::errors::ExError;
use structure_core::model::MovementSkeleton;
use structure_core::search::filter_skeletons;

use crate::live::{LoadState, Subscription};
use crate::repository::StructureRepository;
use crate::session::SessionHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildWorkoutState {
    pub search_term: String,

    /// Catalog entries matching `search_term`
    pub results: Vec<MovementSkeleton>,

    pub draft: DraftWorkout,
}

pub struct BuildWorkoutScreen {
    session: SessionHandle,
    catalog: Subscription<Vec<MovementSkeleton>>,
    search_term: String,
    draft: DraftWorkout,
}

impl BuildWorkoutScreen {
    pub fn new(repo: Arc<dyn StructureRepository>, session: SessionHandle) -> Self {
        Self {
            catalog: repo.load_all_movement_skeletons().subscribe(),
            session,
            search_term: String::new(),
            draft: DraftWorkout::default(),
        }
    }

    pub fn state(&mut self) -> LoadState<BuildWorkoutState> {
        let search_term = self.search_term.clone();
        let draft = self.draft.clone();
        self.catalog.current().map(|catalog| BuildWorkoutState {
            results: filter_skeletons(&catalog, &search_term)
                .into_iter()
                .cloned()
                .collect(),
            search_term,
            draft,
        })
    }

    pub async fn loaded(&mut self) -> LoadState<BuildWorkoutState> {
        self.catalog.loaded().await;
        self.state()
    }

    pub fn draft(&self) -> &DraftWorkout {
        &self.draft
    }

    pub fn search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.set_name(name);
    }

    pub fn add_movement(&mut self, skeleton: MovementSkeleton) {
        self.draft.add_movement(skeleton);
    }

    /// # Errors
    ///
    /// `MissingMapping` if the skeleton is not in the draft
    pub fn increase_sets(&mut self, skeleton: &MovementSkeleton) -> Result<u32, ExError> {
        self.draft.increase_sets(skeleton).map_err(ExError::from)
    }

    pub fn decrease_sets(&mut self, skeleton: &MovementSkeleton) -> u32 {
        self.draft.decrease_sets(skeleton)
    }

    pub fn remove_movement(&mut self, skeleton: &MovementSkeleton) -> bool {
        self.draft.remove(skeleton)
    }

    /// Append the draft to the session's routine draft and start a new one
    ///
    /// # Errors
    ///
    /// `InvalidName` for a blank workout name; the local draft is kept
    pub async fn save_workout(&mut self) -> Result<(), ExError> {
        self.session.add_draft_workout(self.draft.clone()).await?;
        self.draft = DraftWorkout::default();
        self.search_term.clear();
        Ok(())
    }
}
