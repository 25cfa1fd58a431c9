//! Structure Engine - async orchestration over the store
//!
//! Provides:
//! - `EngineConfig` (defaults, `structure.toml`, `STRUCTURE_*` environment)
//! - `Database`, which runs blocking store calls off the async runtime and
//!   tracks per-table write versions
//! - `LiveQuery` subscriptions that re-run on writes and idle out
//! - The `StructureRepository` facade
//! - The session actor and per-screen state reducers

pub mod config;
pub mod database;
pub mod live;
pub mod repository;
pub mod screens;
pub mod session;

use std::sync::Arc;

use structure_core::errors::ExError;
use structure_core::logging_facility;

pub use config::EngineConfig;
pub use database::{Database, Table};
pub use live::{LiveQuery, LoadState, Subscription};
pub use repository::{SqliteStructureRepository, StructureRepository};
pub use session::SessionHandle;

use screens::{
    BuildRoutineScreen, BuildWorkoutScreen, HomeScreen, MyRoutinesScreen, SingleRoutineScreen,
    WorkoutScreen,
};

/// Everything a presentation layer needs, wired together
#[derive(Clone)]
pub struct Engine {
    config: EngineConfig,
    repo: Arc<dyn StructureRepository>,
    session: SessionHandle,
}

impl Engine {
    /// Initialise logging, open the store and spawn the session actor
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// `Config` for an unknown log profile, or any error opening the store
    pub async fn start(config: EngineConfig) -> Result<Self, ExError> {
        logging_facility::init(config.profile()?);

        let db = Database::open(&config).await?;
        tracing::info!(
            op = "engine_start",
            in_memory = config.in_memory,
            database_path = %config.database_path.display(),
            "store ready"
        );

        let repo = Arc::new(SqliteStructureRepository::new(db, config.idle_timeout()));
        Ok(Self::with_repository(config, repo))
    }

    /// Wire an engine around an existing repository
    pub fn with_repository(config: EngineConfig, repo: Arc<dyn StructureRepository>) -> Self {
        Self {
            config,
            repo,
            session: SessionHandle::spawn(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn repository(&self) -> Arc<dyn StructureRepository> {
        self.repo.clone()
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn home_screen(&self) -> HomeScreen {
        HomeScreen::new(self.repository(), self.session.clone())
    }

    pub fn my_routines_screen(&self) -> MyRoutinesScreen {
        MyRoutinesScreen::new(self.repository(), self.session.clone())
    }

    /// # Errors
    ///
    /// `NotFound` if no routine is selected
    pub fn single_routine_screen(&self) -> Result<SingleRoutineScreen, ExError> {
        SingleRoutineScreen::new(self.repository(), self.session.clone())
    }

    pub fn build_workout_screen(&self) -> BuildWorkoutScreen {
        BuildWorkoutScreen::new(self.repository(), self.session.clone())
    }

    pub fn build_routine_screen(&self) -> BuildRoutineScreen {
        BuildRoutineScreen::new(self.repository(), self.session.clone())
    }

    /// # Errors
    ///
    /// `NotFound` if no workout is selected
    pub fn workout_screen(&self) -> Result<WorkoutScreen, ExError> {
        WorkoutScreen::new(
            self.repository(),
            &self.session,
            self.config.history_sessions,
        )
    }
}
