//! Shared fixtures for engine integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use structure_core::draft::{DraftRoutine, DraftWorkout};
use structure_core::model::MovementSkeleton;
use structure_engine::{Database, EngineConfig, SqliteStructureRepository, StructureRepository};

/// Idle timeout short enough to observe a driver stopping
pub const SHORT_IDLE: Duration = Duration::from_millis(50);

/// Upper bound for any single await in these tests
pub const WAIT: Duration = Duration::from_secs(5);

pub async fn setup_repo() -> (Database, Arc<dyn StructureRepository>) {
    setup_repo_with_idle(SHORT_IDLE).await
}

pub async fn setup_repo_with_idle(idle: Duration) -> (Database, Arc<dyn StructureRepository>) {
    let config = EngineConfig::in_memory().with_idle_timeout(idle);
    let db = Database::open(&config).await.unwrap();
    let repo = Arc::new(SqliteStructureRepository::new(db.clone(), idle));
    (db, repo)
}

pub fn upper_lower() -> DraftRoutine {
    DraftRoutine::new("Upper/Lower")
        .with_workout(
            DraftWorkout::new("Upper")
                .with_movement(MovementSkeleton::new("Bench Press", "Chest"), 3)
                .with_movement(MovementSkeleton::new("Pull Up", "Back"), 3),
        )
        .with_workout(
            DraftWorkout::new("Lower")
                .with_movement(MovementSkeleton::new("Squat", "Quadriceps"), 5),
        )
}
