// On-disk store: data survives reopening, extra catalogs are imported

use std::path::PathBuf;

use structure_core::model::Routine;
use structure_engine::{Database, EngineConfig, SqliteStructureRepository, StructureRepository};
use tempfile::TempDir;

fn file_config(dir: &TempDir) -> EngineConfig {
    EngineConfig::from_toml_str(&format!(
        "database_path = {:?}\nlog_profile = \"test\"",
        dir.path().join("structure.db").display().to_string()
    ))
    .unwrap()
}

async fn open(config: &EngineConfig) -> SqliteStructureRepository {
    let db = Database::open(config).await.unwrap();
    SqliteStructureRepository::new(db, config.idle_timeout())
}

#[tokio::test]
async fn test_routines_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);

    let repo = open(&config).await;
    repo.insert_routine(Routine::new("Kept", true)).await.unwrap();
    drop(repo);

    let repo = open(&config).await;
    let mut current = repo.load_current_routine().subscribe();
    let state = current.loaded().await;
    assert_eq!(
        state.success().unwrap().as_ref().map(|r| r.name.as_str()),
        Some("Kept")
    );
}

#[tokio::test]
async fn test_catalog_path_is_imported() {
    let dir = TempDir::new().unwrap();
    let mut config = file_config(&dir);
    config.catalog_path = Some(
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../structure-store/tests/fixtures/custom_catalog.yaml"),
    );

    let repo = open(&config).await;
    let mut catalog = repo.load_all_movement_skeletons().subscribe();
    let state = catalog.loaded().await;

    assert!(state
        .success()
        .unwrap()
        .iter()
        .any(|s| s.name == "Zercher Squat"));
}
