//! Engine configuration
//!
//! Layered with the `config` crate, lowest priority first:
//! 1. Embedded defaults
//! 2. `structure.toml` in the working directory (optional)
//! 3. `STRUCTURE_*` environment variables, after loading `.env`

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use structure_core::errors::{ExError, ExErrorKind};
use structure_core::logging_facility::Profile;

const DEFAULT_CONFIG: &str = r#"
database_path = "structure.db"
in_memory = false
idle_timeout_ms = 5000
history_sessions = 1
log_profile = "development"
"#;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// SQLite file; ignored when `in_memory` is set
    pub database_path: PathBuf,

    pub in_memory: bool,

    /// Grace period before an unobserved live query stops
    pub idle_timeout_ms: u64,

    /// Sessions shown by default in a movement's history
    pub history_sessions: u32,

    /// Extra catalog imported after the bundled one
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    pub log_profile: String,
}

impl EngineConfig {
    /// Load configuration from defaults, `structure.toml` and the environment
    ///
    /// # Errors
    ///
    /// `Config` if a source is malformed or a value has the wrong type
    pub fn load() -> Result<Self, ExError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::with_name("structure").required(false))
            .add_source(
                Environment::with_prefix("STRUCTURE")
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_error)?;

        config.try_deserialize().map_err(config_error)
    }

    /// Defaults overlaid with a TOML document
    ///
    /// # Errors
    ///
    /// `Config` if the document is malformed or a value has the wrong type
    pub fn from_toml_str(overrides: &str) -> Result<Self, ExError> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(overrides, FileFormat::Toml))
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(config_error)
    }

    /// Defaults with an in-memory database
    pub fn in_memory() -> Self {
        Self {
            database_path: PathBuf::from("structure.db"),
            in_memory: true,
            idle_timeout_ms: 5000,
            history_sessions: 1,
            catalog_path: None,
            log_profile: "test".to_string(),
        }
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    /// # Errors
    ///
    /// `Config` for an unknown profile name
    pub fn profile(&self) -> Result<Profile, ExError> {
        self.log_profile.parse().map_err(|reason: String| {
            ExError::new(ExErrorKind::Config)
                .with_op("log_profile")
                .with_message(reason)
        })
    }
}

fn config_error(err: config::ConfigError) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("load_config")
        .with_message(err.to_string())
}
