//! Subscriber installation

use std::fmt;
use std::str::FromStr;
use std::sync::Once;

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Where log output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Pretty text on stderr, debug level for Structure crates
    Development,
    /// One JSON object per line, info level
    Production,
    /// No output; tests install `init_test_capture()` instead
    Test,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Development => "development",
            Profile::Production => "production",
            Profile::Test => "test",
        }
    }

    /// Filter used when `RUST_LOG` is unset
    ///
    /// SQLite chatter stays at warn regardless of profile.
    pub fn default_filter(&self) -> &'static str {
        match self {
            Profile::Development => {
                "warn,structure_core=debug,structure_store=debug,structure_engine=debug"
            }
            Profile::Production | Profile::Test => {
                "warn,structure_core=info,structure_store=info,structure_engine=info"
            }
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(format!(
                "unknown log profile '{}' (expected development, production or test)",
                other
            )),
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber for `profile`
///
/// Only the first call in a process has an effect. A subscriber installed
/// elsewhere (e.g. the test capture layer) is left in place.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_filter()));

        let installed = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .finish()
                .try_init()
                .is_ok(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_current_span(false)
                .finish()
                .try_init()
                .is_ok(),
            Profile::Test => false,
        };

        if installed {
            tracing::debug!(profile = profile.as_str(), "logging initialised");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        init(Profile::Test);
        init(Profile::Development);
    }

    #[test]
    fn test_profile_round_trip() {
        for profile in [Profile::Development, Profile::Production, Profile::Test] {
            assert_eq!(profile.to_string().parse::<Profile>(), Ok(profile));
        }
        assert_eq!(" Dev ".parse::<Profile>(), Ok(Profile::Development));
        assert!("loud".parse::<Profile>().is_err());
    }

    #[test]
    fn test_default_filters_parse() {
        for profile in [Profile::Development, Profile::Production] {
            assert!(EnvFilter::try_new(profile.default_filter()).is_ok());
        }
    }
}
