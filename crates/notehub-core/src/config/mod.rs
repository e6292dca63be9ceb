//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a default so an absent file still
//! yields a usable configuration.

pub mod diff;
pub mod history;
pub mod logging;
pub mod storage;

use serde::{Deserialize, Serialize};

use self::diff::DiffConfig;
use self::history::HistoryConfig;
use self::logging::LoggingConfig;
use self::storage::StorageConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// On-disk layout and storage behavior.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Version history settings.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Diff preview settings.
    #[serde(default)]
    pub diff: DiffConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// Merges the given file with an optional environment-specific overlay
    /// (`config/{env}.toml`) and environment variables prefixed with
    /// `NOTEHUB__`.
    pub fn load(path: &str, env: Option<&str>) -> Result<Self, AppError> {
        let mut builder =
            config::Config::builder().add_source(config::File::with_name(path).required(false));

        if let Some(env) = env {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("NOTEHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Build a configuration rooted at the given storage directory, with
    /// every other setting at its default.
    pub fn with_root(root_path: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.storage.root_path = root_path.into();
        config
    }
}
