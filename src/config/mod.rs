//! # Catalogue Configuration
//!
//! Settings for the process-default plugin registry and for logging.
//!
//! ## Sources
//!
//! Loaded by [`ConfigManager`] in increasing order of precedence:
//!
//! 1. `<config dir>/catalogue.toml`
//! 2. `<config dir>/catalogue.<environment>.toml`
//! 3. `CATALOGUE_*` environment variables, `__` separating nested fields
//!    (`CATALOGUE_PLUGINS__GROUP_SEPARATOR=.`)
//!
//! Every field has a default, so all sources are optional.
//!
//! ```toml
//! [plugins]
//! group_separator = "_"
//! manifest_paths = ["plugins/entry_points.toml"]
//!
//! [logging]
//! level = "info"
//! json = false
//! ```

pub mod error;
pub mod loader;

use crate::constants::separators::DEFAULT_GROUP_SEPARATOR;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring catalogue.toml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogueConfig {
    /// Entry point discovery settings
    pub plugins: PluginConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Joins namespace segments into the entry point group identifier
    pub group_separator: String,

    /// Entry point manifests; relative paths resolve against the configuration directory
    pub manifest_paths: Vec<PathBuf>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            group_separator: DEFAULT_GROUP_SEPARATOR.to_string(),
            manifest_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; when unset the level follows the environment
    pub level: Option<String>,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl CatalogueConfig {
    /// Reject values that would make the registry misbehave
    pub fn validate(&self) -> ConfigResult<()> {
        if self.plugins.group_separator.is_empty() {
            return Err(ConfigurationError::invalid_value(
                "plugins.group_separator",
                "",
                "group separator must not be empty",
            ));
        }
        if let Some(level) = &self.logging.level {
            if level.trim().is_empty() {
                return Err(ConfigurationError::invalid_value(
                    "logging.level",
                    level.clone(),
                    "log level must not be blank",
                ));
            }
        }
        Ok(())
    }
}
