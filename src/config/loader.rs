//! Configuration Loader
//!
//! Environment-aware configuration loading. Merges the base TOML file, an optional
//! per-environment override file and `CATALOGUE_*` environment variables.

use super::error::{ConfigResult, ConfigurationError};
use super::CatalogueConfig;
use crate::constants::config_files::{
    BASE_CONFIG_FILE, DEFAULT_CONFIG_DIR, DEFAULT_ENVIRONMENT, ENVIRONMENT_VARIABLES,
    ENV_NESTING_SEPARATOR, ENV_PREFIX,
};
use config::{Config, Environment, File, FileFormat};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Loaded configuration together with where it came from
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: CatalogueConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment.
    ///
    /// An explicitly given directory must exist. The default directory is allowed to
    /// be absent, in which case only defaults and environment overrides apply.
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = match config_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(ConfigurationError::config_directory_not_found(&dir));
                }
                dir
            }
            None => Self::default_config_directory(),
        };

        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            config_directory.display()
        );

        let config = Self::load_and_merge_config(&config_directory, environment)?;
        config.validate()?;

        info!(
            environment = environment,
            group_separator = %config.plugins.group_separator,
            manifests = config.plugins.manifest_paths.len(),
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    /// Wrap an already-built configuration, e.g. for tests
    pub fn from_config<P: Into<PathBuf>>(
        config: CatalogueConfig,
        environment: &str,
        config_directory: P,
    ) -> ConfigResult<ConfigManager> {
        config.validate()?;
        Ok(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory: config_directory.into(),
        })
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &CatalogueConfig {
        &self.config
    }

    /// Configuration as JSON, for debugging output
    pub fn debug_config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Resolve a path relative to the configuration directory; absolute paths pass through
    pub fn resolve_config_path<P: AsRef<Path>>(&self, relative_path: P) -> PathBuf {
        let path = relative_path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_directory.join(path)
        }
    }

    /// Configured entry point manifests, resolved against the configuration directory
    pub fn manifest_paths(&self) -> Vec<PathBuf> {
        self.config
            .plugins
            .manifest_paths
            .iter()
            .map(|path| self.resolve_config_path(path))
            .collect()
    }

    /// Used when configuration loading fails so callers still get a registry
    fn emergency_fallback() -> ConfigManager {
        warn!("Creating fallback configuration with defaults");
        ConfigManager {
            config: CatalogueConfig::default(),
            environment: Self::detect_environment(),
            config_directory: PathBuf::from(DEFAULT_CONFIG_DIR),
        }
    }

    /// Detect current environment: CATALOGUE_ENV || APP_ENV || 'development'
    pub fn detect_environment() -> String {
        ENVIRONMENT_VARIABLES
            .iter()
            .find_map(|name| env::var(name).ok().filter(|value| !value.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
            .to_lowercase()
    }

    fn default_config_directory() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_DIR)
    }

    fn environment_config_file(environment: &str) -> String {
        let stem = BASE_CONFIG_FILE.trim_end_matches(".toml");
        format!("{stem}.{environment}.toml")
    }

    fn load_and_merge_config(
        config_directory: &Path,
        environment: &str,
    ) -> ConfigResult<CatalogueConfig> {
        let base_file = config_directory.join(BASE_CONFIG_FILE);
        let env_file = config_directory.join(Self::environment_config_file(environment));

        debug!(
            base = %base_file.display(),
            overrides = %env_file.display(),
            "Merging configuration sources"
        );

        let settings = Config::builder()
            .add_source(File::from(base_file.as_path()).format(FileFormat::Toml).required(false))
            .add_source(File::from(env_file.as_path()).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_NESTING_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                ConfigurationError::load_error(config_directory.display().to_string(), e)
            })?;

        settings.try_deserialize::<CatalogueConfig>().map_err(|e| {
            ConfigurationError::load_error(config_directory.display().to_string(), e)
        })
    }
}

static GLOBAL_CONFIG: OnceLock<Arc<ConfigManager>> = OnceLock::new();

impl ConfigManager {
    /// Get or initialize the global configuration instance
    pub fn global() -> Arc<ConfigManager> {
        GLOBAL_CONFIG
            .get_or_init(|| {
                ConfigManager::load().unwrap_or_else(|e| {
                    warn!("Configuration loading failed, using fallback: {e}");
                    Arc::new(ConfigManager::emergency_fallback())
                })
            })
            .clone()
    }

    /// Initialize global configuration from a specific directory.
    ///
    /// The first initialization wins; later calls still return the freshly loaded
    /// manager but leave the global untouched.
    pub fn initialize_global(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let config_manager = ConfigManager::load_from_directory(config_dir)?;
        if GLOBAL_CONFIG.set(config_manager.clone()).is_err() {
            debug!("Global configuration already initialized");
        }
        Ok(config_manager)
    }
}
