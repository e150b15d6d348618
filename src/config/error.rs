//! Configuration Error Types
//!
//! Errors raised while loading configuration files and entry point manifests.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration-related errors with detailed context
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Configuration directory does not exist
    #[error("Configuration directory not found: {path}")]
    ConfigDirectoryNotFound { path: PathBuf },

    /// Configuration sources could not be read or merged
    #[error("Failed to load configuration from '{source_description}': {error}")]
    LoadError {
        source_description: String,
        error: String,
    },

    /// Entry point manifest listed in configuration does not exist
    #[error("Entry point manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Entry point manifest could not be parsed
    #[error("Invalid entry point manifest '{source_description}': {error}")]
    InvalidManifest {
        source_description: String,
        error: String,
    },

    /// Invalid configuration value
    #[error("Invalid value '{value}' for field '{field}': {context}")]
    InvalidValue {
        field: String,
        value: String,
        context: String,
    },
}

impl ConfigurationError {
    pub fn config_directory_not_found<P: AsRef<Path>>(path: P) -> Self {
        Self::ConfigDirectoryNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load_error<S: Into<String>, E: std::fmt::Display>(source: S, error: E) -> Self {
        Self::LoadError {
            source_description: source.into(),
            error: error.to_string(),
        }
    }

    pub fn manifest_not_found<P: AsRef<Path>>(path: P) -> Self {
        Self::ManifestNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn manifest_error<S: Into<String>, E: std::fmt::Display>(source: S, error: E) -> Self {
        Self::InvalidManifest {
            source_description: source.into(),
            error: error.to_string(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value<F: Into<String>, V: Into<String>, C: Into<String>>(
        field: F,
        value: V,
        context: C,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            context: context.into(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;
