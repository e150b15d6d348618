//! # Error Types
//!
//! Structured errors for the registry, plugin loading and configuration layers.
//!
//! `RegistryError` is the only error a lookup can produce. Everything else a caller
//! can get wrong (malformed keys, decorator arity, bad configuration) is reported
//! through the crate-level `CatalogueError`, which also wraps `RegistryError`.

use crate::config::ConfigurationError;
use crate::registry::entry_points::LoadError;
use crate::registry::Key;
use thiserror::Error;

/// Lookup failures against a store or namespace
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Can't get key {key}: not found in registry")]
    KeyNotFound { key: Key },

    #[error("Can't remove key {key}: not found in registry")]
    RemoveMissing { key: Key },

    #[error("Can't find '{name}' in registry {namespace} (key {key}). Available names: {available}")]
    NameNotFound {
        namespace: String,
        name: String,
        key: String,
        available: String,
    },
}

impl RegistryError {
    /// The missing key or name, as shown in the message
    pub fn missing(&self) -> String {
        match self {
            RegistryError::KeyNotFound { key } | RegistryError::RemoveMissing { key } => {
                key.to_string()
            }
            RegistryError::NameNotFound { name, .. } => name.clone(),
        }
    }
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Invalid registry key: {reason}")]
    InvalidKey { reason: String },

    #[error("register() takes exactly {expected} name argument but {given} were given")]
    Arity { expected: usize, given: usize },

    #[error(transparent)]
    PluginLoad(#[from] LoadError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl CatalogueError {
    /// Create an invalid key error
    pub fn invalid_key<R: Into<String>>(reason: R) -> Self {
        Self::InvalidKey {
            reason: reason.into(),
        }
    }

    /// True when this wraps a registry lookup failure
    pub fn is_registry_error(&self) -> bool {
        matches!(self, CatalogueError::Registry(_))
    }
}

pub type Result<T> = std::result::Result<T, CatalogueError>;
