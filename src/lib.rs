#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Catalogue
//!
//! Namespaced, process-wide registry of functions, types and values.
//!
//! ## Overview
//!
//! Catalogue lets libraries expose extension points by name. A component registers
//! a value under a hierarchical namespace such as `("models", "architectures")`; any
//! other part of the process can later look it up by name, enumerate everything in
//! the namespace, or ask where the registered value was defined. Namespaces can also
//! opt into entry points, so that values declared by separately shipped plugins show
//! up in lookups without ever being written into the registry.
//!
//! ## Module Organization
//!
//! - [`registry`] - Store, namespaces, decorators and plugin discovery
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//! - [`constants`] - Separators, file names and environment variables
//!
//! ## Quick Start
//!
//! ```rust
//! use catalogue::registry;
//!
//! # fn main() -> catalogue::Result<()> {
//! fn whitespace_tokenizer(text: &str) -> Vec<String> {
//!     text.split_whitespace().map(str::to_string).collect()
//! }
//!
//! let tokenizers = registry::create(["quickstart", "tokenizers"], false)?;
//! tokenizers.register("whitespace", whitespace_tokenizer as fn(&str) -> Vec<String>)?;
//!
//! let tokenize = tokenizers.get("whitespace")?;
//! let tokenize = tokenize.downcast_ref::<fn(&str) -> Vec<String>>().copied();
//! assert_eq!(tokenize.map(|f| f("a b")), Some(vec!["a".to_string(), "b".to_string()]));
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod registry;
pub mod test_utils;

pub use config::{CatalogueConfig, ConfigManager, ConfigurationError};
pub use error::{CatalogueError, RegistryError, Result};
pub use registry::{
    check_exists, create, Decorator, EntryPoint, Key, LoadError, Namespace, Origin,
    PluginRegistry, PluginSource, Registrant, RegistrantInfo, Store,
};
