//! # Registry Infrastructure
//!
//! Namespaced registration and lookup of functions, types and values.
//!
//! ## Overview
//!
//! Values are stored in a [`Store`] under hierarchical [`Key`]s. A [`Namespace`]
//! binds a key prefix and offers registration (direct or decorator form), lookup,
//! enumeration and introspection relative to it. Namespaces with entry points
//! enabled also see plugin entries declared through a [`PluginSource`] and cached in
//! a [`PluginRegistry`].
//!
//! ## Architecture
//!
//! ```text
//! Registry Infrastructure
//! ├── Store             (Key -> Registrant, prefix enumeration)
//! ├── Namespace         (prefix-bound view: register / get / get_all / find)
//! │   └── Decorator     (name bound now, value applied later)
//! └── PluginRegistry    (per-group entry point cache over a PluginSource)
//!     └── ManifestPluginSource + ExportTable
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use catalogue::registry::{self, Registrant};
//!
//! # fn main() -> catalogue::Result<()> {
//! let architectures = registry::create(["models", "architectures"], false)?;
//! architectures.register("tagger", "TaggerModel")?;
//!
//! assert!(registry::check_exists(&["models", "architectures", "tagger"]));
//! assert!(architectures.contains("tagger"));
//! # registry::Store::global().clear();
//! # Ok(())
//! # }
//! ```

pub mod entry_points;
pub mod key;
pub mod namespace;
pub mod plugin_registry;
pub mod registrant;
pub mod store;

// Re-export main types for easy access
pub use entry_points::{
    EntryPoint, ExportTable, LoadError, ManifestPluginSource, PluginManifest, PluginSource,
    Reference,
};
pub use key::Key;
pub use namespace::{Decorator, Namespace};
pub use plugin_registry::{PluginRegistry, PluginStats};
pub use registrant::{Origin, Registrant, RegistrantInfo};
pub use store::{Store, StoreStats};

use crate::error::Result;

/// Create a namespace over the process-default store and plugin registry
pub fn create<I, S>(parts: I, entry_points: bool) -> Result<Namespace>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Ok(Namespace::new(parts)?.entry_points(entry_points))
}

/// Whether `parts` is a key in the process-default store
pub fn check_exists<S: AsRef<str>>(parts: &[S]) -> bool {
    Store::global().check_exists(parts)
}
