//! # Plugin Registry
//!
//! Memoizing cache in front of a [`PluginSource`].
//!
//! ## Overview
//!
//! Namespaces with entry points enabled ask the PluginRegistry for the entry points
//! of their group. The first query for a group goes to the source; the answer is
//! cached for the lifetime of the registry. Successfully loaded values are cached
//! per (group, name) as well. Nothing resolved here is ever written into a
//! [`Store`](super::Store).
//!
//! ## Key Features
//!
//! - **Lazy discovery**: the source is only consulted when a group is first requested
//! - **Per-entry failure isolation**: `load_all` skips entries that fail to load
//! - **Swappable source**: `set_source` replaces the source and drops all caches
//!
//! ## Usage
//!
//! ```rust
//! use catalogue::registry::{ExportTable, ManifestPluginSource, PluginManifest, PluginRegistry, Registrant};
//! use std::sync::Arc;
//!
//! let exports = ExportTable::new();
//! exports.export("langs.english:English", Registrant::new("en"))?;
//!
//! let manifest = PluginManifest::from_toml_str(r#"
//!     [entry_points.spacy_languages]
//!     en = "langs.english:English"
//! "#)?;
//! let registry = PluginRegistry::new(Arc::new(ManifestPluginSource::new(manifest, exports)));
//!
//! let loaded = registry.load_all("spacy_languages");
//! assert_eq!(loaded["en"].downcast_ref::<&str>(), Some(&"en"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::entry_points::{EntryPoint, ExportTable, LoadError, ManifestPluginSource, PluginSource};
use super::key::Key;
use super::registrant::Registrant;
use crate::config::ConfigManager;
use crate::constants::separators::DEFAULT_GROUP_SEPARATOR;
use crate::logging::log_plugin_operation;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

struct PluginRegistryInner {
    source: RwLock<Arc<dyn PluginSource>>,
    /// Declared entry points per group
    declared: DashMap<String, Arc<Vec<EntryPoint>>>,
    /// Loaded values per (group, name)
    loaded: DashMap<(String, String), Registrant>,
    group_separator: String,
}

/// Process-wide cache of entry points, keyed by group identifier
#[derive(Clone)]
pub struct PluginRegistry {
    inner: Arc<PluginRegistryInner>,
}

static GLOBAL_PLUGINS: OnceLock<PluginRegistry> = OnceLock::new();

impl PluginRegistry {
    /// Create a registry over `source` using the default group separator
    pub fn new(source: Arc<dyn PluginSource>) -> Self {
        Self::with_separator(source, DEFAULT_GROUP_SEPARATOR)
    }

    /// Create a registry over `source` joining namespace segments with `separator`
    pub fn with_separator<S: Into<String>>(source: Arc<dyn PluginSource>, separator: S) -> Self {
        Self {
            inner: Arc::new(PluginRegistryInner {
                source: RwLock::new(source),
                declared: DashMap::new(),
                loaded: DashMap::new(),
                group_separator: separator.into(),
            }),
        }
    }

    /// The process-default plugin registry.
    ///
    /// Built on first use from the global configuration: manifests listed under
    /// `plugins.manifest_paths`, resolved against [`ExportTable::global`]. A manifest
    /// that fails to load leaves the registry with an empty source.
    pub fn global() -> &'static PluginRegistry {
        GLOBAL_PLUGINS.get_or_init(|| {
            let config_manager = ConfigManager::global();
            let plugins = &config_manager.config().plugins;
            let manifest_paths = config_manager.manifest_paths();
            let exports = ExportTable::global().clone();

            let source = if manifest_paths.is_empty() {
                ManifestPluginSource::empty(exports)
            } else {
                ManifestPluginSource::from_paths(&manifest_paths, exports.clone()).unwrap_or_else(
                    |e| {
                        warn!(error = %e, "Failed to load entry point manifests, continuing without plugins");
                        ManifestPluginSource::empty(exports)
                    },
                )
            };

            PluginRegistry::with_separator(Arc::new(source), plugins.group_separator.clone())
        })
    }

    pub fn group_separator(&self) -> &str {
        &self.inner.group_separator
    }

    /// Group identifier for a namespace prefix
    pub fn group_for(&self, prefix: &Key) -> String {
        prefix.join(&self.inner.group_separator)
    }

    /// Replace the plugin source and drop everything cached from the old one
    pub fn set_source(&self, source: Arc<dyn PluginSource>) {
        let mut current = self.inner.source.write();
        warn!(
            previous = current.source_name(),
            replacement = source.source_name(),
            "Replacing plugin source"
        );
        *current = source;
        self.inner.declared.clear();
        self.inner.loaded.clear();
    }

    fn source(&self) -> Arc<dyn PluginSource> {
        self.inner.source.read().clone()
    }

    /// Entry points declared for `group`, queried from the source once
    pub fn entry_points(&self, group: &str) -> Arc<Vec<EntryPoint>> {
        if let Some(cached) = self.inner.declared.get(group) {
            return Arc::clone(cached.value());
        }

        let source = self.source();
        let declared = Arc::new(source.list(group));
        let details = format!("{} entries from {}", declared.len(), source.source_name());
        log_plugin_operation("discover", group, None, "ok", Some(&details));
        self.inner
            .declared
            .entry(group.to_string())
            .or_insert_with(|| Arc::clone(&declared))
            .value()
            .clone()
    }

    /// Declared entry point `name` in `group`
    pub fn find_entry_point(&self, group: &str, name: &str) -> Option<EntryPoint> {
        self.entry_points(group)
            .iter()
            .find(|entry| entry.name == name)
            .cloned()
    }

    /// Load one entry point, reusing an earlier successful load
    pub fn load(&self, entry: &EntryPoint) -> Result<Registrant, LoadError> {
        let cache_key = (entry.group.clone(), entry.name.clone());
        if let Some(loaded) = self.inner.loaded.get(&cache_key) {
            return Ok(loaded.value().clone());
        }

        let loaded = self.source().load(entry)?;
        debug!(
            group = %entry.group,
            name = %entry.name,
            type_name = loaded.type_name(),
            "Loaded entry point"
        );
        self.inner.loaded.insert(cache_key, loaded.clone());
        Ok(loaded)
    }

    /// Every loadable entry point of `group`; entries that fail to load are skipped
    pub fn load_all(&self, group: &str) -> BTreeMap<String, Registrant> {
        let mut result = BTreeMap::new();
        for entry in self.entry_points(group).iter() {
            match self.load(entry) {
                Ok(value) => {
                    result.insert(entry.name.clone(), value);
                }
                Err(e) => {
                    warn!(group = group, name = %entry.name, error = %e, "Skipping entry point that failed to load");
                }
            }
        }
        result
    }

    /// Entry point `name` of `group`, or `None` when it is not declared or fails to load
    pub fn load_named(&self, group: &str, name: &str) -> Option<Registrant> {
        let entry = self.find_entry_point(group, name)?;
        match self.load(&entry) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(group = group, name = name, error = %e, "Entry point failed to load");
                None
            }
        }
    }

    /// Forget every cached declaration and loaded value
    pub fn clear_cache(&self) {
        self.inner.declared.clear();
        self.inner.loaded.clear();
        debug!("Plugin registry cache cleared");
    }

    /// Get cache statistics
    pub fn stats(&self) -> PluginStats {
        let mut cached_groups: Vec<String> = self
            .inner
            .declared
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        cached_groups.sort();
        PluginStats {
            source: self.source().source_name().to_string(),
            declared_entries: self.inner.declared.iter().map(|e| e.value().len()).sum(),
            loaded_entries: self.inner.loaded.len(),
            cached_groups,
        }
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("source", &self.source().source_name())
            .field("group_separator", &self.inner.group_separator)
            .field("cached_groups", &self.inner.declared.len())
            .finish()
    }
}

/// Statistics about the plugin cache
#[derive(Debug, Clone, Default, Serialize)]
pub struct PluginStats {
    pub source: String,
    pub cached_groups: Vec<String>,
    pub declared_entries: usize,
    pub loaded_entries: usize,
}
