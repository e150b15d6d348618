//! # Namespaces
//!
//! A `Namespace` is a lightweight view bound to a key prefix. It registers values
//! under `(prefix.., name)` in a [`Store`], looks them up again, enumerates them and,
//! when entry points are enabled, falls back to plugin entries declared for the
//! namespace's group.
//!
//! Namespaces own no data. Two handles for the same prefix over the same store are
//! interchangeable.
//!
//! ## Usage
//!
//! ```rust
//! use catalogue::registry::{Namespace, Store};
//!
//! fn whitespace_tokenizer(text: &str) -> Vec<String> {
//!     text.split_whitespace().map(str::to_string).collect()
//! }
//! fn upper_tokenizer(text: &str) -> Vec<String> {
//!     text.split_whitespace().map(str::to_uppercase).collect()
//! }
//! type Tokenizer = fn(&str) -> Vec<String>;
//!
//! let tokenizers = Namespace::new(["nlp", "tokenizers"])?.in_store(Store::new());
//!
//! // direct form: returns the value unchanged
//! let registered: Tokenizer = tokenizers.register("whitespace", whitespace_tokenizer as Tokenizer)?;
//! assert_eq!(registered("a b"), vec!["a", "b"]);
//!
//! // decorator form: bind the name first, apply later
//! let upper = tokenizers.decorator("upper")?.apply(upper_tokenizer as Tokenizer);
//! assert_eq!(upper("a b"), vec!["A", "B"]);
//!
//! let tokenize = tokenizers.get("upper")?;
//! assert_eq!(tokenize.downcast_ref::<Tokenizer>().unwrap()("a b"), vec!["A", "B"]);
//! assert!(tokenizers.contains("whitespace"));
//! assert_eq!(tokenizers.get_all().len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::key::Key;
use super::plugin_registry::PluginRegistry;
use super::registrant::{Registrant, RegistrantInfo};
use super::store::Store;
use crate::constants::separators::{NAMESPACE_DISPLAY_SEPARATOR, NESTED_NAME_SEPARATOR};
use crate::constants::system::NO_AVAILABLE_NAMES;
use crate::error::{CatalogueError, RegistryError, Result};
use crate::logging::log_registry_operation;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::Location;
use tracing::debug;

/// Handle bound to a namespace prefix
#[derive(Clone)]
pub struct Namespace {
    prefix: Key,
    entry_points: bool,
    store: Store,
    plugins: Option<PluginRegistry>,
}

impl Namespace {
    /// Namespace over the process-default store, with entry points disabled
    pub fn new<I, S>(parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            prefix: Key::new(parts)?,
            entry_points: false,
            store: Store::global().clone(),
            plugins: None,
        })
    }

    /// Enable or disable entry point resolution
    pub fn entry_points(mut self, enabled: bool) -> Self {
        self.entry_points = enabled;
        self
    }

    /// Bind to `store` instead of the process-default store
    pub fn in_store(mut self, store: Store) -> Self {
        self.store = store;
        self
    }

    /// Resolve entry points through `plugins` instead of the process-default registry
    pub fn with_plugins(mut self, plugins: PluginRegistry) -> Self {
        self.plugins = Some(plugins);
        self
    }

    pub fn prefix(&self) -> &Key {
        &self.prefix
    }

    pub fn has_entry_points(&self) -> bool {
        self.entry_points
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    fn plugins(&self) -> &PluginRegistry {
        match &self.plugins {
            Some(plugins) => plugins,
            None => PluginRegistry::global(),
        }
    }

    /// Group identifier used to query entry points for this namespace
    pub fn entry_point_group(&self) -> String {
        self.plugins().group_for(&self.prefix)
    }

    /// Register `func` under `name` and hand it back unchanged.
    ///
    /// The caller's file and line are recorded; the file is as `file!()` reports it.
    #[track_caller]
    pub fn register<T>(&self, name: &str, func: T) -> Result<T>
    where
        T: Any + Send + Sync + Clone,
    {
        let location = Location::caller();
        self.insert(name, Registrant::new(func.clone()).or_located(location))?;
        Ok(func)
    }

    /// Register a prepared registrant (see the `registrant!` macro) under `name`
    #[track_caller]
    pub fn register_registrant(&self, name: &str, registrant: Registrant) -> Result<Registrant> {
        let location = Location::caller();
        let registrant = registrant.or_located(location);
        self.insert(name, registrant.clone())?;
        Ok(registrant)
    }

    fn insert(&self, name: &str, registrant: Registrant) -> Result<()> {
        let key = self.prefix.child(name)?;
        self.insert_at(key, registrant);
        Ok(())
    }

    fn insert_at(&self, key: Key, registrant: Registrant) {
        log_registry_operation(
            "register",
            &self.prefix.to_string(),
            Some(key.leaf()),
            "ok",
            Some(registrant.type_name()),
        );
        self.store.set(key, registrant);
    }

    /// Decorator bound to `name`; applying it registers the value
    pub fn decorator(&self, name: &str) -> Result<Decorator> {
        Ok(Decorator {
            namespace: self.clone(),
            key: self.prefix.child(name)?,
        })
    }

    /// Decorator for a dynamically supplied list of names.
    ///
    /// Exactly one name is accepted; anything else is an arity error rather than a
    /// registry error.
    pub fn decorator_for<I, S>(&self, names: I) -> Result<Decorator>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = names.into_iter().collect();
        match names.as_slice() {
            [name] => self.decorator(name.as_ref()),
            _ => Err(CatalogueError::Arity {
                expected: 1,
                given: names.len(),
            }),
        }
    }

    /// Value registered under `name`.
    ///
    /// Looks in the store first; with entry points enabled, a miss falls back to the
    /// entry point of the same name.
    pub fn get(&self, name: &str) -> std::result::Result<Registrant, RegistryError> {
        if let Some(found) = self.lookup(name) {
            return Ok(found);
        }
        if self.entry_points {
            if let Some(found) = self.get_entry_point(name) {
                return Ok(found);
            }
        }
        Err(self.not_found(name))
    }

    fn lookup(&self, name: &str) -> Option<Registrant> {
        let key = self.prefix.child(name).ok()?;
        self.store.lookup(&key)
    }

    fn not_found(&self, name: &str) -> RegistryError {
        let names: Vec<String> = self
            .get_all()
            .into_keys()
            .filter(|rest| !rest.is_empty())
            .map(|rest| rest.join(NESTED_NAME_SEPARATOR))
            .collect();
        let available = if names.is_empty() {
            NO_AVAILABLE_NAMES.to_string()
        } else {
            names.join(", ")
        };
        let mut key: Vec<String> = self.prefix.parts().to_vec();
        key.push(name.to_string());
        RegistryError::NameNotFound {
            namespace: self.prefix.join(NAMESPACE_DISPLAY_SEPARATOR),
            name: name.to_string(),
            key: format!("{key:?}"),
            available,
        }
    }

    /// Everything registered at or below the prefix, keyed by the segments after it.
    ///
    /// A direct child is keyed by `[name]`, a nested entry by its full remainder and
    /// an entry stored exactly at the prefix by the empty remainder. With entry points
    /// enabled, plugin entries are added under `[name]` without replacing store entries.
    pub fn get_all(&self) -> BTreeMap<Vec<String>, Registrant> {
        let mut result: BTreeMap<Vec<String>, Registrant> = self
            .store
            .get_all(&self.prefix)
            .into_iter()
            .filter_map(|(key, value)| {
                let rest = key.strip_prefix(&self.prefix)?.to_vec();
                Some((rest, value))
            })
            .collect();

        if self.entry_points {
            for (name, value) in self.get_entry_points() {
                result.entry(vec![name]).or_insert(value);
            }
        }
        result
    }

    /// All loadable entry points of this namespace's group.
    ///
    /// Empty when entry points are disabled. Entries that fail to load are skipped.
    pub fn get_entry_points(&self) -> BTreeMap<String, Registrant> {
        if !self.entry_points {
            debug!(namespace = %self.prefix, "Entry points disabled, nothing to resolve");
            return BTreeMap::new();
        }
        self.plugins().load_all(&self.entry_point_group())
    }

    /// The entry point `name` of this namespace's group, if declared and loadable.
    ///
    /// Resolved whether or not entry points are enabled for the namespace.
    pub fn get_entry_point(&self, name: &str) -> Option<Registrant> {
        self.plugins().load_named(&self.entry_point_group(), name)
    }

    /// Like `get_entry_point`, falling back to `default`
    pub fn get_entry_point_or(&self, name: &str, default: Registrant) -> Registrant {
        self.get_entry_point(name).unwrap_or(default)
    }

    /// Origin metadata of the value registered under `name` (store only).
    ///
    /// `file` is absolute only for values built with [`registrant!`](crate::registrant).
    /// Plain `register` records the caller location as the compiler reports it,
    /// relative to the directory the crate was built from, and no module or doc.
    pub fn find(&self, name: &str) -> std::result::Result<RegistrantInfo, RegistryError> {
        match self.lookup(name) {
            Some(found) => Ok(found.info()),
            None => Err(self.not_found(name)),
        }
    }

    /// True when `get(name)` would succeed
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("prefix", &self.prefix)
            .field("entry_points", &self.entry_points)
            .finish()
    }
}

/// A registration waiting for its value
#[derive(Debug, Clone)]
pub struct Decorator {
    namespace: Namespace,
    key: Key,
}

impl Decorator {
    /// Full key the value will be stored under
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Register `value` and hand it back unchanged
    #[track_caller]
    pub fn apply<T>(self, value: T) -> T
    where
        T: Any + Send + Sync + Clone,
    {
        let registrant = Registrant::new(value.clone()).or_located(Location::caller());
        self.namespace.insert_at(self.key, registrant);
        value
    }

    /// Register a prepared registrant and hand it back
    #[track_caller]
    pub fn apply_registrant(self, registrant: Registrant) -> Registrant {
        let registrant = registrant.or_located(Location::caller());
        self.namespace.insert_at(self.key, registrant.clone());
        registrant
    }
}
