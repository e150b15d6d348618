//! # Registry Store
//!
//! The flat mapping from [`Key`] to [`Registrant`] that every namespace reads and
//! writes through.
//!
//! ## Semantics
//!
//! - `set` inserts or silently replaces; a present key always maps to the last value set
//! - `get` and `remove` match exactly: a key that only prefixes other keys is absent
//! - `get_all` returns every entry equal to or nested below a prefix, at any depth
//!
//! ## Usage
//!
//! ```rust
//! use catalogue::registry::{Key, Registrant, Store};
//!
//! let store = Store::new();
//! store.set(Key::new(["a", "b", "c"])?, Registrant::new("test"));
//! store.set(Key::new(["a", "b"])?, Registrant::new("parent"));
//!
//! assert!(store.check_exists(&["a", "b", "c"]));
//! assert_eq!(store.get_all(&Key::new(["a", "b"])?).len(), 2);
//! # Ok::<(), catalogue::CatalogueError>(())
//! ```
//!
//! A process-default store is available through [`Store::global`]. Handles are cheap
//! to clone and all clones share the same entries.

use super::key::Key;
use super::registrant::Registrant;
use crate::error::RegistryError;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Shared key/value store backing all namespaces
#[derive(Clone, Default)]
pub struct Store {
    entries: Arc<RwLock<HashMap<Key, Registrant>>>,
}

static GLOBAL_STORE: OnceLock<Store> = OnceLock::new();

impl Store {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-default store
    pub fn global() -> &'static Store {
        GLOBAL_STORE.get_or_init(Store::new)
    }

    /// Insert or replace the value for `key`
    pub fn set(&self, key: Key, value: Registrant) {
        let mut entries = self.entries.write();
        if entries.contains_key(&key) {
            debug!(key = %key, "Key already registered, replacing");
        } else {
            debug!(key = %key, type_name = value.type_name(), "Registering key");
        }
        entries.insert(key, value);
    }

    /// Exact-match lookup
    pub fn get(&self, key: &Key) -> Result<Registrant, RegistryError> {
        self.lookup(key)
            .ok_or_else(|| RegistryError::KeyNotFound { key: key.clone() })
    }

    /// Exact-match lookup that reports absence as `None`
    pub fn lookup(&self, key: &Key) -> Option<Registrant> {
        self.entries.read().get(key).cloned()
    }

    /// Whether `parts`, taken as a key, is present. Invalid parts are never present.
    pub fn check_exists<S: AsRef<str>>(&self, parts: &[S]) -> bool {
        match Key::new(parts.iter().map(|part| part.as_ref().to_string())) {
            Ok(key) => self.contains_key(&key),
            Err(_) => false,
        }
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Remove `key` and return the value it held
    pub fn remove(&self, key: &Key) -> Result<Registrant, RegistryError> {
        let removed = self.entries.write().remove(key);
        match removed {
            Some(value) => {
                debug!(key = %key, "Removed key");
                Ok(value)
            }
            None => Err(RegistryError::RemoveMissing { key: key.clone() }),
        }
    }

    /// Every entry whose key equals `prefix` or is nested below it
    pub fn get_all(&self, prefix: &Key) -> BTreeMap<Key, Registrant> {
        self.entries
            .read()
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every entry
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        let dropped = entries.len();
        entries.clear();
        debug!(dropped = dropped, "Registry store cleared");
    }

    /// Entry counts grouped by top-level namespace
    pub fn stats(&self) -> StoreStats {
        let entries = self.entries.read();
        let mut namespaces = BTreeSet::new();
        let mut max_depth = 0;
        for key in entries.keys() {
            namespaces.insert(key.parts()[0].clone());
            max_depth = max_depth.max(key.len());
        }
        StoreStats {
            total_entries: entries.len(),
            namespaces: namespaces.into_iter().collect(),
            max_depth,
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("entry_count", &self.len())
            .field("keys", &self.keys())
            .finish()
    }
}

/// Store statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_entries: usize,
    pub namespaces: Vec<String>,
    pub max_depth: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(parts: &[&str]) -> Key {
        Key::new(parts.iter().copied()).unwrap()
    }

    #[test]
    fn test_get_set() {
        let store = Store::new();
        store.set(key(&["a", "b", "c"]), Registrant::new("test"));
        assert_eq!(store.len(), 1);
        assert!(store.check_exists(&["a", "b", "c"]));
        assert_eq!(
            *store.get(&key(&["a", "b", "c"])).unwrap().downcast_ref::<&str>().unwrap(),
            "test"
        );
        assert!(matches!(
            store.get(&key(&["a", "b", "d"])),
            Err(RegistryError::KeyNotFound { .. })
        ));
        assert!(store.get(&key(&["a", "b", "c", "d"])).is_err());
        assert!(store.get(&key(&["a", "b"])).is_err());
    }

    #[test]
    fn test_set_replaces_silently() {
        let store = Store::new();
        store.set(key(&["k"]), Registrant::new(1u32));
        store.set(key(&["k"]), Registrant::new(2u32));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&key(&["k"])).unwrap().downcast_ref::<u32>(), Some(&2));
    }

    #[test]
    fn test_remove_is_exact_match() {
        let store = Store::new();
        store.set(key(&["x", "y", "z1"]), Registrant::new("test1"));
        store.set(key(&["x", "y", "z2"]), Registrant::new("test2"));
        store.set(key(&["x", "y2"]), Registrant::new("test3"));

        assert!(matches!(
            store.remove(&key(&["x", "y"])),
            Err(RegistryError::RemoveMissing { .. })
        ));
        let removed = store.remove(&key(&["x", "y", "z2"])).unwrap();
        assert_eq!(removed.downcast_ref::<&str>(), Some(&"test2"));
        assert!(store.get(&key(&["x", "y", "z2"])).is_err());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_check_exists_tolerates_invalid_parts() {
        let store = Store::new();
        assert!(!store.check_exists::<&str>(&[]));
        assert!(!store.check_exists(&["a", ""]));
    }

    #[test]
    fn test_stats_and_clear() {
        let store = Store::new();
        store.set(key(&["a", "b", "c"]), Registrant::new(()));
        store.set(key(&["b"]), Registrant::new(()));
        let stats = store.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.namespaces, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(stats.max_depth, 3);

        let shared = store.clone();
        shared.clear();
        assert!(store.is_empty());
    }
}
