//! In-memory plugin source for tests

use catalogue::registry::{EntryPoint, LoadError, PluginSource, Registrant};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Plugin source declaring entries from memory; records how often it is asked
#[derive(Default)]
pub struct FakePluginSource {
    groups: BTreeMap<String, Vec<(String, Option<Registrant>)>>,
    list_calls: AtomicUsize,
    load_calls: AtomicUsize,
}

impl FakePluginSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` in `group`, loading to `value`
    pub fn with_entry(mut self, group: &str, name: &str, value: Registrant) -> Self {
        self.groups
            .entry(group.to_string())
            .or_default()
            .push((name.to_string(), Some(value)));
        self
    }

    /// Declare `name` in `group`; loading it fails
    pub fn with_broken_entry(mut self, group: &str, name: &str) -> Self {
        self.groups
            .entry(group.to_string())
            .or_default()
            .push((name.to_string(), None));
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }
}

impl PluginSource for FakePluginSource {
    fn list(&self, group: &str) -> Vec<EntryPoint> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.groups
            .get(group)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(name, _)| EntryPoint::new(name.clone(), group, format!("fake:{name}")))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn load(&self, entry: &EntryPoint) -> Result<Registrant, LoadError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        self.groups
            .get(&entry.group)
            .and_then(|entries| entries.iter().find(|(name, _)| *name == entry.name))
            .and_then(|(_, value)| value.clone())
            .ok_or_else(|| LoadError::Rejected {
                name: entry.name.clone(),
                reason: "fake load failure".to_string(),
            })
    }

    fn source_name(&self) -> &str {
        "fake"
    }
}
