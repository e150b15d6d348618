//! # Entry Points
//!
//! Plugin entries declared outside the code that consumes them.
//!
//! An entry point associates a `name` inside a `group` with a loadable reference of
//! the form `module[:attr] [extra1, extra2]`. The group identifier of a namespace is
//! its prefix joined with the configured separator, so entry points declared for
//! group `test_foo` show up in namespace `("test", "foo")`.
//!
//! Discovery and loading sit behind the [`PluginSource`] trait. The bundled
//! [`ManifestPluginSource`] reads TOML manifests:
//!
//! ```toml
//! [entry_points.spacy_languages]
//! en = "spacy_lang.english:English"
//! de = "spacy_lang.german:German"
//! ```
//!
//! and resolves references against an [`ExportTable`], where crates publish the
//! values they want to be loadable by reference.

use super::registrant::Registrant;
use crate::config::ConfigurationError;
use crate::constants::separators::REFERENCE_ATTR_SEPARATOR;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::debug;

/// Failure to resolve or load a single entry point
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Malformed entry point reference '{value}': {reason}")]
    MalformedReference { value: String, reason: String },

    #[error("Entry point '{name}' references '{reference}', which is not exported")]
    UnresolvedReference { name: String, reference: String },

    #[error("Entry point '{name}' failed to load: {reason}")]
    Rejected { name: String, reason: String },
}

impl LoadError {
    fn malformed<V: Into<String>, R: Into<String>>(value: V, reason: R) -> Self {
        Self::MalformedReference {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// A declared (name, reference) pair within a group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryPoint {
    pub name: String,
    pub group: String,
    pub value: String,
}

impl EntryPoint {
    pub fn new<N: Into<String>, G: Into<String>, V: Into<String>>(
        name: N,
        group: G,
        value: V,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            value: value.into(),
        }
    }

    /// Parsed form of `value`
    pub fn reference(&self) -> Result<Reference, LoadError> {
        self.value.parse()
    }
}

/// Parsed `module[:attr] [extras]` reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub module: String,
    pub attr: Option<String>,
    pub extras: Vec<String>,
}

impl Reference {
    /// `module:attr`, or just `module`; extras are not part of the target
    pub fn target(&self) -> String {
        match &self.attr {
            Some(attr) => format!("{}{REFERENCE_ATTR_SEPARATOR}{attr}", self.module),
            None => self.module.clone(),
        }
    }

    fn is_dotted_identifier(value: &str) -> bool {
        !value.is_empty()
            && value
                .split('.')
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_alphanumeric() || c == '_'))
    }
}

impl FromStr for Reference {
    type Err = LoadError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();

        let (target, extras) = match trimmed.find('[') {
            Some(open) => {
                if !trimmed.ends_with(']') {
                    return Err(LoadError::malformed(value, "unterminated extras list"));
                }
                let extras = trimmed[open + 1..trimmed.len() - 1]
                    .split(',')
                    .map(str::trim)
                    .filter(|extra| !extra.is_empty())
                    .map(str::to_string)
                    .collect();
                (trimmed[..open].trim(), extras)
            }
            None => (trimmed, Vec::new()),
        };

        let (module, attr) = match target.split_once(REFERENCE_ATTR_SEPARATOR) {
            Some((module, attr)) => (module.trim(), Some(attr.trim())),
            None => (target, None),
        };

        if !Self::is_dotted_identifier(module) {
            return Err(LoadError::malformed(value, format!("invalid module path '{module}'")));
        }
        if let Some(attr) = attr {
            if !Self::is_dotted_identifier(attr) {
                return Err(LoadError::malformed(value, format!("invalid attribute '{attr}'")));
            }
        }

        Ok(Self {
            module: module.to_string(),
            attr: attr.map(str::to_string),
            extras,
        })
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target())?;
        if !self.extras.is_empty() {
            write!(f, " [{}]", self.extras.join(", "))?;
        }
        Ok(())
    }
}

/// Host-side discovery and loading of entry points
pub trait PluginSource: Send + Sync {
    /// Entry points declared for `group`
    fn list(&self, group: &str) -> Vec<EntryPoint>;

    /// Resolve an entry point to its value
    fn load(&self, entry: &EntryPoint) -> Result<Registrant, LoadError>;

    /// Source name for identification in logs
    fn source_name(&self) -> &str {
        "unnamed_source"
    }
}

/// Values loadable by reference, keyed by `module:attr`
#[derive(Clone, Default)]
pub struct ExportTable {
    exports: Arc<RwLock<HashMap<String, Registrant>>>,
}

static GLOBAL_EXPORTS: OnceLock<ExportTable> = OnceLock::new();

impl ExportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-default export table, used by the default plugin registry
    pub fn global() -> &'static ExportTable {
        GLOBAL_EXPORTS.get_or_init(ExportTable::new)
    }

    /// Publish `value` under `reference`; extras in the reference are ignored
    pub fn export(&self, reference: &str, value: Registrant) -> Result<(), LoadError> {
        let parsed: Reference = reference.parse()?;
        let target = parsed.target();
        debug!(reference = %target, type_name = value.type_name(), "Exporting value");
        self.exports.write().insert(target, value);
        Ok(())
    }

    pub fn resolve(&self, reference: &Reference) -> Option<Registrant> {
        self.exports.read().get(&reference.target()).cloned()
    }

    pub fn len(&self) -> usize {
        self.exports.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.read().is_empty()
    }

    pub fn clear(&self) {
        self.exports.write().clear();
    }
}

impl fmt::Debug for ExportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let exports = self.exports.read();
        let mut targets: Vec<&String> = exports.keys().collect();
        targets.sort();
        f.debug_struct("ExportTable").field("targets", &targets).finish()
    }
}

/// Entry point declarations, grouped: `group -> name -> reference`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    #[serde(default)]
    pub entry_points: BTreeMap<String, BTreeMap<String, String>>,
}

impl PluginManifest {
    /// Parse a TOML manifest. Group and entry names keep their case.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigurationError> {
        Self::parse(text, "<inline>")
    }

    fn parse(text: &str, source: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(text).map_err(|e| ConfigurationError::manifest_error(source, e))
    }

    /// Load and merge manifests; later files add to and override earlier ones
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ConfigurationError> {
        let mut merged = Self::default();
        for path in paths {
            let path = path.as_ref();
            if !path.is_file() {
                return Err(ConfigurationError::manifest_not_found(path));
            }
            let described = path.display().to_string();
            let text = std::fs::read_to_string(path)
                .map_err(|e| ConfigurationError::manifest_error(described.as_str(), e))?;
            merged.merge(Self::parse(&text, &described)?);
        }
        Ok(merged)
    }

    /// Add the entries of `other`, replacing entries of the same group and name
    pub fn merge(&mut self, other: PluginManifest) {
        for (group, entries) in other.entry_points {
            self.entry_points.entry(group).or_default().extend(entries);
        }
    }

    /// Number of declared entries across all groups
    pub fn entry_count(&self) -> usize {
        self.entry_points.values().map(BTreeMap::len).sum()
    }
}

/// `PluginSource` over TOML manifests and an export table
#[derive(Debug, Clone)]
pub struct ManifestPluginSource {
    manifest: PluginManifest,
    exports: ExportTable,
    manifest_paths: Vec<PathBuf>,
}

impl ManifestPluginSource {
    pub fn new(manifest: PluginManifest, exports: ExportTable) -> Self {
        Self {
            manifest,
            exports,
            manifest_paths: Vec::new(),
        }
    }

    /// A source that declares nothing
    pub fn empty(exports: ExportTable) -> Self {
        Self::new(PluginManifest::default(), exports)
    }

    pub fn from_paths<P: AsRef<Path>>(
        paths: &[P],
        exports: ExportTable,
    ) -> Result<Self, ConfigurationError> {
        let manifest = PluginManifest::from_paths(paths)?;
        debug!(
            manifests = paths.len(),
            entries = manifest.entry_count(),
            "Loaded entry point manifests"
        );
        Ok(Self {
            manifest,
            exports,
            manifest_paths: paths.iter().map(|p| p.as_ref().to_path_buf()).collect(),
        })
    }

    pub fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    pub fn manifest_paths(&self) -> &[PathBuf] {
        &self.manifest_paths
    }
}

impl PluginSource for ManifestPluginSource {
    fn list(&self, group: &str) -> Vec<EntryPoint> {
        self.manifest
            .entry_points
            .get(group)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(name, value)| EntryPoint::new(name.clone(), group, value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn load(&self, entry: &EntryPoint) -> Result<Registrant, LoadError> {
        let reference = entry.reference()?;
        self.exports
            .resolve(&reference)
            .ok_or_else(|| LoadError::UnresolvedReference {
                name: entry.name.clone(),
                reference: reference.target(),
            })
    }

    fn source_name(&self) -> &str {
        "manifest"
    }
}
