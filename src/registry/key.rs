//! # Registry Keys
//!
//! A `Key` is a path in the namespace tree: one or more non-empty string segments,
//! compared by full sequence equality.

use crate::error::{CatalogueError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hierarchical registry key, e.g. `("nlp", "pipeline", "tokenizer")`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Key(Vec<String>);

impl Key {
    /// Build a key from its segments.
    ///
    /// Fails when no segment is given or when any segment is empty.
    pub fn new<I, S>(parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts: Vec<String> = parts.into_iter().map(Into::into).collect();
        Self::validate(&parts)?;
        Ok(Self(parts))
    }

    fn validate(parts: &[String]) -> Result<()> {
        if parts.is_empty() {
            return Err(CatalogueError::invalid_key(
                "a key needs at least one segment",
            ));
        }
        if let Some(position) = parts.iter().position(String::is_empty) {
            return Err(CatalogueError::invalid_key(format!(
                "segment {position} of {parts:?} is empty"
            )));
        }
        Ok(())
    }

    /// Key for `name` directly below this key
    pub fn child(&self, name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(CatalogueError::invalid_key(format!(
                "cannot register an empty name below {self}"
            )));
        }
        let mut parts = self.0.clone();
        parts.push(name.to_string());
        Ok(Self(parts))
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment
    pub fn leaf(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// True when `prefix` matches the leading segments of this key (or all of it)
    pub fn starts_with(&self, prefix: &Key) -> bool {
        self.0.len() >= prefix.0.len() && self.0.iter().zip(&prefix.0).all(|(a, b)| a == b)
    }

    /// Segments left after removing `prefix`, or `None` when `prefix` does not match
    pub fn strip_prefix(&self, prefix: &Key) -> Option<&[String]> {
        if self.starts_with(prefix) {
            Some(&self.0[prefix.0.len()..])
        } else {
            None
        }
    }

    /// Segments joined with `separator`
    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{part:?}")?;
        }
        write!(f, ")")
    }
}

impl TryFrom<Vec<String>> for Key {
    type Error = CatalogueError;

    fn try_from(parts: Vec<String>) -> Result<Self> {
        Self::validate(&parts)?;
        Ok(Self(parts))
    }
}

impl TryFrom<&[&str]> for Key {
    type Error = CatalogueError;

    fn try_from(parts: &[&str]) -> Result<Self> {
        Self::new(parts.iter().copied())
    }
}

impl From<Key> for Vec<String> {
    fn from(key: Key) -> Self {
        key.0
    }
}
