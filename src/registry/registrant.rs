//! # Registrants
//!
//! Values stored in the registry. A `Registrant` is a type-erased, shared handle to
//! whatever was registered (a function pointer, a closure, a type's constructor, a
//! plain value) together with where it came from.
//!
//! Rust has no runtime reflection for source positions or doc comments, so origin
//! metadata is captured at the registration site: `#[track_caller]` gives file and
//! line, and the [`registrant!`](crate::registrant) macro adds the module path, an
//! absolute file path and an optional doc string. Anything not captured is `None`.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a registrant was defined
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    pub module: Option<String>,
    pub file: Option<PathBuf>,
    pub line_no: Option<u32>,
    pub docstring: Option<String>,
}

impl Origin {
    /// Origin captured by the `registrant!` macro
    ///
    /// `file` is resolved against `manifest_dir` when it is relative.
    pub fn at(module: &str, file: &str, line: u32, manifest_dir: &str) -> Self {
        let file = Path::new(file);
        let file = if file.is_absolute() {
            file.to_path_buf()
        } else {
            Path::new(manifest_dir).join(file)
        };
        Self {
            module: Some(module.to_string()),
            file: Some(file),
            line_no: Some(line),
            docstring: None,
        }
    }

    /// Origin from a `#[track_caller]` location; the module is unknown
    pub fn from_location(location: &Location<'_>) -> Self {
        Self {
            module: None,
            file: Some(PathBuf::from(location.file())),
            line_no: Some(location.line()),
            docstring: None,
        }
    }

    /// True when nothing about the origin is known
    pub fn is_unknown(&self) -> bool {
        self.module.is_none()
            && self.file.is_none()
            && self.line_no.is_none()
            && self.docstring.is_none()
    }
}

/// A registered value
#[derive(Clone)]
pub struct Registrant {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
    origin: Origin,
}

impl Registrant {
    /// Wrap a value with no origin information
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
            origin: Origin::default(),
        }
    }

    /// Wrap a value, recording the caller's file and line
    #[track_caller]
    pub fn located<T: Any + Send + Sync>(value: T) -> Self {
        Self::new(value).with_origin(Origin::from_location(Location::caller()))
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Attach a documentation string; surrounding whitespace is trimmed
    pub fn with_doc<D: Into<String>>(mut self, doc: D) -> Self {
        self.origin.docstring = Some(doc.into().trim().to_string());
        self
    }

    /// Fill in file and line from `location` when no origin was recorded
    pub(crate) fn or_located(mut self, location: &Location<'_>) -> Self {
        if self.origin.file.is_none() {
            let located = Origin::from_location(location);
            self.origin.file = located.file;
            self.origin.line_no = located.line_no;
        }
        self
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Shared handle to the value when it is a `T`
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// True when both handles point at the same registered value
    pub fn ptr_eq(&self, other: &Registrant) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Introspection record used by `Namespace::find`
    pub fn info(&self) -> RegistrantInfo {
        RegistrantInfo {
            module: self.origin.module.clone(),
            file: self.origin.file.clone(),
            line_no: self.origin.line_no,
            docstring: self.origin.docstring.clone(),
            type_name: self.type_name.to_string(),
        }
    }
}

impl fmt::Debug for Registrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registrant")
            .field("type_name", &self.type_name)
            .field("origin", &self.origin)
            .finish()
    }
}

/// Introspection metadata about a registered value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrantInfo {
    pub module: Option<String>,
    pub file: Option<PathBuf>,
    pub line_no: Option<u32>,
    pub docstring: Option<String>,
    pub type_name: String,
}

/// Build a [`Registrant`] that records the calling module, source file and line.
///
/// ```
/// use catalogue::registrant;
///
/// fn tokenize(text: &str) -> Vec<&str> {
///     text.split_whitespace().collect()
/// }
///
/// let plain = registrant!(tokenize as fn(&str) -> Vec<&str>);
/// let documented = registrant!(tokenize as fn(&str) -> Vec<&str>, doc = "Split on whitespace.");
/// assert!(plain.origin().line_no.is_some());
/// assert_eq!(documented.origin().docstring.as_deref(), Some("Split on whitespace."));
/// ```
#[macro_export]
macro_rules! registrant {
    ($value:expr, doc = $doc:expr $(,)?) => {
        $crate::registrant!($value).with_doc($doc)
    };
    ($value:expr $(,)?) => {
        $crate::registry::Registrant::new($value).with_origin($crate::registry::Origin::at(
            module_path!(),
            file!(),
            line!(),
            env!("CARGO_MANIFEST_DIR"),
        ))
    };
}
