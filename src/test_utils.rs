//! # Test Utilities
//!
//! Helpers for tests that touch the process-default store and plugin registry.

use crate::registry::{ExportTable, ManifestPluginSource, PluginRegistry, Store};
use std::env;
use std::sync::Arc;

/// Setup test environment variables if they're not already present
pub fn setup_test_environment() {
    if env::var("CATALOGUE_ENV").is_err() {
        env::set_var("CATALOGUE_ENV", "test");
    }
}

/// Return the process-default registry state to empty.
///
/// Clears the global store and export table, and points the global plugin registry
/// at an empty manifest source. Callers sharing the globals must serialize
/// themselves around this.
pub fn reset_global_registry() {
    Store::global().clear();
    ExportTable::global().clear();
    PluginRegistry::global().set_source(Arc::new(ManifestPluginSource::empty(
        ExportTable::global().clone(),
    )));
}
