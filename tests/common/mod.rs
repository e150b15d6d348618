#![allow(dead_code)]

pub mod fake_source;
pub mod strategies;

pub use fake_source::*;
pub use strategies::*;

use catalogue::registry::Registrant;
use parking_lot::{Mutex, MutexGuard};
use std::collections::BTreeMap;

/// Serializes tests that touch the process-default store and plugin registry
static GLOBAL_REGISTRY_LOCK: Mutex<()> = parking_lot::const_mutex(());

/// Take the global registry lock and start from an empty registry
pub fn lock_global_registry() -> MutexGuard<'static, ()> {
    let guard = GLOBAL_REGISTRY_LOCK.lock();
    catalogue::test_utils::setup_test_environment();
    catalogue::test_utils::reset_global_registry();
    guard
}

/// Owned remainder path, as used for `Namespace::get_all` keys
pub fn remainder(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}

/// The remainder keys of a `Namespace::get_all` result, in order
pub fn remainders(all: &BTreeMap<Vec<String>, Registrant>) -> Vec<Vec<String>> {
    all.keys().cloned().collect()
}
