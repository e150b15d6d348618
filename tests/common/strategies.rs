use catalogue::registry::Key;
use proptest::prelude::*;

/// Strategy for a single key segment
pub fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

/// Strategy for raw key parts, one to four segments
pub fn key_parts_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment_strategy(), 1..=4)
}

/// Strategy for valid keys
pub fn key_strategy() -> impl Strategy<Value = Key> {
    key_parts_strategy().prop_map(|parts| Key::new(parts).unwrap())
}

/// Strategy for small batches of keys drawn from a narrow alphabet so prefixes overlap
pub fn overlapping_keys_strategy() -> impl Strategy<Value = Vec<Key>> {
    prop::collection::vec(
        prop::collection::vec("[ab]{1,2}", 1..=3).prop_map(|parts| Key::new(parts).unwrap()),
        0..24,
    )
}

/// Strategy for dotted module paths used in plugin references
pub fn module_path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z_][a-z0-9_]{0,6}", 1..=3).prop_map(|parts| parts.join("."))
}
