//! Patch for the top-level `metadata` block.

use crate::compare::{collection_matches, UNORDERED_METADATA_FIELDS};
use crate::value::{Map, Value};

/// Value written into a patch to delete a field under merge-patch rules.
pub const REMOVAL_SENTINEL: Value = Value::Null;

/// Builds the patch that brings `server` labels and annotations to `local`.
///
/// There is no merge mode here: a collection that differs is replaced as a
/// whole, and a collection the server has but the local metadata lacks is
/// cleared explicitly, since a merge patch treats an absent key as "leave
/// unchanged". Other metadata fields are server-managed and ignored.
///
/// The result is non-empty exactly when [`crate::compare::metadata_matches`]
/// is false for the same pair.
pub fn metadata_patch(local: &Map, server: &Map) -> Map {
    let mut patch = Map::new();
    for field in UNORDERED_METADATA_FIELDS {
        let (local_value, server_value) = (local.get(field), server.get(field));
        if collection_matches(local_value, server_value) {
            continue;
        }
        let replacement = match local_value {
            Some(local_value) => replacement(local_value, server_value),
            None => REMOVAL_SENTINEL,
        };
        patch.set(*field, replacement);
    }
    patch
}

/// The local collection, plus removals for keys only the server map holds.
///
/// Merge patches merge maps key by key, so replacing a map whole needs the
/// stale server keys deleted explicitly.
fn replacement(local: &Value, server: Option<&Value>) -> Value {
    let (Value::Map(local_map), Some(Value::Map(server_map))) = (local, server) else {
        return local.clone();
    };
    let mut result = local_map.clone();
    for (key, _) in server_map.iter() {
        if !local_map.has(key) {
            result.set(key.clone(), REMOVAL_SENTINEL);
        }
    }
    Value::Map(result)
}
