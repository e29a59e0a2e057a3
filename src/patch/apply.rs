//! Local application of a patch tree, following JSON merge-patch rules.

use crate::value::{Map, Value};

/// Applies `patch` to `target` and returns the result.
///
/// Maps merge key by key, a `null` patch value removes the key, and any
/// other value (including lists) replaces the target value.
pub fn apply_merge_patch(target: &Value, patch: &Value) -> Value {
    let Value::Map(patch_map) = patch else {
        return patch.clone();
    };

    let mut result = match target {
        Value::Map(m) => m.clone(),
        _ => Map::new(),
    };
    for (key, patch_value) in patch_map.iter() {
        if patch_value.is_null() {
            result.delete(key);
            continue;
        }
        let merged = match result.get(key) {
            Some(existing) => apply_merge_patch(existing, patch_value),
            None => apply_merge_patch(&Value::Null, patch_value),
        };
        result.set(key.clone(), merged);
    }
    Value::Map(result)
}
