//! Patch construction from a desired tree and a server tree.

use super::error::PatchError;
use super::metadata::metadata_patch;
use super::mode::MergeMode;
use crate::compare::{equal_at, find_match, CompareError, IGNORED_FIELDS};
use crate::fieldpath::Path;
use crate::value::{Map, Value};
use tracing::debug;

/// Forms the patch to send so that `server` converges on `local`.
///
/// `status` is ignored on both sides and `metadata` is reconciled through
/// [`metadata_patch`]. Every other local field that is new or differs
/// appears in the result; nested maps that differ anywhere are written out
/// whole. `mode` only affects list fields. An empty map means nothing needs
/// to change.
pub fn form_patch(local: &Value, server: &Value, mode: MergeMode) -> Result<Value, PatchError> {
    let root = Path::new();
    let local_map = local
        .as_map()
        .ok_or_else(|| CompareError::type_mismatch(&root, "map", local.type_name()))?;
    let server_map = server
        .as_map()
        .ok_or_else(|| CompareError::type_mismatch(&root, "map", server.type_name()))?;

    let empty = Map::new();
    let local_metadata = local_map.get("metadata").and_then(Value::as_map).unwrap_or(&empty);
    let server_metadata = server_map.get("metadata").and_then(Value::as_map).unwrap_or(&empty);

    let mut patch = Map::new();
    let metadata = metadata_patch(local_metadata, server_metadata);
    if !metadata.is_empty() {
        patch.set("metadata", Value::Map(metadata));
    }

    let local_fields = local_map
        .iter()
        .filter(|(key, _)| key.as_str() != "metadata" && !IGNORED_FIELDS.contains(&key.as_str()));
    for (key, local_value) in local_fields {
        match server_map.get(key) {
            None => patch.set(key.clone(), local_value.clone()),
            Some(server_value) => {
                if let Some(delta) = patch_value(local_value, server_value, mode, &root.field(key))? {
                    patch.set(key.clone(), delta);
                }
            }
        }
    }

    debug!(%mode, fields = patch.len(), "formed patch");
    Ok(Value::Map(patch))
}

/// Like [`form_patch`], with the mode given by name.
///
/// An unknown mode fails before either tree is inspected.
pub fn form_patch_str(local: &Value, server: &Value, mode: &str) -> Result<Value, PatchError> {
    let mode: MergeMode = mode.parse()?;
    form_patch(local, server, mode)
}

/// Reconciles one list field according to `mode`.
///
/// In replace mode this is always the full local list. In append mode,
/// scalar lists become the server list followed by the local elements it
/// lacks (empty when the two sets already coincide), and lists of maps become
/// the server list followed by every local element without an equal
/// counterpart on the server.
pub fn patch_list(local: &[Value], server: &[Value], mode: MergeMode) -> Result<Vec<Value>, PatchError> {
    patch_list_at(local, server, mode, &Path::new())
}

fn patch_list_at(
    local: &[Value],
    server: &[Value],
    mode: MergeMode,
    path: &Path,
) -> Result<Vec<Value>, PatchError> {
    if mode == MergeMode::Replace {
        return Ok(local.to_vec());
    }
    if local.is_empty() {
        return Ok(server.to_vec());
    }

    if !local.iter().any(Value::is_map) {
        let mut local_sorted = local.to_vec();
        let mut server_sorted = server.to_vec();
        local_sorted.sort();
        local_sorted.dedup();
        server_sorted.sort();
        server_sorted.dedup();
        if local_sorted == server_sorted {
            return Ok(Vec::new());
        }

        let mut union = server.to_vec();
        for item in local {
            if !union.contains(item) {
                union.push(item.clone());
            }
        }
        return Ok(union);
    }

    let mut merged = server.to_vec();
    for (i, item) in local.iter().enumerate() {
        if find_match(item, server, &[], &path.index(i))?.is_none() {
            merged.push(item.clone());
        }
    }
    Ok(merged)
}

/// Returns the patch entry for a field present on both sides, if any.
fn patch_value(
    local: &Value,
    server: &Value,
    mode: MergeMode,
    path: &Path,
) -> Result<Option<Value>, PatchError> {
    match local {
        Value::List(local_items) => {
            let server_items = server
                .as_list()
                .ok_or_else(|| CompareError::type_mismatch(path, "list", server.type_name()))?;
            if equal_at(local, server, path)? {
                return Ok(None);
            }

            let delta = Value::List(patch_list_at(local_items, server_items, mode, path)?);
            if mode == MergeMode::Append && (delta.is_empty_patch() || equal_at(&delta, server, path)?) {
                return Ok(None);
            }
            Ok(Some(delta))
        }
        Value::Map(local_map) => {
            let server_map = server
                .as_map()
                .ok_or_else(|| CompareError::type_mismatch(path, "map", server.type_name()))?;
            for (key, local_value) in local_map.iter() {
                let changed = match server_map.get(key) {
                    None => true,
                    Some(server_value) => {
                        patch_value(local_value, server_value, mode, &path.field(key))?.is_some()
                    }
                };
                if changed {
                    return Ok(Some(local.clone()));
                }
            }
            Ok(None)
        }
        scalar => {
            if !server.is_scalar() {
                return Err(
                    CompareError::type_mismatch(path, scalar.type_name(), server.type_name()).into(),
                );
            }
            if scalar == server {
                Ok(None)
            } else {
                Ok(Some(scalar.clone()))
            }
        }
    }
}
