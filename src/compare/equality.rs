//! Structural equality between a desired tree and a server tree.

use super::error::CompareError;
use super::metadata::{metadata_matches, UNORDERED_METADATA_FIELDS};
use crate::fieldpath::Path;
use crate::value::{Map, Value};
use tracing::trace;

/// Fields owned by the server that never take part in a comparison.
pub const IGNORED_FIELDS: &[&str] = &["status"];

/// Compares two whole resources, ignoring their `status`.
///
/// Labels and annotations are compared as entry sets through
/// [`metadata_matches`], so a collection only the server carries is a
/// difference. Everything else follows [`equal`]. Neither input is modified.
pub fn equal_spec(local: &Value, server: &Value) -> Result<bool, CompareError> {
    let local = strip_ignored(local);
    let server = strip_ignored(server);
    let (Some(local_map), Some(server_map)) = (local.as_map(), server.as_map()) else {
        return equal(&local, &server);
    };
    let Some(Value::Map(local_metadata)) = local_map.get("metadata") else {
        return equal(&local, &server);
    };

    let empty = Map::new();
    let server_metadata = match server_map.get("metadata") {
        None => &empty,
        Some(Value::Map(m)) => m,
        Some(other) => {
            return Err(CompareError::type_mismatch(
                &Path::new().field("metadata"),
                "map",
                other.type_name(),
            ))
        }
    };
    if !metadata_matches(local_metadata, server_metadata) {
        trace!("labels or annotations differ");
        return Ok(false);
    }

    let mut rest = local_map.clone();
    let remainder = local_metadata.without(UNORDERED_METADATA_FIELDS);
    if remainder.is_empty() && !local_metadata.is_empty() {
        rest.delete("metadata");
    } else {
        rest.set("metadata", Value::Map(remainder));
    }
    if rest.is_empty() {
        return Ok(true);
    }
    equal(&Value::Map(rest), &server)
}

/// Compares `local` against `server` structurally.
///
/// The comparison is driven by the local tree: keys present only on the
/// server are not divergence, except that an empty local map only equals an
/// empty server map. Lists are compared without regard to order.
pub fn equal(local: &Value, server: &Value) -> Result<bool, CompareError> {
    equal_at(local, server, &Path::new())
}

pub(crate) fn strip_ignored(value: &Value) -> Value {
    match value {
        Value::Map(m) => Value::Map(m.without(IGNORED_FIELDS)),
        other => other.clone(),
    }
}

pub(crate) fn equal_at(local: &Value, server: &Value, path: &Path) -> Result<bool, CompareError> {
    match local {
        Value::List(local_items) => {
            let server_items = server
                .as_list()
                .ok_or_else(|| CompareError::type_mismatch(path, "list", server.type_name()))?;
            equal_lists(local_items, server_items, path)
        }
        Value::Map(local_map) => {
            let server_map = server
                .as_map()
                .ok_or_else(|| CompareError::type_mismatch(path, "map", server.type_name()))?;
            equal_maps(local_map, server_map, path)
        }
        scalar => {
            if !server.is_scalar() {
                return Err(CompareError::type_mismatch(path, scalar.type_name(), server.type_name()));
            }
            Ok(scalar == server)
        }
    }
}

/// Compares two lists as unordered collections.
///
/// Lists without map elements are compared as sorted multisets. Lists that
/// hold maps are matched pairwise, each server element being consumed by at
/// most one local element.
pub(crate) fn equal_lists(local: &[Value], server: &[Value], path: &Path) -> Result<bool, CompareError> {
    if local.iter().any(Value::is_map) {
        return match_unordered(local, server, path);
    }

    let mut local_sorted = local.to_vec();
    let mut server_sorted = server.to_vec();
    local_sorted.sort();
    server_sorted.sort();
    let same = local_sorted == server_sorted;
    if !same {
        trace!(path = %path, "scalar lists differ");
    }
    Ok(same)
}

fn match_unordered(local: &[Value], server: &[Value], path: &Path) -> Result<bool, CompareError> {
    if local.len() != server.len() {
        trace!(path = %path, local = local.len(), server = server.len(), "list lengths differ");
        return Ok(false);
    }

    let mut consumed = vec![false; server.len()];
    for (i, item) in local.iter().enumerate() {
        match find_match(item, server, &consumed, &path.index(i))? {
            Some(j) => consumed[j] = true,
            None => {
                trace!(path = %path.index(i), "no matching element on server");
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Returns the position of the first unconsumed candidate equal to `item`.
///
/// A candidate that cannot be compared with `item` is skipped; its error is
/// only reported when no other candidate matches.
pub(crate) fn find_match(
    item: &Value,
    candidates: &[Value],
    consumed: &[bool],
    path: &Path,
) -> Result<Option<usize>, CompareError> {
    let mut first_error = None;
    for (j, candidate) in candidates.iter().enumerate() {
        if consumed.get(j).copied().unwrap_or(false) {
            continue;
        }
        match equal_at(item, candidate, path) {
            Ok(true) => return Ok(Some(j)),
            Ok(false) => {}
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(None),
    }
}

fn equal_maps(local: &Map, server: &Map, path: &Path) -> Result<bool, CompareError> {
    if local.is_empty() {
        return Ok(server.is_empty());
    }

    for (key, local_value) in local.iter() {
        let Some(server_value) = server.get(key) else {
            trace!(path = %path.field(key), "field missing on server");
            return Ok(false);
        };
        if !equal_at(local_value, server_value, &path.field(key))? {
            return Ok(false);
        }
    }
    Ok(true)
}
