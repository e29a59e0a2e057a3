//! Order-insensitive comparison of label and annotation collections.

use crate::value::{Map, Value};

/// Metadata fields compared as unordered collections of entries.
pub const UNORDERED_METADATA_FIELDS: &[&str] = &["labels", "annotations"];

/// Returns true if both collections hold the same entries.
///
/// Maps contribute their key/value pairs, lists their elements. A missing
/// server collection counts as empty.
pub fn same_entries(local: &Value, server: Option<&Value>) -> bool {
    entries(local) == server.map(entries).unwrap_or_default()
}

/// Returns true if the server collection already agrees with the local one.
///
/// A collection the local metadata leaves out only agrees with a server
/// collection that holds no entries.
pub fn collection_matches(local: Option<&Value>, server: Option<&Value>) -> bool {
    match local {
        Some(local) => same_entries(local, server),
        None => server.map_or(true, |server| entries(server).is_empty()),
    }
}

/// Returns true if labels and annotations of both metadata blocks agree.
pub fn metadata_matches(local: &Map, server: &Map) -> bool {
    UNORDERED_METADATA_FIELDS
        .iter()
        .all(|field| collection_matches(local.get(field), server.get(field)))
}

fn entries(value: &Value) -> Vec<Value> {
    let mut entries = match value {
        Value::Null => Vec::new(),
        Value::Map(m) => m
            .iter()
            .map(|(k, v)| Value::List(vec![Value::from(k.as_str()), v.clone()]))
            .collect(),
        Value::List(l) => l.clone(),
        scalar => vec![scalar.clone()],
    };
    entries.sort();
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_json;

    fn v(json: &str) -> Value {
        from_json(json).unwrap()
    }

    #[test]
    fn test_label_maps() {
        let labels = v(r#"{"app": "web", "tier": "frontend"}"#);
        assert!(same_entries(&labels, Some(&v(r#"{"tier": "frontend", "app": "web"}"#))));
        assert!(!same_entries(&labels, Some(&v(r#"{"app": "web", "tier": "backend"}"#))));
        assert!(!same_entries(&labels, None));
    }

    #[test]
    fn test_label_lists_ignore_order() {
        let labels = v(r#"[{"blah": "val"}, {"blah2": "val2"}]"#);
        assert!(same_entries(&labels, Some(&v(r#"[{"blah2": "val2"}, {"blah": "val"}]"#))));
        assert!(!same_entries(&labels, Some(&v(r#"[{"blah": "val"}]"#))));
    }

    #[test]
    fn test_empty_local_matches_missing_server() {
        assert!(same_entries(&v("{}"), None));
        assert!(same_entries(&v("[]"), None));
    }

    #[test]
    fn test_server_only_collections() {
        assert!(collection_matches(None, None));
        assert!(collection_matches(None, Some(&Value::Null)));
        assert!(collection_matches(None, Some(&v("{}"))));
        assert!(!collection_matches(None, Some(&v(r#"{"stale": "x"}"#))));
    }

    #[test]
    fn test_metadata_matches() {
        let local = v(r#"{"name": "web", "labels": {"app": "web"}}"#);
        let local = local.as_map().unwrap();
        let server = v(r#"{"name": "web", "uid": "1", "labels": {"app": "web"}}"#);
        assert!(metadata_matches(local, server.as_map().unwrap()));

        let server = v(r#"{"name": "web", "labels": {"app": "web", "tier": "x"}}"#);
        assert!(!metadata_matches(local, server.as_map().unwrap()));

        let server = v(r#"{"name": "web", "labels": {"app": "web"}, "annotations": {"a": "b"}}"#);
        assert!(!metadata_matches(local, server.as_map().unwrap()));
    }
}
