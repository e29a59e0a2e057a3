//! Resource identity: required fields and namespace checks.

use crate::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

/// Namespace used when a resource does not name a valid one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Longest namespace name the API server accepts.
const MAX_NAMESPACE_LEN: usize = 63;

static NAMESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("namespace pattern compiles"));

/// ResourceError is raised for resources that cannot be addressed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("resource object missing {field}")]
    MissingRequiredField { field: String },

    #[error("invalid resource object: {message}")]
    InvalidResource { message: String },
}

impl ResourceError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        ResourceError::MissingRequiredField { field: field.into() }
    }
}

/// Checks that `obj` carries `apiVersion`, `kind` and `metadata.name`.
///
/// Returns them in that order.
pub fn validate(obj: &Value) -> Result<(&str, &str, &str), ResourceError> {
    let map = obj.as_map().ok_or_else(|| ResourceError::InvalidResource {
        message: format!("expected a map, got {}", obj.type_name()),
    })?;
    if map.is_empty() {
        return Err(ResourceError::InvalidResource {
            message: "resource object is empty".to_string(),
        });
    }

    let api_version = obj
        .lookup(&["apiVersion"])
        .and_then(Value::as_str)
        .ok_or_else(|| ResourceError::missing_field("apiVersion"))?;
    let kind = obj
        .lookup(&["kind"])
        .and_then(Value::as_str)
        .ok_or_else(|| ResourceError::missing_field("kind"))?;
    let name = obj
        .lookup(&["metadata", "name"])
        .and_then(Value::as_str)
        .ok_or_else(|| ResourceError::missing_field("metadata.name"))?;

    Ok((api_version, kind, name))
}

/// Returns true if `ns` is a valid namespace name (an RFC 1123 label).
pub fn is_valid_namespace(ns: &str) -> bool {
    !ns.is_empty() && ns.len() <= MAX_NAMESPACE_LEN && NAMESPACE_PATTERN.is_match(ns)
}

/// Returns the resource's `metadata.namespace` when valid, else `default`.
pub fn check_namespace<'a>(obj: &'a Value, default: &'a str) -> &'a str {
    match obj.lookup(&["metadata", "namespace"]).and_then(Value::as_str) {
        Some(ns) if is_valid_namespace(ns) => ns,
        _ => default,
    }
}

/// ResourceRef identifies a single object on the API server.
///
/// Translating it into a request path is the transport's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub api_version: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl ResourceRef {
    /// Validates `obj` and resolves its namespace against `default_namespace`.
    pub fn from_object(obj: &Value, default_namespace: &str) -> Result<Self, ResourceError> {
        let (api_version, kind, name) = validate(obj)?;
        Ok(ResourceRef {
            api_version: api_version.to_string(),
            kind: kind.to_string(),
            namespace: check_namespace(obj, default_namespace).to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}/{}` ({})", self.kind, self.namespace, self.name, self.api_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_json;

    fn v(json: &str) -> Value {
        from_json(json).unwrap()
    }

    #[test]
    fn test_validate_complete_object() {
        let obj = v(r#"{"apiVersion": "v1", "kind": "Pod", "metadata": {"name": "web"}}"#);
        assert_eq!(validate(&obj).unwrap(), ("v1", "Pod", "web"));
    }

    #[test]
    fn test_validate_missing_fields() {
        let cases = [
            (r#"{"kind": "Pod", "metadata": {"name": "web"}}"#, "apiVersion"),
            (r#"{"apiVersion": "v1", "metadata": {"name": "web"}}"#, "kind"),
            (r#"{"apiVersion": "v1", "kind": "Pod"}"#, "metadata.name"),
            (r#"{"apiVersion": "v1", "kind": "Pod", "metadata": {"name": 3}}"#, "metadata.name"),
        ];
        for (json, field) in cases {
            assert_eq!(validate(&v(json)).unwrap_err(), ResourceError::missing_field(field));
        }
    }

    #[test]
    fn test_validate_rejects_non_objects() {
        assert!(matches!(
            validate(&v("{}")).unwrap_err(),
            ResourceError::InvalidResource { .. }
        ));
        assert!(matches!(
            validate(&v("[]")).unwrap_err(),
            ResourceError::InvalidResource { .. }
        ));
    }

    #[test]
    fn test_namespace_names() {
        assert!(is_valid_namespace("default"));
        assert!(is_valid_namespace("team-a1"));
        assert!(!is_valid_namespace(""));
        assert!(!is_valid_namespace("-team"));
        assert!(!is_valid_namespace("team-"));
        assert!(!is_valid_namespace("Team"));
        assert!(!is_valid_namespace(&"a".repeat(64)));
        assert!(is_valid_namespace(&"a".repeat(63)));
    }

    #[test]
    fn test_check_namespace_falls_back() {
        let obj = v(r#"{"metadata": {"name": "web", "namespace": "shop"}}"#);
        assert_eq!(check_namespace(&obj, DEFAULT_NAMESPACE), "shop");

        let obj = v(r#"{"metadata": {"name": "web", "namespace": "Not_Valid"}}"#);
        assert_eq!(check_namespace(&obj, DEFAULT_NAMESPACE), "default");

        let obj = v(r#"{"metadata": {"name": "web"}}"#);
        assert_eq!(check_namespace(&obj, "fallback"), "fallback");
    }

    #[test]
    fn test_resource_ref_from_object() {
        let obj = v(r#"{"apiVersion": "apps/v1", "kind": "Deployment", "metadata": {"name": "web", "namespace": "shop"}}"#);
        let r = ResourceRef::from_object(&obj, DEFAULT_NAMESPACE).unwrap();
        assert_eq!(r.namespace, "shop");
        assert_eq!(r.to_string(), "Deployment `shop/web` (apps/v1)");
    }
}
