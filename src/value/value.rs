//! Resource tree values and their JSON/YAML codecs.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Value is one node of a resource tree: a scalar, a sequence or a mapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
}

/// Map is a string-keyed mapping node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Map {
    pub fields: BTreeMap<String, Value>,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Returns true for every variant that is neither a list nor a map.
    pub fn is_scalar(&self) -> bool {
        !self.is_list() && !self.is_map()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Looks up a nested map field by a sequence of keys.
    pub fn lookup(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .try_fold(self, |current, key| current.as_map()?.get(key))
    }

    /// Emptiness in the patch sense: null, an empty list or an empty map.
    pub fn is_empty_patch(&self) -> bool {
        match self {
            Value::Null => true,
            Value::List(l) => l.is_empty(),
            Value::Map(m) => m.is_empty(),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b).is_eq(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        fn type_order(v: &Value) -> u8 {
            match v {
                Value::Null => 0,
                Value::Bool(_) => 1,
                Value::Int(_) => 2,
                Value::Float(_) => 3,
                Value::String(_) => 4,
                Value::List(_) => 5,
                Value::Map(_) => 6,
            }
        }

        let type_cmp = type_order(self).cmp(&type_order(other));
        if type_cmp != Ordering::Equal {
            return type_cmp;
        }

        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a.cmp(b),
            (Value::Map(a), Value::Map(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for Map {}

impl PartialOrd for Map {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Map {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fields.cmp(&other.fields)
    }
}

impl Map {
    pub fn new() -> Self {
        Map {
            fields: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Returns a copy of this map without the given top-level keys.
    pub fn without(&self, keys: &[&str]) -> Map {
        self.iter()
            .filter(|(k, _)| !keys.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Map {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Parse a value from JSON.
pub fn from_json(json: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize a value to JSON.
pub fn to_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Serialize a value to indented JSON.
pub fn to_json_pretty(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Parse a value from YAML.
pub fn from_yaml(yaml: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Parse the first document of a YAML stream, ignoring the rest.
///
/// An empty stream yields [`Value::Null`].
pub fn from_yaml_first(yaml: &str) -> Result<Value, serde_yaml::Error> {
    match serde_yaml::Deserializer::from_str(yaml).next() {
        Some(document) => Value::deserialize(document),
        None => Ok(Value::Null),
    }
}

/// Serialize a value to YAML.
pub fn to_yaml(value: &Value) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kinds() {
        assert!(Value::Null.is_null());
        assert!(Value::Null.is_scalar());
        assert!(Value::Int(42).is_scalar());
        assert!(Value::List(vec![]).is_list());
        assert!(Value::Map(Map::new()).is_map());
        assert!(!Value::Map(Map::new()).is_scalar());
    }

    #[test]
    fn test_value_equality_is_type_strict() {
        assert_eq!(Value::Int(1), Value::Int(1));
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::String("1".into()), Value::Int(1));
    }

    #[test]
    fn test_value_ordering_sorts_by_type_then_value() {
        let mut values = vec![
            Value::String("b".into()),
            Value::Int(3),
            Value::String("a".into()),
            Value::Null,
            Value::Int(1),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Int(1),
                Value::Int(3),
                Value::String("a".into()),
                Value::String("b".into()),
            ]
        );
    }

    #[test]
    fn test_map_operations() {
        let mut map = Map::new();
        assert!(map.is_empty());

        map.set("key", Value::from("value"));
        assert!(map.has("key"));
        assert_eq!(map.get("key"), Some(&Value::from("value")));

        map.delete("key");
        assert!(!map.has("key"));
    }

    #[test]
    fn test_map_without_leaves_original_intact() {
        let mut map = Map::new();
        map.set("spec", Value::Int(1));
        map.set("status", Value::Int(2));

        let stripped = map.without(&["status"]);
        assert!(!stripped.has("status"));
        assert!(stripped.has("spec"));
        assert!(map.has("status"));
    }

    #[test]
    fn test_lookup_nested() {
        let value = from_json(r#"{"metadata": {"name": "web"}}"#).unwrap();
        assert_eq!(value.lookup(&["metadata", "name"]), Some(&Value::from("web")));
        assert_eq!(value.lookup(&["metadata", "namespace"]), None);
        assert_eq!(value.lookup(&["metadata", "name", "x"]), None);
    }

    #[test]
    fn test_json_numbers_keep_their_type() {
        let value = from_json(r#"{"replicas": 3, "ratio": 0.5}"#).unwrap();
        assert_eq!(value.lookup(&["replicas"]), Some(&Value::Int(3)));
        assert_eq!(value.lookup(&["ratio"]), Some(&Value::Float(0.5)));
    }

    #[test]
    fn test_yaml_manifest_parses() {
        let yaml = "apiVersion: v1\nkind: Pod\nmetadata:\n  name: web\n  labels:\n    app: web\n";
        let value = from_yaml(yaml).unwrap();
        assert_eq!(value.lookup(&["kind"]), Some(&Value::from("Pod")));
        assert_eq!(
            value.lookup(&["metadata", "labels", "app"]),
            Some(&Value::from("web"))
        );
        let back = from_json(&to_json(&value).unwrap()).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_yaml_first_document() {
        let yaml = "kind: Service\n---\nkind: Deployment\n";
        let value = from_yaml_first(yaml).unwrap();
        assert_eq!(value.lookup(&["kind"]), Some(&Value::from("Service")));
        assert!(from_yaml(yaml).is_err());
    }

    #[test]
    fn test_nan_equals_itself() {
        let value = from_yaml("ratio: .nan\n").unwrap();
        assert!(matches!(value.lookup(&["ratio"]), Some(Value::Float(f)) if f.is_nan()));
        assert_eq!(value, value.clone());
        assert_eq!(value.cmp(&value.clone()), Ordering::Equal);
    }
}
