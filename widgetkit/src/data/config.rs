use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Configuration driving one widget instance.
///
/// An open key/value map. Values are primitives, arrays, or one level of
/// named nested groups (`lightMode`, `darkMode`, button records). Nested
/// values are addressed with dotted paths such as `lightMode.textColor`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(Map<String, Value>);

impl Config {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from a JSON object literal.
    ///
    /// Anything other than an object yields an empty configuration.
    pub fn from_object(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            other => {
                warn!("config literal is not an object: {other}");
                Self::default()
            }
        }
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Whether a top-level key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over top-level entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Resolve a dotted path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Resolve a dotted path to a string.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Resolve a dotted path to a boolean.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// Resolve a dotted path to an integer, truncating floats.
    pub fn get_i64(&self, path: &str) -> Option<i64> {
        let value = self.get(path)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f.trunc() as i64))
    }

    /// String at `path`, or `default` when missing or not a string.
    pub fn str_or<'a>(&'a self, path: &str, default: &'a str) -> &'a str {
        self.get_str(path).unwrap_or(default)
    }

    /// Boolean at `path`, or `default` when missing or not a boolean.
    pub fn bool_or(&self, path: &str, default: bool) -> bool {
        self.get_bool(path).unwrap_or(default)
    }

    /// Set the value at a dotted path.
    ///
    /// Missing intermediate groups are created. Returns `false` without
    /// changing anything when an intermediate segment holds a non-object.
    pub fn set(&mut self, path: &str, value: Value) -> bool {
        let mut parts: Vec<&str> = path.split('.').collect();
        let Some(last) = parts.pop() else {
            return false;
        };

        let mut current = &mut self.0;
        for part in parts {
            let entry = current
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            match entry {
                Value::Object(map) => current = map,
                _ => {
                    warn!("cannot set '{path}': '{part}' is not a group");
                    return false;
                }
            }
        }
        current.insert(last.to_string(), value);
        true
    }

    /// Shallow-merge `patch` into the group at `path`.
    ///
    /// Sibling keys of the group survive. A missing or non-object value at
    /// `path` is replaced by the patch.
    pub fn merge(&mut self, path: &str, patch: &Map<String, Value>) -> bool {
        let mut merged = match self.get(path) {
            Some(Value::Object(existing)) => existing.clone(),
            _ => Map::new(),
        };
        for (key, value) in patch {
            merged.insert(key.clone(), value.clone());
        }
        self.set(path, Value::Object(merged))
    }
}

impl From<Map<String, Value>> for Config {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Config {
    type Error = DecodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(DecodeError::NotAnObject),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Config {
        Config::from_object(json!({
            "title": "Hi",
            "count": 3,
            "lightMode": { "textColor": "#111111", "backgroundColor": "#ffffff" }
        }))
    }

    #[test]
    fn test_get_nested_path() {
        let config = sample();
        assert_eq!(config.get_str("lightMode.textColor"), Some("#111111"));
        assert_eq!(config.get_i64("count"), Some(3));
        assert!(config.get("lightMode.missing").is_none());
        assert!(config.get("title.inner").is_none());
    }

    #[test]
    fn test_set_nested_keeps_siblings() {
        let mut config = sample();
        assert!(config.set("lightMode.textColor", json!("#222222")));
        assert_eq!(config.get_str("lightMode.textColor"), Some("#222222"));
        assert_eq!(config.get_str("lightMode.backgroundColor"), Some("#ffffff"));
    }

    #[test]
    fn test_set_through_primitive_is_rejected() {
        let mut config = sample();
        assert!(!config.set("title.color", json!("red")));
        assert_eq!(config.get_str("title"), Some("Hi"));
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut config = sample();
        let patch = json!({ "textColor": "#333333" });
        assert!(config.merge("lightMode", patch.as_object().unwrap()));
        assert_eq!(config.get_str("lightMode.textColor"), Some("#333333"));
        assert_eq!(config.get_str("lightMode.backgroundColor"), Some("#ffffff"));
    }

    #[test]
    fn test_try_from_non_object() {
        assert!(Config::try_from(json!([1, 2])).is_err());
    }
}
