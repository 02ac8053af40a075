use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A record identifier as it appears in `id` / `workerIds`.
///
/// Keys compare by exact JSON value: the number `1` and the string `"1"`
/// are different keys, and no normalization (trimming, case folding) is
/// applied.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordKey {
    Number(Number),
    Text(String),
}

impl RecordKey {
    /// Read a key from a JSON value. Only numbers and strings are keys.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::Number(n.clone()),
            Self::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordKey {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<i32> for RecordKey {
    fn from(n: i32) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for RecordKey {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Anything with a unique identifier within its collection.
pub trait Keyed {
    type Key: Eq + Hash + Clone;

    fn key(&self) -> &Self::Key;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_and_string_are_distinct() {
        assert_ne!(RecordKey::from(1), RecordKey::from("1"));
    }

    #[test]
    fn from_value_accepts_scalars_only() {
        assert_eq!(RecordKey::from_value(&json!(7)), Some(RecordKey::from(7)));
        assert_eq!(RecordKey::from_value(&json!("w7")), Some(RecordKey::from("w7")));
        assert_eq!(RecordKey::from_value(&json!(null)), None);
        assert_eq!(RecordKey::from_value(&json!({"id": 1})), None);
    }

    #[test]
    fn serde_untagged() {
        let keys: Vec<RecordKey> = serde_json::from_value(json!([1, "a"])).unwrap();
        assert_eq!(keys, vec![RecordKey::from(1), RecordKey::from("a")]);
        assert_eq!(serde_json::to_value(&keys).unwrap(), json!([1, "a"]));
    }

    #[test]
    fn display() {
        assert_eq!(RecordKey::from(42).to_string(), "42");
        assert_eq!(RecordKey::from("g1").to_string(), "g1");
    }
}
