//! Forgiving field deserializers.
//!
//! Client payloads are parsed JSON with no schema guarantee. A field with the
//! wrong shape becomes empty and a bad array entry is skipped, so one broken
//! record never rejects a whole sync.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use rollsync_types::Timestamp;

/// An array of `T`, skipping entries that do not parse. Non-arrays are empty.
pub(crate) fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(seq_from_value(value.unwrap_or(Value::Null)))
}

/// A stamp field that is present, including an explicit `null`.
///
/// Paired with `#[serde(default)]`, an absent field stays `None` while
/// `null` is kept and written back.
pub(crate) fn stamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    Timestamp::deserialize(deserializer).map(Some)
}

pub(crate) fn seq_from_value<T: DeserializeOwned>(value: Value) -> Vec<T> {
    let Value::Array(entries) = value else {
        return Vec::new();
    };
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed entry");
                None
            }
        })
        .collect()
}

/// A JSON object. Anything else is an empty object.
pub(crate) fn object<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => Ok(map),
        _ => Ok(Map::new()),
    }
}
