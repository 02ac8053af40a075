//! Field overlay merge.

use serde_json::{Map, Value};

use rollsync_types::Timestamp;

use crate::document::SettingsDocument;

/// `{ ...local, ...remote }`.
///
/// Fields of `remote` replace same-named fields of `local`; fields present on
/// only one side are kept. Key order is local first, then remote-only keys.
pub fn overlay(local: &Map<String, Value>, remote: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = local.clone();
    for (key, value) in remote {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Merge two settings documents, remote winning per key, stamped `now`.
pub fn merge_settings(
    local: Option<&SettingsDocument>,
    remote: Option<&SettingsDocument>,
    now: &Timestamp,
) -> SettingsDocument {
    let empty = Map::new();
    let local = local.map(|d| &d.values).unwrap_or(&empty);
    let remote = remote.map(|d| &d.values).unwrap_or(&empty);
    SettingsDocument {
        values: overlay(local, remote),
        last_modified: Some(now.clone()),
    }
}
