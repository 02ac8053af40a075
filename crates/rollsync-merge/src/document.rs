//! Document shapes, one per [`MergePolicy`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use rollsync_types::{MergePolicy, Stamped, Timestamp};

use crate::attendance::MonthDocument;
use crate::lenient;
use crate::record::Record;

/// Flat key/value settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsDocument {
    #[serde(flatten)]
    pub values: Map<String, Value>,
    #[serde(rename = "lastModified", default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
}

/// A list of records merged by `id`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionDocument {
    #[serde(default, deserialize_with = "lenient::seq")]
    pub items: Vec<Record>,
    #[serde(rename = "lastModified", default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
}

impl CollectionDocument {
    /// Records carrying a tombstone.
    pub fn deleted(&self) -> impl Iterator<Item = &Record> {
        self.items.iter().filter(|r| r.is_deleted())
    }

    /// Records without a tombstone.
    pub fn live(&self) -> impl Iterator<Item = &Record> {
        self.items.iter().filter(|r| !r.is_deleted())
    }
}

/// Any stored document.
///
/// Deserialization needs to know the policy up front (a settings document
/// and a month document are both plain objects), so documents are built
/// with [`Document::from_value`] rather than `Deserialize`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Settings(SettingsDocument),
    Collection(CollectionDocument),
    Month(MonthDocument),
}

impl Document {
    /// An empty document of the given shape, with no `lastModified`.
    pub fn empty(policy: MergePolicy) -> Self {
        match policy {
            MergePolicy::Overlay => Self::Settings(SettingsDocument::default()),
            MergePolicy::KeyedList => Self::Collection(CollectionDocument::default()),
            MergePolicy::Month => Self::Month(MonthDocument::default()),
        }
    }

    /// Parse a JSON value as a document of the given shape.
    ///
    /// Never fails: a value that is not an object becomes an empty document,
    /// and malformed entries inside it are skipped.
    pub fn from_value(policy: MergePolicy, value: Value) -> Self {
        if !value.is_object() {
            tracing::warn!(%policy, "document is not a JSON object; treating as empty");
            return Self::empty(policy);
        }
        let parsed = match policy {
            MergePolicy::Overlay => serde_json::from_value(value).map(Self::Settings),
            MergePolicy::KeyedList => serde_json::from_value(value).map(Self::Collection),
            MergePolicy::Month => serde_json::from_value(value).map(Self::Month),
        };
        parsed.unwrap_or_else(|e| {
            tracing::warn!(%policy, error = %e, "malformed document; treating as empty");
            Self::empty(policy)
        })
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn policy(&self) -> MergePolicy {
        match self {
            Self::Settings(_) => MergePolicy::Overlay,
            Self::Collection(_) => MergePolicy::KeyedList,
            Self::Month(_) => MergePolicy::Month,
        }
    }

    pub fn last_modified(&self) -> Option<&Timestamp> {
        match self {
            Self::Settings(d) => d.last_modified.as_ref(),
            Self::Collection(d) => d.last_modified.as_ref(),
            Self::Month(d) => d.last_modified.as_ref(),
        }
    }

    pub fn as_settings(&self) -> Option<&SettingsDocument> {
        match self {
            Self::Settings(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&CollectionDocument> {
        match self {
            Self::Collection(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_month(&self) -> Option<&MonthDocument> {
        match self {
            Self::Month(d) => Some(d),
            _ => None,
        }
    }
}

impl From<SettingsDocument> for Document {
    fn from(d: SettingsDocument) -> Self {
        Self::Settings(d)
    }
}

impl From<CollectionDocument> for Document {
    fn from(d: CollectionDocument) -> Self {
        Self::Collection(d)
    }
}

impl From<MonthDocument> for Document {
    fn from(d: MonthDocument) -> Self {
        Self::Month(d)
    }
}
