//! Record shapes the merge engine understands.
//!
//! Only the fields that drive merging are typed. Everything else a client
//! sends is carried verbatim in `fields` and written back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use rollsync_types::{Keyed, RecordKey, Stamped, Timestamp};

use crate::lenient;

/// A flat-list entity: worker, area, activity, or group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordKey,
    #[serde(
        rename = "modifiedAt",
        default,
        deserialize_with = "lenient::stamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub modified_at: Option<Timestamp>,
    /// `Some(null)` when the client sent `"deletedAt": null`; not a tombstone.
    #[serde(
        rename = "deletedAt",
        default,
        deserialize_with = "lenient::stamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_at: Option<Timestamp>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<RecordKey>) -> Self {
        Self {
            id: id.into(),
            modified_at: None,
            deleted_at: None,
            fields: Map::new(),
        }
    }

    pub fn modified(mut self, at: impl Into<Timestamp>) -> Self {
        self.modified_at = Some(at.into());
        self
    }

    pub fn deleted(mut self, at: impl Into<Timestamp>) -> Self {
        self.deleted_at = Some(at.into());
        self
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl Keyed for Record {
    type Key = RecordKey;

    fn key(&self) -> &RecordKey {
        &self.id
    }
}

impl Stamped for Record {
    fn modified_at(&self) -> Option<&Timestamp> {
        self.modified_at.as_ref()
    }

    fn deleted_at(&self) -> Option<&Timestamp> {
        self.deleted_at.as_ref()
    }
}

/// An attendance group inside a month document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: RecordKey,
    /// Member workers. A set: duplicates collapse on merge.
    #[serde(rename = "workerIds", default, deserialize_with = "lenient::seq")]
    pub worker_ids: Vec<RecordKey>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub days: Vec<Day>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Group {
    pub fn new(id: impl Into<RecordKey>) -> Self {
        Self {
            id: id.into(),
            worker_ids: Vec::new(),
            days: Vec::new(),
            fields: Map::new(),
        }
    }

    pub fn day(&self, date: &str) -> Option<&Day> {
        self.days.iter().find(|d| d.date == date)
    }
}

impl Keyed for Group {
    type Key = RecordKey;

    fn key(&self) -> &RecordKey {
        &self.id
    }
}

/// One calendar date of attendance within a group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub date: String,
    /// Worker id to attendance value. Values are opaque.
    #[serde(default, deserialize_with = "lenient::object")]
    pub attendance: Map<String, Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Day {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            attendance: Map::new(),
            fields: Map::new(),
        }
    }

    pub fn mark(mut self, worker: impl ToString, value: impl Into<Value>) -> Self {
        self.attendance.insert(worker.to_string(), value.into());
        self
    }
}

impl Keyed for Day {
    type Key = String;

    fn key(&self) -> &String {
        &self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_keeps_unknown_fields() {
        let raw = json!({"id": 1, "name": "Ana", "modifiedAt": "2024-01-01T00:00:00Z", "areaId": "a3"});
        let rec: Record = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(rec.id, RecordKey::from(1));
        assert_eq!(rec.field("name"), Some(&json!("Ana")));
        assert!(rec.deleted_at.is_none());
        assert_eq!(serde_json::to_value(&rec).unwrap(), raw);
    }

    #[test]
    fn explicit_null_stamps_survive_and_are_not_tombstones() {
        let raw = json!({"id": 1, "deletedAt": null, "name": "a"});
        let rec: Record = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(rec.deleted_at, Some(Timestamp::from_value(Value::Null)));
        assert!(!rec.is_deleted());
        assert_eq!(
            serde_json::to_string(&rec).unwrap(),
            r#"{"id":1,"deletedAt":null,"name":"a"}"#
        );
    }

    #[test]
    fn absent_stamps_stay_absent() {
        let rec: Record = serde_json::from_value(json!({"id": 2, "name": "b"})).unwrap();
        assert!(rec.modified_at.is_none());
        assert!(rec.deleted_at.is_none());
        assert_eq!(serde_json::to_string(&rec).unwrap(), r#"{"id":2,"name":"b"}"#);
    }

    #[test]
    fn record_without_id_is_rejected() {
        assert!(serde_json::from_value::<Record>(json!({"name": "ghost"})).is_err());
        assert!(serde_json::from_value::<Record>(json!({"id": null})).is_err());
    }

    #[test]
    fn group_tolerates_bad_members_and_days() {
        let raw = json!({
            "id": "g1",
            "label": "North",
            "workerIds": [1, null, "w2"],
            "days": [{"date": "2024-05-01", "attendance": {"1": "present"}}, {"attendance": {}}, 7]
        });
        let group: Group = serde_json::from_value(raw).unwrap();
        assert_eq!(group.worker_ids, vec![RecordKey::from(1), RecordKey::from("w2")]);
        assert_eq!(group.days.len(), 1);
        assert_eq!(group.fields.get("label"), Some(&json!("North")));
    }

    #[test]
    fn group_missing_collections_default_empty() {
        let group: Group = serde_json::from_value(json!({"id": "g1", "days": "nope"})).unwrap();
        assert!(group.worker_ids.is_empty());
        assert!(group.days.is_empty());
    }

    #[test]
    fn day_non_object_attendance_is_empty() {
        let day: Day = serde_json::from_value(json!({"date": "2024-05-01", "attendance": [1]})).unwrap();
        assert!(day.attendance.is_empty());
    }

    #[test]
    fn builders() {
        let rec = Record::new("w1").modified("2024-01-01T00:00:00Z").with("name", "A");
        assert_eq!(rec.field("name"), Some(&json!("A")));
        let day = Day::new("2024-05-01").mark(1, "present");
        assert_eq!(day.attendance.get("1"), Some(&json!("present")));
    }
}
