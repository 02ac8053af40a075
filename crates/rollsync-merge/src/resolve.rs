//! Policy dispatch: the single entry point for merging two documents.

use std::borrow::Cow;

use rollsync_types::{MergePolicy, Timestamp};

use crate::attendance::merge_month;
use crate::document::{CollectionDocument, Document};
use crate::keyed::merge_keyed_with_report;
use crate::overlay::merge_settings;

/// Merge the resident (`local`) and submitted (`remote`) versions of a
/// document, stamping the result with the current time.
pub fn resolve(local: Option<&Document>, remote: Option<&Document>, policy: MergePolicy) -> Document {
    resolve_at(local, remote, policy, &Timestamp::now())
}

/// [`resolve`] with an explicit `lastModified` stamp.
///
/// A side whose variant does not match `policy` is malformed and merges as
/// an empty document of the policy's shape.
pub fn resolve_at(
    local: Option<&Document>,
    remote: Option<&Document>,
    policy: MergePolicy,
    now: &Timestamp,
) -> Document {
    match policy {
        MergePolicy::Overlay => {
            let local = side(local, policy, Document::as_settings);
            let remote = side(remote, policy, Document::as_settings);
            merge_settings(local.as_deref(), remote.as_deref(), now).into()
        }
        MergePolicy::KeyedList => {
            let local = side(local, policy, Document::as_collection);
            let remote = side(remote, policy, Document::as_collection);
            merge_collections(local.as_deref(), remote.as_deref(), now).into()
        }
        MergePolicy::Month => {
            let local = side(local, policy, Document::as_month);
            let remote = side(remote, policy, Document::as_month);
            merge_month(local.as_deref(), remote.as_deref(), now).into()
        }
    }
}

fn merge_collections(
    local: Option<&CollectionDocument>,
    remote: Option<&CollectionDocument>,
    now: &Timestamp,
) -> CollectionDocument {
    let local = local.map(|d| d.items.as_slice()).unwrap_or_default();
    let remote = remote.map(|d| d.items.as_slice()).unwrap_or_default();
    let (items, report) = merge_keyed_with_report(local, remote);
    tracing::debug!(
        inserted = report.inserted,
        replaced = report.replaced,
        kept = report.kept,
        total = items.len(),
        noop = report.is_noop(),
        "merged keyed list"
    );
    CollectionDocument {
        items,
        last_modified: Some(now.clone()),
    }
}

/// Borrow the expected variant, or substitute an empty one.
fn side<'a, T>(
    doc: Option<&'a Document>,
    policy: MergePolicy,
    view: fn(&'a Document) -> Option<&'a T>,
) -> Option<Cow<'a, T>>
where
    T: Clone + Default,
{
    doc.map(|d| match view(d) {
        Some(inner) => Cow::Borrowed(inner),
        None => {
            tracing::warn!(expected = %policy, found = %d.policy(), "document shape mismatch; treating as empty");
            Cow::Owned(T::default())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::MonthDocument;
    use crate::record::{Day, Group, Record};
    use rollsync_types::RecordKey;
    use serde_json::{json, Value};

    fn now() -> Timestamp {
        Timestamp::from("2024-06-01T12:00:00.000Z")
    }

    fn doc(policy: MergePolicy, value: Value) -> Document {
        Document::from_value(policy, value)
    }

    #[test]
    fn workers_scenario() {
        let local = doc(
            MergePolicy::KeyedList,
            json!({"items": [{"id": 1, "name": "A", "modifiedAt": "2024-01-01T00:00:00Z"}]}),
        );
        let remote = doc(
            MergePolicy::KeyedList,
            json!({"items": [
                {"id": 1, "name": "A2", "modifiedAt": "2024-02-01T00:00:00Z"},
                {"id": 2, "name": "B", "modifiedAt": "2024-02-01T00:00:00Z"}
            ]}),
        );
        let merged = resolve_at(Some(&local), Some(&remote), MergePolicy::KeyedList, &now());
        assert_eq!(
            merged.to_value().unwrap(),
            json!({
                "items": [
                    {"id": 1, "name": "A2", "modifiedAt": "2024-02-01T00:00:00Z"},
                    {"id": 2, "name": "B", "modifiedAt": "2024-02-01T00:00:00Z"}
                ],
                "lastModified": "2024-06-01T12:00:00.000Z"
            })
        );
    }

    #[test]
    fn keyed_list_with_absent_local() {
        let remote: Document = CollectionDocument {
            items: vec![Record::new(1)],
            last_modified: None,
        }
        .into();
        let merged = resolve_at(None, Some(&remote), MergePolicy::KeyedList, &now());
        let coll = merged.as_collection().unwrap();
        assert_eq!(coll.items, vec![Record::new(1)]);
        assert_eq!(coll.last_modified, Some(now()));
    }

    #[test]
    fn settings_overlay() {
        let local = doc(MergePolicy::Overlay, json!({"a": 1, "b": 1}));
        let remote = doc(MergePolicy::Overlay, json!({"b": 2}));
        let merged = resolve_at(Some(&local), Some(&remote), MergePolicy::Overlay, &now());
        assert_eq!(
            merged.to_value().unwrap(),
            json!({"a": 1, "b": 2, "lastModified": "2024-06-01T12:00:00.000Z"})
        );
    }

    #[test]
    fn month_dispatch() {
        let local: Document = MonthDocument {
            groups: vec![Group {
                days: vec![Day::new("05-01").mark(1, "present")],
                ..Group::new("g1")
            }],
            ..MonthDocument::default()
        }
        .into();
        let remote: Document = MonthDocument {
            groups: vec![Group {
                days: vec![Day::new("05-01").mark(2, "absent")],
                ..Group::new("g1")
            }],
            ..MonthDocument::default()
        }
        .into();
        let merged = resolve_at(Some(&local), Some(&remote), MergePolicy::Month, &now());
        let month = merged.as_month().unwrap();
        let g1 = month.group(&RecordKey::from("g1")).unwrap();
        assert_eq!(g1.days[0].attendance.len(), 2);
        assert_eq!(month.last_modified, Some(now()));
    }

    #[test]
    fn month_with_absent_local_is_remote_unchanged() {
        let remote = doc(
            MergePolicy::Month,
            json!({"groups": [], "lastModified": "2024-05-31T00:00:00Z"}),
        );
        let merged = resolve_at(None, Some(&remote), MergePolicy::Month, &now());
        assert_eq!(merged, remote);
    }

    #[test]
    fn mismatched_variant_merges_as_empty() {
        let settings = doc(MergePolicy::Overlay, json!({"a": 1}));
        let remote = doc(MergePolicy::KeyedList, json!({"items": [{"id": 7}]}));
        let merged = resolve_at(Some(&settings), Some(&remote), MergePolicy::KeyedList, &now());
        assert_eq!(merged.as_collection().unwrap().items, vec![Record::new(7)]);
    }

    #[test]
    fn idempotent_modulo_stamp() {
        let cases = [
            (MergePolicy::Overlay, json!({"theme": "dark", "lastModified": "2024-01-01T00:00:00Z"})),
            (
                MergePolicy::KeyedList,
                json!({"items": [{"id": 1, "modifiedAt": 100}, {"id": 2, "deletedAt": 200}]}),
            ),
            (
                MergePolicy::Month,
                json!({"month": "2024-05", "groups": [
                    {"id": "g1", "workerIds": [1, 2], "days": [{"date": "05-01", "attendance": {"1": "present"}}]}
                ]}),
            ),
        ];
        for (policy, raw) in cases {
            let x = doc(policy, raw);
            let merged = resolve_at(Some(&x), Some(&x), policy, &now());
            let mut expected = x.to_value().unwrap();
            let mut actual = merged.to_value().unwrap();
            for v in [&mut expected, &mut actual] {
                if let Some(obj) = v.as_object_mut() {
                    obj.remove("lastModified");
                }
            }
            assert_eq!(actual, expected, "{policy} merge with itself changed the document");
        }
    }

    #[test]
    fn resolve_stamps_current_time() {
        let merged = resolve(None, None, MergePolicy::KeyedList);
        let stamp = merged.last_modified().unwrap();
        assert!(stamp.instant().as_millis() > 1_577_836_800_000);
    }
}
