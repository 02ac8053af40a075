//! Nested attendance merge: month → group → day → worker.
//!
//! Unlike flat record lists, nested attendance structures are edited in
//! parts (one device changes a group's members while another marks a day),
//! so collisions combine field by field instead of replacing wholesale:
//!
//! - groups match on `id`; `workerIds` are set-unioned, `days` merged
//!   recursively, other fields overlaid with remote winning.
//! - days match on `date`; `attendance` is overlaid per worker id, other
//!   fields overlaid with remote winning.
//!
//! Scalar group and day fields overlay unconditionally, without looking at
//! timestamps. A stale remote label overwrites a newer local one.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use rollsync_types::{RecordKey, Timestamp};

use crate::keyed::merge_by_key;
use crate::lenient;
use crate::overlay::overlay;
use crate::record::{Day, Group};

/// One calendar month of attendance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthDocument {
    #[serde(default, deserialize_with = "lenient::seq")]
    pub groups: Vec<Group>,
    #[serde(rename = "lastModified", default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
    /// Top-level scalar fields (`month`, labels, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl MonthDocument {
    pub fn group(&self, id: &RecordKey) -> Option<&Group> {
        self.groups.iter().find(|g| &g.id == id)
    }
}

/// Merge two months.
///
/// With one side absent the other is returned as is. Otherwise top-level
/// fields overlay (remote wins), groups merge through [`merge_groups`], and
/// `lastModified` becomes `now`.
pub fn merge_month(
    local: Option<&MonthDocument>,
    remote: Option<&MonthDocument>,
    now: &Timestamp,
) -> MonthDocument {
    match (local, remote) {
        (None, None) => MonthDocument {
            last_modified: Some(now.clone()),
            ..MonthDocument::default()
        },
        (Some(only), None) | (None, Some(only)) => only.clone(),
        (Some(local), Some(remote)) => MonthDocument {
            groups: merge_groups(&local.groups, &remote.groups),
            last_modified: Some(now.clone()),
            fields: overlay(&local.fields, &remote.fields),
        },
    }
}

/// Merge group lists by `id`, combining colliding groups field by field.
pub fn merge_groups(local: &[Group], remote: &[Group]) -> Vec<Group> {
    merge_by_key(local, remote, merge_group)
}

fn merge_group(local: &Group, remote: &Group) -> Group {
    Group {
        id: remote.id.clone(),
        worker_ids: union_keys(&local.worker_ids, &remote.worker_ids),
        days: merge_days(&local.days, &remote.days),
        fields: overlay(&local.fields, &remote.fields),
    }
}

/// Merge day lists by `date`, combining attendance per worker.
pub fn merge_days(local: &[Day], remote: &[Day]) -> Vec<Day> {
    merge_by_key(local, remote, merge_day)
}

fn merge_day(local: &Day, remote: &Day) -> Day {
    Day {
        date: remote.date.clone(),
        attendance: overlay(&local.attendance, &remote.attendance),
        fields: overlay(&local.fields, &remote.fields),
    }
}

/// Set union preserving first occurrence: local members in order, then new
/// remote members in order. Duplicates on either side collapse.
pub fn union_keys(local: &[RecordKey], remote: &[RecordKey]) -> Vec<RecordKey> {
    let mut seen: HashSet<&RecordKey> = HashSet::with_capacity(local.len() + remote.len());
    local
        .iter()
        .chain(remote)
        .filter(|key| seen.insert(*key))
        .cloned()
        .collect()
}
