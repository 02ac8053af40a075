//! Keyed collection merge.
//!
//! Two sequences of uniquely keyed records are combined into one. An entry
//! present on both sides is resolved by effective time; the later one wins
//! wholesale, and ties go to the remote (incoming) side.
//!
//! Output order follows insertion into the backing map: local keys in local
//! order, then remote-only keys in remote order.

use std::collections::HashMap;

use rollsync_types::{Keyed, Stamped};

/// Counts describing what a keyed merge did with the remote side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyedMergeReport {
    /// Remote keys that were not present locally.
    pub inserted: usize,
    /// Collisions won by the remote record.
    pub replaced: usize,
    /// Collisions won by the existing record (stale remote dropped).
    pub kept: usize,
}

impl KeyedMergeReport {
    /// Returns `true` if the merge left the local side untouched.
    pub fn is_noop(&self) -> bool {
        self.inserted == 0 && self.replaced == 0
    }
}

/// Map-seed-then-overlay over any keyed item.
///
/// `local` seeds an insertion-ordered map (later duplicates overwrite earlier
/// ones in place). Each remote item is inserted if its key is new, otherwise
/// `combine(existing, incoming)` produces the replacement.
pub(crate) fn merge_by_key<T, F>(local: &[T], remote: &[T], mut combine: F) -> Vec<T>
where
    T: Keyed + Clone,
    F: FnMut(&T, &T) -> T,
{
    let mut slots: Vec<T> = Vec::with_capacity(local.len() + remote.len());
    let mut index: HashMap<T::Key, usize> = HashMap::with_capacity(local.len() + remote.len());

    for item in local {
        match index.get(item.key()) {
            Some(&i) => slots[i] = item.clone(),
            None => {
                index.insert(item.key().clone(), slots.len());
                slots.push(item.clone());
            }
        }
    }

    for incoming in remote {
        match index.get(incoming.key()) {
            Some(&i) => {
                let merged = combine(&slots[i], incoming);
                slots[i] = merged;
            }
            None => {
                index.insert(incoming.key().clone(), slots.len());
                slots.push(incoming.clone());
            }
        }
    }

    slots
}

/// Merge two record lists, latest effective time winning per key.
///
/// The winning record replaces the other field for field; there is no deep
/// merge. A remote record whose effective time is older than the resident
/// one is dropped.
pub fn merge_keyed<T>(local: &[T], remote: &[T]) -> Vec<T>
where
    T: Keyed + Stamped + Clone,
{
    merge_keyed_with_report(local, remote).0
}

/// [`merge_keyed`], also reporting how each remote record was handled.
pub fn merge_keyed_with_report<T>(local: &[T], remote: &[T]) -> (Vec<T>, KeyedMergeReport)
where
    T: Keyed + Stamped + Clone,
{
    let mut report = KeyedMergeReport::default();
    let merged = merge_by_key(local, remote, |existing, incoming| {
        if incoming.effective_time() >= existing.effective_time() {
            report.replaced += 1;
            incoming.clone()
        } else {
            report.kept += 1;
            existing.clone()
        }
    });
    // Remote entries that did not collide were inserted.
    report.inserted = remote.len() - report.replaced - report.kept;
    (merged, report)
}
