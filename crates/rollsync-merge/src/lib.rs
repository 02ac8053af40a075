//! Merge engine for rollsync.
//!
//! Combines the server-resident copy of a document with a client-submitted
//! copy into one converged result. The engine is pure: every function takes
//! its inputs by reference and returns a fresh value, and nothing here
//! performs I/O or fails.
//!
//! # Policies
//!
//! - Overlay ([`merge_settings`]) -- flat key/value documents, remote wins per key
//! - Keyed list ([`merge_keyed`]) -- records matched by `id`, latest effective time wins
//! - Month ([`merge_month`]) -- groups, days and attendance combined field by field
//!
//! [`resolve`] dispatches on [`MergePolicy`] and is the entry point used by
//! the sync gateway.
//!
//! # Design Rules
//!
//! 1. Deletion is a tombstone (`deletedAt`); records are never dropped.
//! 2. Equal effective times favor the remote side.
//! 3. Malformed or missing structure merges as empty, never as an error.
//! 4. `lastModified` on a merged document is the merge instant. A month
//!    with only one side present is returned as is.

pub mod attendance;
pub mod document;
pub mod keyed;
mod lenient;
pub mod overlay;
pub mod record;
pub mod resolve;

pub use attendance::{merge_days, merge_groups, merge_month, union_keys, MonthDocument};
pub use document::{CollectionDocument, Document, SettingsDocument};
pub use keyed::{merge_keyed, merge_keyed_with_report, KeyedMergeReport};
pub use overlay::{merge_settings, overlay};
pub use record::{Day, Group, Record};
pub use resolve::{resolve, resolve_at};

pub use rollsync_types::{MergePolicy, Timestamp};
