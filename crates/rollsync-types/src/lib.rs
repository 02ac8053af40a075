//! Foundation types for rollsync.
//!
//! This crate provides the timestamp, key, and document naming types used
//! throughout the sync backend. Every other rollsync crate depends on
//! `rollsync-types`.
//!
//! # Key Types
//!
//! - [`Timestamp`] -- A `modifiedAt` / `deletedAt` value as it appeared on the wire
//! - [`EffectiveTime`] -- Comparable instant used for merge precedence
//! - [`Stamped`] -- Capability trait for anything carrying modification/deletion stamps
//! - [`RecordKey`] / [`Keyed`] -- Exact-equality record identifiers
//! - [`DocumentKind`] / [`MergePolicy`] -- Which document a payload targets and how it merges
//! - [`MonthId`] -- Validated `YYYY-MM` attendance month

pub mod error;
pub mod key;
pub mod kind;
pub mod temporal;

pub use error::TypeError;
pub use key::{Keyed, RecordKey};
pub use kind::{DocumentKind, MergePolicy, MonthId};
pub use temporal::{effective_time, EffectiveTime, Stamped, Timestamp};
