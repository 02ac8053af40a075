use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A modification or deletion stamp exactly as a client sent it.
///
/// Clients send either RFC 3339 strings (`"2024-05-01T08:00:00.000Z"`) or
/// epoch milliseconds. The original JSON value is kept so that a record
/// round-trips byte-for-byte; [`Timestamp::instant`] interprets it for
/// comparison.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(Value);

impl Timestamp {
    /// Wrap a raw JSON value.
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// An RFC 3339 stamp for the given instant, millisecond precision, `Z` suffix.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true)))
    }

    /// A stamp for the current wall-clock time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// The raw JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Returns `true` for an explicit JSON `null`.
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Interpret the stamp as an instant.
    ///
    /// Anything that cannot be read as a time counts as the epoch.
    pub fn instant(&self) -> EffectiveTime {
        match &self.0 {
            Value::String(s) => parse_text(s).unwrap_or(EffectiveTime::EPOCH),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
                .map(EffectiveTime::from_millis)
                .unwrap_or(EffectiveTime::EPOCH),
            _ => EffectiveTime::EPOCH,
        }
    }
}

fn parse_text(s: &str) -> Option<EffectiveTime> {
    let s = s.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Some(EffectiveTime::from_millis(at.timestamp_millis()));
    }
    // Zone-less forms are read as UTC.
    if let Ok(at) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(EffectiveTime::from_millis(at.and_utc().timestamp_millis()));
    }
    if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let midnight = day.and_hms_opt(0, 0, 0)?;
        return Some(EffectiveTime::from_millis(midnight.and_utc().timestamp_millis()));
    }
    None
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self::from_datetime(at)
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Self(Value::String(s.to_string()))
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(Value::from(ms))
    }
}

/// The instant that decides merge precedence for a record.
///
/// Milliseconds since the UNIX epoch. Never persisted; recomputed from the
/// record's stamps whenever two versions are compared.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EffectiveTime(i64);

impl EffectiveTime {
    /// The earliest instant. Absent stamps resolve to this.
    pub const EPOCH: Self = Self(0);

    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub const fn as_millis(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for EffectiveTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EffectiveTime({}ms)", self.0)
    }
}

impl fmt::Display for EffectiveTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(at) => write!(f, "{}", at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// The later of a modification and a deletion stamp.
///
/// Both stamps take part symmetrically: a delete after the last edit beats
/// that edit, and an edit after a delete beats the tombstone.
pub fn effective_time(modified: Option<&Timestamp>, deleted: Option<&Timestamp>) -> EffectiveTime {
    let modified = modified.map(Timestamp::instant).unwrap_or(EffectiveTime::EPOCH);
    let deleted = deleted.map(Timestamp::instant).unwrap_or(EffectiveTime::EPOCH);
    modified.max(deleted)
}

/// Anything carrying `modifiedAt` / `deletedAt` stamps.
pub trait Stamped {
    fn modified_at(&self) -> Option<&Timestamp>;

    fn deleted_at(&self) -> Option<&Timestamp>;

    fn effective_time(&self) -> EffectiveTime {
        effective_time(self.modified_at(), self.deleted_at())
    }

    /// Returns `true` if the record carries a tombstone.
    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some_and(|t| !t.is_null())
    }
}
