//! Document kinds and the merge policy each one follows.
//!
//! Every logical document the backend stores is one [`DocumentKind`]. The
//! mapping from kind to [`MergePolicy`] is an exhaustive `match`, so adding a
//! kind forces a decision about how it merges.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// How two versions of a document are combined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// Flat key/value overlay, remote wins per key.
    Overlay,
    /// `items` merged by `id`, latest effective time wins.
    KeyedList,
    /// Nested group/day/attendance merge.
    Month,
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlay => write!(f, "overlay"),
            Self::KeyedList => write!(f, "keyed-list"),
            Self::Month => write!(f, "month"),
        }
    }
}

/// A calendar month in `YYYY-MM` form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthId(String);

impl MonthId {
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let bytes = s.as_bytes();
        // chrono skips leading whitespace in numeric fields, so check digits first.
        let valid = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().chain(&bytes[5..]).all(u8::is_ascii_digit)
            && NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").is_ok();
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(TypeError::InvalidMonth(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MonthId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MonthId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MonthId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<MonthId> for String {
    fn from(m: MonthId) -> Self {
        m.0
    }
}

/// One logical document held by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Settings,
    Workers,
    Areas,
    Activities,
    Groups,
    Attendance(MonthId),
}

impl DocumentKind {
    /// Prefix under which month documents are stored.
    pub const ATTENDANCE_PREFIX: &'static str = "attendance";

    /// The flat (non-month) kinds, in a stable order.
    pub const FLAT: [DocumentKind; 5] = [
        DocumentKind::Settings,
        DocumentKind::Workers,
        DocumentKind::Areas,
        DocumentKind::Activities,
        DocumentKind::Groups,
    ];

    pub fn policy(&self) -> MergePolicy {
        match self {
            Self::Settings => MergePolicy::Overlay,
            Self::Workers | Self::Areas | Self::Activities | Self::Groups => MergePolicy::KeyedList,
            Self::Attendance(_) => MergePolicy::Month,
        }
    }

    /// The storage name: `workers`, `attendance/2024-05`, ...
    pub fn document_name(&self) -> String {
        match self {
            Self::Attendance(month) => format!("{}/{month}", Self::ATTENDANCE_PREFIX),
            other => other.flat_name().to_string(),
        }
    }

    fn flat_name(&self) -> &'static str {
        match self {
            Self::Settings => "settings",
            Self::Workers => "workers",
            Self::Areas => "areas",
            Self::Activities => "activities",
            Self::Groups => "groups",
            Self::Attendance(_) => Self::ATTENDANCE_PREFIX,
        }
    }

    /// Parse a flat kind name (`"workers"`) or a month document name
    /// (`"attendance/2024-05"`).
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if let Some(month) = s
            .strip_prefix(Self::ATTENDANCE_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
        {
            return Ok(Self::Attendance(MonthId::parse(month)?));
        }
        match s {
            "settings" => Ok(Self::Settings),
            "workers" => Ok(Self::Workers),
            "areas" => Ok(Self::Areas),
            "activities" => Ok(Self::Activities),
            "groups" => Ok(Self::Groups),
            other => Err(TypeError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.document_name())
    }
}

impl FromStr for DocumentKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
