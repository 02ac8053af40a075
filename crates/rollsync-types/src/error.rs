use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid month identifier: {0} (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("unknown document kind: {0}")]
    UnknownKind(String),
}
