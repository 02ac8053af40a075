//! Document name validation.
//!
//! Valid document names:
//! - Must be non-empty
//! - Consist of `/`-separated segments
//! - Each segment is non-empty and made of ASCII letters, digits, `-` or `_`
//!
//! The rules keep every name a safe relative path, so a name can never
//! escape the data directory (`..`, absolute paths, backslashes are all
//! rejected).

use std::fmt;

use rollsync_types::DocumentKind;

use crate::error::{StoreError, StoreResult};

/// A validated storage name such as `workers` or `attendance/2024-05`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentName(String);

impl DocumentName {
    pub fn new(name: impl Into<String>) -> StoreResult<Self> {
        let name = name.into();
        validate(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `/`-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

fn validate(name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: "document name must not be empty".into(),
        });
    }

    for segment in name.split('/') {
        if segment.is_empty() {
            return Err(StoreError::InvalidName {
                name: name.to_string(),
                reason: "empty path segment".into(),
            });
        }
        if let Some(ch) = segment
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(StoreError::InvalidName {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    Ok(())
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&DocumentKind> for DocumentName {
    fn from(kind: &DocumentKind) -> Self {
        // Kind names are fixed identifiers or `attendance/YYYY-MM`; both
        // satisfy the naming rules.
        Self(kind.document_name())
    }
}

impl From<DocumentKind> for DocumentName {
    fn from(kind: DocumentKind) -> Self {
        Self::from(&kind)
    }
}
