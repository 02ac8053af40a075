//! Filesystem document store.
//!
//! Layout under the data directory:
//!
//! ```text
//! <root>/settings.json
//! <root>/workers.json
//! <root>/areas.json
//! <root>/activities.json
//! <root>/groups.json
//! <root>/attendance/2024-05.json
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use rollsync_types::DocumentKind;

use crate::error::{StoreError, StoreResult};
use crate::name::DocumentName;
use crate::traits::DocumentStore;

const EXTENSION: &str = "json";

/// Handle to an initialized data directory.
///
/// Obtained from [`DataDir::init`] (creates the layout) or [`DataDir::open`]
/// (requires it to exist already).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Create the data directory layout if missing and return a handle.
    pub fn init(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        let attendance = root.join(DocumentKind::ATTENDANCE_PREFIX);
        if !attendance.is_dir() {
            fs::create_dir_all(&attendance)?;
            tracing::info!(root = %root.display(), "initialized data directory");
        }
        Ok(Self { root })
    }

    /// Open an existing data directory.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if !root.join(DocumentKind::ATTENDANCE_PREFIX).is_dir() {
            return Err(StoreError::NotInitialized(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file backing a document.
    pub fn path_for(&self, name: &DocumentName) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(name.segments());
        path.set_extension(EXTENSION);
        path
    }

    fn name_for(&self, path: &Path) -> Option<DocumentName> {
        if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
            return None;
        }
        let relative = path.strip_prefix(&self.root).ok()?.with_extension("");
        let segments: Vec<&str> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        DocumentName::new(segments.join("/")).ok()
    }
}

/// One pretty-printed JSON file per document.
#[derive(Clone, Debug)]
pub struct FsDocumentStore {
    dir: DataDir,
}

impl FsDocumentStore {
    pub fn open(dir: DataDir) -> Self {
        Self { dir }
    }

    pub fn data_dir(&self) -> &DataDir {
        &self.dir
    }
}

impl DocumentStore for FsDocumentStore {
    fn load(&self, name: &DocumentName) -> StoreResult<Option<Value>> {
        let path = self.dir.path_for(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value = serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!(document = %name, bytes = bytes.len(), "loaded document");
        Ok(Some(value))
    }

    fn save(&self, name: &DocumentName, document: &Value) -> StoreResult<()> {
        let path = self.dir.path_for(name);
        let parent = path.parent().unwrap_or(self.dir.root());
        fs::create_dir_all(parent)?;

        let bytes = serde_json::to_vec_pretty(document).map_err(|e| StoreError::Serialization {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        // Same directory as the target so the rename stays on one filesystem.
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        tracing::debug!(document = %name, bytes = bytes.len(), "saved document");
        Ok(())
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<DocumentName>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(self.dir.root()).min_depth(1) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(name) = self.dir.name_for(entry.path()) {
                if name.as_str().starts_with(prefix) {
                    names.push(name);
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn exists(&self, name: &DocumentName) -> StoreResult<bool> {
        Ok(self.dir.path_for(name).is_file())
    }
}
