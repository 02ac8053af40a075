use serde_json::Value;

use crate::error::StoreResult;
use crate::name::DocumentName;

/// Named JSON document storage.
///
/// All implementations must satisfy these invariants:
/// - `load` and `save` are whole: a reader sees either the previous or the
///   new document, never a partial write.
/// - `save` is idempotent: saving the same document twice leaves the same
///   state as saving it once.
/// - The store never interprets document contents.
/// - All I/O errors are propagated, never silently ignored.
pub trait DocumentStore: Send + Sync {
    /// Read a document by name.
    ///
    /// Returns `Ok(None)` if the document does not exist.
    fn load(&self, name: &DocumentName) -> StoreResult<Option<Value>>;

    /// Create or replace a document.
    fn save(&self, name: &DocumentName, document: &Value) -> StoreResult<()>;

    /// List stored document names starting with `prefix`, sorted.
    ///
    /// Pass `""` to list everything, `"attendance/"` for month documents.
    fn list(&self, prefix: &str) -> StoreResult<Vec<DocumentName>>;

    /// Check whether a document exists.
    fn exists(&self, name: &DocumentName) -> StoreResult<bool> {
        Ok(self.load(name)?.is_some())
    }
}
