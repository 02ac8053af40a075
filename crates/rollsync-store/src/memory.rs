use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::name::DocumentName;
use crate::traits::DocumentStore;

/// In-memory, HashMap-based document store.
///
/// Intended for tests and embedding. Documents are held behind a `RwLock`
/// and cloned on load and save. Data is lost when the store is dropped.
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<DocumentName, Value>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn load(&self, name: &DocumentName) -> StoreResult<Option<Value>> {
        let docs = self.documents.read().map_err(|_| StoreError::Poisoned)?;
        Ok(docs.get(name).cloned())
    }

    fn save(&self, name: &DocumentName, document: &Value) -> StoreResult<()> {
        let mut docs = self.documents.write().map_err(|_| StoreError::Poisoned)?;
        docs.insert(name.clone(), document.clone());
        Ok(())
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<DocumentName>> {
        let docs = self.documents.read().map_err(|_| StoreError::Poisoned)?;
        let mut names: Vec<DocumentName> = docs
            .keys()
            .filter(|name| name.as_str().starts_with(prefix))
            .cloned()
            .collect();
        names.sort();
        Ok(names)
    }

    fn exists(&self, name: &DocumentName) -> StoreResult<bool> {
        let docs = self.documents.read().map_err(|_| StoreError::Poisoned)?;
        Ok(docs.contains_key(name))
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("document_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name(s: &str) -> DocumentName {
        DocumentName::new(s).unwrap()
    }

    #[test]
    fn save_and_load() {
        let store = InMemoryDocumentStore::new();
        let doc = json!({"items": [{"id": 1}]});
        store.save(&name("workers"), &doc).unwrap();
        assert_eq!(store.load(&name("workers")).unwrap(), Some(doc));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn load_missing_returns_none() {
        let store = InMemoryDocumentStore::new();
        assert!(store.load(&name("areas")).unwrap().is_none());
        assert!(!store.exists(&name("areas")).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn save_replaces() {
        let store = InMemoryDocumentStore::new();
        store.save(&name("settings"), &json!({"a": 1})).unwrap();
        store.save(&name("settings"), &json!({"a": 2})).unwrap();
        assert_eq!(store.load(&name("settings")).unwrap(), Some(json!({"a": 2})));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn list_by_prefix_sorted() {
        let store = InMemoryDocumentStore::new();
        for n in ["attendance/2024-06", "workers", "attendance/2024-05"] {
            store.save(&name(n), &json!({})).unwrap();
        }
        let months: Vec<String> = store
            .list("attendance/")
            .unwrap()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(months, vec!["attendance/2024-05", "attendance/2024-06"]);
        assert_eq!(store.list("").unwrap().len(), 3);
    }

    #[test]
    fn concurrent_saves() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryDocumentStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let n = DocumentName::new(format!("doc_{i}")).unwrap();
                    store.save(&n, &json!({"i": i})).unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }
        assert_eq!(store.len(), 8);
    }
}
