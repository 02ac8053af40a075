use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rollsync_store::DocumentName;

use crate::error::{SyncError, SyncResult};

/// One mutex per document name, created on first use.
///
/// The map itself is only locked long enough to look up or insert a handle;
/// the per-document mutex is what callers hold across a transaction.
#[derive(Debug, Default)]
pub struct DocumentLocks {
    locks: Mutex<HashMap<DocumentName, Arc<Mutex<()>>>>,
}

impl DocumentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock guarding `name`. Every call for the same name returns the
    /// same mutex.
    pub fn handle(&self, name: &DocumentName) -> SyncResult<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| SyncError::Poisoned("lock map".into()))?;
        Ok(Arc::clone(locks.entry(name.clone()).or_default()))
    }

    /// Number of documents that have been locked at least once.
    pub fn len(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DocumentName {
        DocumentName::new(s).unwrap()
    }

    #[test]
    fn same_name_same_lock() {
        let locks = DocumentLocks::new();
        let a = locks.handle(&name("workers")).unwrap();
        let b = locks.handle(&name("workers")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn different_names_do_not_block() {
        let locks = DocumentLocks::new();
        let a = locks.handle(&name("workers")).unwrap();
        let b = locks.handle(&name("attendance/2024-05")).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        let _ga = a.lock().unwrap();
        assert!(b.try_lock().is_ok());
    }
}
