use std::sync::Arc;

use serde_json::Value;

use rollsync_merge::{resolve, Document};
use rollsync_store::{DocumentName, DocumentStore};
use rollsync_types::{DocumentKind, MonthId};

use crate::error::{SyncError, SyncResult};
use crate::locks::DocumentLocks;

/// Runs sync transactions against a [`DocumentStore`].
///
/// Cheap to share: wrap it in an `Arc` and hand clones to every request
/// handler.
pub struct SyncGateway {
    store: Arc<dyn DocumentStore>,
    locks: DocumentLocks,
}

impl SyncGateway {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            locks: DocumentLocks::new(),
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Merge a client-submitted document into the stored one and persist the
    /// result.
    ///
    /// `remote` is the raw request body, or `None` when the client has
    /// nothing to submit. The document lock is held from load to save.
    pub fn sync(&self, kind: &DocumentKind, remote: Option<Value>) -> SyncResult<Document> {
        let name = DocumentName::from(kind);
        let policy = kind.policy();

        let lock = self.locks.handle(&name)?;
        let _guard = lock
            .lock()
            .map_err(|_| SyncError::Poisoned(name.to_string()))?;

        let local = self
            .store
            .load(&name)?
            .map(|value| Document::from_value(policy, value));
        let remote = remote.map(|value| Document::from_value(policy, value));

        let merged = resolve(local.as_ref(), remote.as_ref(), policy);
        self.store.save(&name, &merged.to_value()?)?;

        tracing::info!(
            document = %name,
            policy = %policy,
            had_local = local.is_some(),
            had_remote = remote.is_some(),
            "synced document"
        );
        if let Some(collection) = merged.as_collection() {
            tracing::debug!(
                document = %name,
                live = collection.live().count(),
                deleted = collection.deleted().count(),
                "collection after sync"
            );
        }
        Ok(merged)
    }

    /// The stored document, or an empty document of the kind's shape when
    /// nothing has been stored yet.
    pub fn pull(&self, kind: &DocumentKind) -> SyncResult<Document> {
        let name = DocumentName::from(kind);
        let policy = kind.policy();
        let document = match self.store.load(&name)? {
            Some(value) => Document::from_value(policy, value),
            None => {
                tracing::debug!(document = %name, "no stored document; returning empty");
                Document::empty(policy)
            }
        };
        Ok(document)
    }

    /// Months that have a stored attendance document, oldest first.
    pub fn list_months(&self) -> SyncResult<Vec<MonthId>> {
        let prefix = format!("{}/", DocumentKind::ATTENDANCE_PREFIX);
        let mut months = Vec::new();
        for name in self.store.list(&prefix)? {
            let id = name.as_str().trim_start_matches(&prefix);
            match MonthId::parse(id) {
                Ok(month) => months.push(month),
                Err(e) => tracing::warn!(document = %name, error = %e, "skipping stray attendance document"),
            }
        }
        Ok(months)
    }
}

impl std::fmt::Debug for SyncGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncGateway")
            .field("locked_documents", &self.locks.len())
            .finish()
    }
}
