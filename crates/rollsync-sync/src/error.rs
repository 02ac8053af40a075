use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("store error: {0}")]
    Store(#[from] rollsync_store::StoreError),

    #[error("could not encode merged document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("document lock poisoned: {0}")]
    Poisoned(String),
}

pub type SyncResult<T> = Result<T, SyncError>;
