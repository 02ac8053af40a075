//! Sync transactions for rollsync.
//!
//! A sync is one read-modify-write cycle on a single document: load the
//! resident copy, merge the submitted copy into it, save the result, and
//! hand the result back to the client. The [`SyncGateway`] serializes
//! cycles on the same document so concurrent clients never lose each
//! other's updates, while cycles on different documents run in parallel.

pub mod error;
pub mod gateway;
pub mod locks;

pub use error::{SyncError, SyncResult};
pub use gateway::SyncGateway;
pub use locks::DocumentLocks;
