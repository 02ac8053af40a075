//! Document storage for rollsync.
//!
//! The store holds one JSON document per logical name (`workers`,
//! `settings`, `attendance/2024-05`, ...). It never interprets document
//! contents; merging happens above it, in `rollsync-sync`.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`InMemoryDocumentStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsDocumentStore`] -- one `.json` file per document under a [`DataDir`]
//!
//! # Design Rules
//!
//! 1. Names are validated before they reach a backend ([`DocumentName`]).
//! 2. The data directory is created by an explicit [`DataDir::init`] step;
//!    opening a store never creates directories behind the caller's back.
//! 3. Saves replace a document atomically (write to a temp file, then rename).
//! 4. Read-modify-write atomicity is the caller's job; the store only
//!    guarantees that each `load` and `save` is whole.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod name;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::{DataDir, FsDocumentStore};
pub use memory::InMemoryDocumentStore;
pub use name::DocumentName;
pub use traits::DocumentStore;
