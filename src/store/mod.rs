//! store
//!
//! Read access to the repository object store.
//!
//! # Architecture
//!
//! This module is the **only doorway** to git. [`GitStore`] wraps a git2
//! repository and normalizes everything the rest of the crate consumes:
//! decoded objects ([`RepoObject`]), references ([`RefRecord`]), HEAD
//! ([`HeadState`]), the staged-index diff ([`IndexChange`]), and the
//! change-detection [`Fingerprint`](crate::core::types::Fingerprint).
//! No other module should import `git2` directly.
//!
//! The walker is written against the [`ObjectStore`] trait, so tests can
//! substitute [`MemoryStore`] and build malformed graphs a real
//! repository cannot hold.
//!
//! # Invariants
//!
//! - All reads return strong types (`ObjectId`, `RepoObject`)
//! - No mutation: gitviz never writes to a repository
//! - Errors carry a typed category ([`StoreError`]) the walker can
//!   dispatch on

pub mod discover;
mod errors;
mod interface;
mod memory;
mod objects;
mod traits;

pub use discover::{is_repository, list_repositories, RepoEntry};
pub use errors::StoreError;
pub use interface::{GitStore, HeadState, IndexChange, RefRecord};
pub use memory::MemoryStore;
pub use objects::{BlobRecord, CommitRecord, ObjectKind, RepoObject, TreeEntry, TreeRecord};
pub use traits::ObjectStore;
