//! store::traits
//!
//! The object store contract consumed by the graph walker.
//!
//! The walker never opens repositories or touches git2; it sees a store
//! only through [`ObjectStore`]. [`super::GitStore`] implements it over a
//! real repository, [`super::MemoryStore`] over a hash map for tests,
//! including malformed graphs a real store cannot represent.

use crate::core::types::ObjectId;
use crate::store::errors::StoreError;
use crate::store::objects::{ObjectKind, RepoObject};

/// Read access to a content-addressed object store.
pub trait ObjectStore {
    /// Enumerate every commit, tree, and blob in the store.
    ///
    /// Order is unspecified; ids are unique. Objects of other kinds
    /// (annotated tags) are filtered out here, not by the caller.
    fn enumerate(&self) -> Result<Vec<(ObjectId, ObjectKind)>, StoreError>;

    /// Fetch and decode one object.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the id is absent
    /// - [`StoreError::Corrupt`] if the object is present but undecodable
    fn fetch(&self, id: &ObjectId) -> Result<RepoObject, StoreError>;

    /// Fetch an object, mapping absence to `None`.
    ///
    /// All other errors pass through.
    fn try_fetch(&self, id: &ObjectId) -> Result<Option<RepoObject>, StoreError> {
        match self.fetch(id) {
            Ok(obj) => Ok(Some(obj)),
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
