//! store::memory
//!
//! In-memory object store for deterministic testing.
//!
//! # Design
//!
//! `MemoryStore` implements [`ObjectStore`] over a hash map. Because it
//! skips content addressing, it can host deliberately malformed graphs a
//! real repository cannot represent: a tree that references itself, a
//! commit whose parent was never written, an object that reports corrupt
//! on fetch. Walker tests lean on exactly those shapes.
//!
//! # Example
//!
//! ```
//! use gitviz::store::{MemoryStore, ObjectStore};
//!
//! let mut store = MemoryStore::new();
//! let blob = store.add_blob("b1", b"hello");
//! let tree = store.add_tree("a1", &[("hello.txt", &blob)]);
//! store.add_commit("c1", &tree, &[]);
//!
//! assert_eq!(store.enumerate().unwrap().len(), 3);
//! ```

use std::collections::HashMap;

use chrono::DateTime;

use crate::core::types::ObjectId;
use crate::store::errors::StoreError;
use crate::store::objects::{
    BlobRecord, CommitRecord, ObjectKind, RepoObject, TreeEntry, TreeRecord,
};
use crate::store::traits::ObjectStore;

/// One stored entry.
#[derive(Debug, Clone)]
enum Entry {
    /// A decodable object.
    Object(RepoObject),
    /// Present but undecodable; fetch reports [`StoreError::Corrupt`].
    /// Enumerates under the given kind, like a packed object whose
    /// header parses but whose body does not inflate.
    Corrupt(ObjectKind),
}

/// In-memory object store for testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: HashMap<ObjectId, Entry>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand a short hex fragment into a full object id.
    ///
    /// Pads with leading zeros, so `id("c1")` and `id("b2")` are valid,
    /// distinct 40-character ids. Panics on non-hex input; this is test
    /// plumbing.
    pub fn id(fragment: &str) -> ObjectId {
        let padded = format!("{:0>40}", fragment);
        ObjectId::new(padded).unwrap_or_else(|e| panic!("bad id fragment '{}': {}", fragment, e))
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Insert a pre-built object under the given id.
    pub fn insert(&mut self, id: ObjectId, object: RepoObject) {
        self.objects.insert(id, Entry::Object(object));
    }

    /// Remove an object, simulating a prune. Returns whether it existed.
    pub fn remove(&mut self, id: &ObjectId) -> bool {
        self.objects.remove(id).is_some()
    }

    /// Add a blob with the given content.
    pub fn add_blob(&mut self, fragment: &str, content: &[u8]) -> ObjectId {
        let id = Self::id(fragment);
        self.insert(
            id.clone(),
            RepoObject::Blob(BlobRecord {
                content: content.to_vec(),
            }),
        );
        id
    }

    /// Add a tree with the given (name, target) entries.
    ///
    /// Targets need not exist in the store; that is how missing-child
    /// scenarios are built.
    pub fn add_tree(&mut self, fragment: &str, entries: &[(&str, &ObjectId)]) -> ObjectId {
        let id = Self::id(fragment);
        let entries = entries
            .iter()
            .map(|(name, target)| TreeEntry {
                mode: 0o100644,
                name: (*name).to_string(),
                target: (*target).clone(),
            })
            .collect();
        self.insert(id.clone(), RepoObject::Tree(TreeRecord { entries }));
        id
    }

    /// Add a commit pointing at the given tree and parents.
    pub fn add_commit(&mut self, fragment: &str, tree: &ObjectId, parents: &[&ObjectId]) -> ObjectId {
        let id = Self::id(fragment);
        self.insert(
            id.clone(),
            RepoObject::Commit(CommitRecord {
                message: format!("commit {}", fragment),
                tree: tree.clone(),
                parents: parents.iter().map(|p| (*p).clone()).collect(),
                author_name: "Test Author".to_string(),
                author_email: "test@example.com".to_string(),
                author_time: DateTime::UNIX_EPOCH,
            }),
        );
        id
    }

    /// Add an entry that enumerates normally but fails to fetch.
    pub fn add_corrupt(&mut self, fragment: &str, kind: ObjectKind) -> ObjectId {
        let id = Self::id(fragment);
        self.objects.insert(id.clone(), Entry::Corrupt(kind));
        id
    }
}

impl ObjectStore for MemoryStore {
    fn enumerate(&self) -> Result<Vec<(ObjectId, ObjectKind)>, StoreError> {
        let mut out: Vec<(ObjectId, ObjectKind)> = self
            .objects
            .iter()
            .map(|(id, entry)| {
                let kind = match entry {
                    Entry::Object(obj) => obj.kind(),
                    Entry::Corrupt(kind) => *kind,
                };
                (id.clone(), kind)
            })
            .collect();
        // Deterministic order keeps test failures reproducible
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }

    fn fetch(&self, id: &ObjectId) -> Result<RepoObject, StoreError> {
        match self.objects.get(id) {
            Some(Entry::Object(obj)) => Ok(obj.clone()),
            Some(Entry::Corrupt(_)) => Err(StoreError::Corrupt {
                id: id.to_string(),
                message: "simulated corruption".to_string(),
            }),
            None => Err(StoreError::NotFound { id: id.to_string() }),
        }
    }
}
