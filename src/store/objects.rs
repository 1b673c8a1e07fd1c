//! store::objects
//!
//! Decoded repository objects.
//!
//! The object store hands the rest of the crate these types instead of
//! git2 handles. The closed [`RepoObject`] enum makes per-kind handling
//! exhaustive: adding a kind is a compile error at every match site.

use chrono::{DateTime, Utc};

use crate::core::types::ObjectId;

/// The kind of a repository object.
///
/// Enumeration reports kinds so blob gating can skip whole categories
/// without fetching object bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Commit,
    Tree,
    Blob,
}

impl ObjectKind {
    /// Human-readable kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Commit => "commit",
            ObjectKind::Tree => "tree",
            ObjectKind::Blob => "blob",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decoded commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Full commit message
    pub message: String,
    /// The tree this commit snapshots
    pub tree: ObjectId,
    /// Parent commits, in recorded order (first parent first)
    pub parents: Vec<ObjectId>,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Author timestamp
    pub author_time: DateTime<Utc>,
}

impl CommitRecord {
    /// First line of the commit message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// One entry of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Raw git mode bits (e.g. 0o100644, 0o040000)
    pub mode: u32,
    /// Entry name within the tree
    pub name: String,
    /// The object this entry points to
    pub target: ObjectId,
}

/// A decoded tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeRecord {
    /// Entries in recorded order
    pub entries: Vec<TreeEntry>,
}

/// A decoded blob.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlobRecord {
    /// Raw blob bytes
    pub content: Vec<u8>,
}

/// A decoded repository object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoObject {
    Commit(CommitRecord),
    Tree(TreeRecord),
    Blob(BlobRecord),
}

impl RepoObject {
    /// The kind of this object.
    pub fn kind(&self) -> ObjectKind {
        match self {
            RepoObject::Commit(_) => ObjectKind::Commit,
            RepoObject::Tree(_) => ObjectKind::Tree,
            RepoObject::Blob(_) => ObjectKind::Blob,
        }
    }
}
