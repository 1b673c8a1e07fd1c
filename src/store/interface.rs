//! store::interface
//!
//! Object store implementation using git2.
//!
//! This module is the **single doorway** to the on-disk repository. All
//! reads flow through [`GitStore`], which hands out decoded records and
//! normalizes git2 errors into [`StoreError`] categories. No other module
//! should import `git2` directly.
//!
//! # Architecture
//!
//! [`GitStore`] implements the [`ObjectStore`] trait the walker consumes
//! (enumerate/fetch over commits, trees, and blobs) and additionally
//! exposes the mutable-state surface the reference overlay needs: refs,
//! the raw HEAD target, and the staged-index diff.
//!
//! # Example
//!
//! ```ignore
//! use gitviz::store::{GitStore, ObjectStore};
//! use std::path::Path;
//!
//! let store = GitStore::open(Path::new("."))?;
//! for (id, kind) in store.enumerate()? {
//!     println!("{} {}", kind, id.short(7));
//! }
//! ```

use std::path::Path;

use chrono::DateTime;

use crate::core::types::{Fingerprint, ObjectId};
use crate::store::errors::StoreError;
use crate::store::objects::{
    BlobRecord, CommitRecord, ObjectKind, RepoObject, TreeEntry, TreeRecord,
};
use crate::store::traits::ObjectStore;

/// A reference with its name and resolved target.
///
/// HEAD is excluded; it is reported separately as [`HeadState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefRecord {
    /// The full ref name (e.g. `refs/heads/main`)
    pub name: String,
    /// The object the ref resolves to
    pub target: ObjectId,
}

/// The state of HEAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    /// HEAD points at a ref (the usual case). `target` is the full ref
    /// name, with the on-disk `ref: ` prefix already stripped.
    Symbolic {
        /// The ref HEAD points at (e.g. `refs/heads/main`)
        target: String,
    },
    /// HEAD points directly at a commit.
    Detached {
        /// The commit id
        id: ObjectId,
    },
}

/// One staged change from the index-vs-HEAD-tree diff.
///
/// Fields are optional per side: a pure addition has no `old_*` values,
/// a pure deletion no `new_*` values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexChange {
    /// Path on the HEAD-tree side
    pub old_path: Option<String>,
    /// Path on the index side
    pub new_path: Option<String>,
    /// Blob id on the HEAD-tree side
    pub old_id: Option<ObjectId>,
    /// Blob id on the index side
    pub new_id: Option<ObjectId>,
    /// Mode bits on the HEAD-tree side
    pub old_mode: Option<u32>,
    /// Mode bits on the index side
    pub new_mode: Option<u32>,
}

/// The git-backed object store.
///
/// This is the single point of interaction with the on-disk repository.
/// Bare repositories are accepted; they simply have no working index to
/// diff, so their index overlay is empty.
pub struct GitStore {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for GitStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitStore")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl GitStore {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover` to find the repository root, so
    /// `path` can be any directory within the repository. Bare
    /// repositories are accepted.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotARepo`] if no repository is found.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let repo = git2::Repository::discover(path).map_err(|_| StoreError::NotARepo {
            path: path.to_path_buf(),
        })?;

        Ok(Self { repo })
    }

    /// Get the path of the git directory.
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// Get the working directory, if the repository has one.
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Check whether the repository is bare.
    pub fn is_bare(&self) -> bool {
        self.repo.is_bare()
    }

    // =========================================================================
    // References and HEAD
    // =========================================================================

    /// List all references except HEAD, resolved to their direct targets.
    ///
    /// Symbolic refs are resolved through; a symbolic ref whose target
    /// ref does not exist is skipped. Results are sorted by name.
    pub fn references(&self) -> Result<Vec<RefRecord>, StoreError> {
        let refs = self
            .repo
            .references()
            .map_err(|e| StoreError::from_git2(e, "refs"))?;

        let mut out = Vec::new();
        for result in refs {
            let reference = result.map_err(|e| StoreError::from_git2(e, "refs"))?;
            // Non-UTF-8 ref names are skipped
            let name = match reference.name() {
                Some(n) if n != "HEAD" => n.to_string(),
                _ => continue,
            };
            let target = match reference.resolve().ok().and_then(|direct| direct.target()) {
                Some(t) => t,
                None => continue,
            };
            out.push(RefRecord {
                name,
                target: ObjectId::new(target.to_string())?,
            });
        }

        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    /// Get the state of HEAD without resolving it.
    pub fn head(&self) -> Result<HeadState, StoreError> {
        let head = self
            .repo
            .find_reference("HEAD")
            .map_err(|e| StoreError::from_git2(e, "HEAD"))?;

        if let Some(target) = head.symbolic_target() {
            return Ok(HeadState::Symbolic {
                target: target.to_string(),
            });
        }
        match head.target() {
            Some(oid) => Ok(HeadState::Detached {
                id: ObjectId::new(oid.to_string())?,
            }),
            None => Err(StoreError::Internal {
                message: "HEAD has no target".to_string(),
            }),
        }
    }

    /// Get the tree of the commit HEAD resolves to.
    ///
    /// Returns `None` when HEAD is unborn (fresh repository with no
    /// commits).
    pub fn head_tree(&self) -> Result<Option<ObjectId>, StoreError> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                return Ok(None)
            }
            Err(e) => return Err(StoreError::from_git2(e, "HEAD")),
        };

        let tree = head
            .peel_to_tree()
            .map_err(|e| StoreError::from_git2(e, "HEAD"))?;
        Ok(Some(ObjectId::new(tree.id().to_string())?))
    }

    // =========================================================================
    // Index
    // =========================================================================

    /// Diff the staged index against the given HEAD tree.
    ///
    /// A `None` base tree means an unborn HEAD; the diff is defined as
    /// empty in that case, regardless of what the on-disk index holds.
    /// Bare repositories have an empty index and likewise diff empty.
    pub fn index_changes(
        &self,
        head_tree: Option<&ObjectId>,
    ) -> Result<Vec<IndexChange>, StoreError> {
        let head_tree = match head_tree {
            Some(id) => id,
            None => return Ok(Vec::new()),
        };

        let tree = self
            .repo
            .find_tree(Self::parse_oid(head_tree)?)
            .map_err(|e| StoreError::from_git2(e, head_tree.as_str()))?;
        let index = self
            .repo
            .index()
            .map_err(|e| StoreError::from_git2(e, "index"))?;
        let diff = self
            .repo
            .diff_tree_to_index(Some(&tree), Some(&index), None)
            .map_err(|e| StoreError::from_git2(e, "index diff"))?;

        let mut changes = Vec::new();
        for delta in diff.deltas() {
            changes.push(IndexChange {
                old_path: path_string(delta.old_file().path()),
                new_path: path_string(delta.new_file().path()),
                old_id: nonzero_id(delta.old_file().id())?,
                new_id: nonzero_id(delta.new_file().id())?,
                old_mode: mode_bits(delta.old_file().mode()),
                new_mode: mode_bits(delta.new_file().mode()),
            });
        }
        Ok(changes)
    }

    // =========================================================================
    // Change Detection
    // =========================================================================

    /// Compute the repository state fingerprint.
    ///
    /// Covers refs, the raw HEAD target, staged index entries, and the
    /// object count. Watch mode polls this to decide when to run a pass.
    pub fn fingerprint(&self) -> Result<Fingerprint, StoreError> {
        let refs: Vec<(String, ObjectId)> = self
            .references()?
            .into_iter()
            .map(|r| (r.name, r.target))
            .collect();

        let head = match self.head()? {
            HeadState::Symbolic { target } => format!("ref: {}", target),
            HeadState::Detached { id } => id.to_string(),
        };

        let index = self
            .repo
            .index()
            .map_err(|e| StoreError::from_git2(e, "index"))?;
        let mut entries = Vec::with_capacity(index.len());
        for entry in index.iter() {
            let path = String::from_utf8_lossy(&entry.path).into_owned();
            entries.push((path, ObjectId::new(entry.id.to_string())?));
        }

        let odb = self
            .repo
            .odb()
            .map_err(|e| StoreError::from_git2(e, "odb"))?;
        let mut count = 0usize;
        odb.foreach(|_| {
            count += 1;
            true
        })
        .map_err(|e| StoreError::from_git2(e, "odb iteration"))?;

        Ok(Fingerprint::compute(&refs, &head, &entries, count))
    }

    // =========================================================================
    // Object Decoding
    // =========================================================================

    fn parse_oid(id: &ObjectId) -> Result<git2::Oid, StoreError> {
        git2::Oid::from_str(id.as_str()).map_err(|_| StoreError::InvalidId {
            message: id.to_string(),
        })
    }

    fn decode_commit(&self, oid: git2::Oid) -> Result<RepoObject, StoreError> {
        let commit = self
            .repo
            .find_commit(oid)
            .map_err(|e| StoreError::from_git2(e, &oid.to_string()))?;

        let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
        let tree = ObjectId::new(commit.tree_id().to_string())?;
        let mut parents = Vec::with_capacity(commit.parent_count());
        for parent in commit.parent_ids() {
            parents.push(ObjectId::new(parent.to_string())?);
        }

        let author = commit.author();
        let author_name = String::from_utf8_lossy(author.name_bytes()).into_owned();
        let author_email = String::from_utf8_lossy(author.email_bytes()).into_owned();
        let author_time = DateTime::from_timestamp(author.when().seconds(), 0)
            .unwrap_or(DateTime::UNIX_EPOCH);

        Ok(RepoObject::Commit(CommitRecord {
            message,
            tree,
            parents,
            author_name,
            author_email,
            author_time,
        }))
    }

    fn decode_tree(&self, oid: git2::Oid) -> Result<RepoObject, StoreError> {
        let tree = self
            .repo
            .find_tree(oid)
            .map_err(|e| StoreError::from_git2(e, &oid.to_string()))?;

        let mut entries = Vec::with_capacity(tree.len());
        for entry in tree.iter() {
            entries.push(TreeEntry {
                mode: entry.filemode() as u32,
                name: String::from_utf8_lossy(entry.name_bytes()).into_owned(),
                target: ObjectId::new(entry.id().to_string())?,
            });
        }
        Ok(RepoObject::Tree(TreeRecord { entries }))
    }

    fn decode_blob(&self, oid: git2::Oid) -> Result<RepoObject, StoreError> {
        let blob = self
            .repo
            .find_blob(oid)
            .map_err(|e| StoreError::from_git2(e, &oid.to_string()))?;

        Ok(RepoObject::Blob(BlobRecord {
            content: blob.content().to_vec(),
        }))
    }
}

impl ObjectStore for GitStore {
    /// Enumerate every commit, tree, and blob in the odb.
    ///
    /// Annotated tag objects are filtered out; a tag's target commit is
    /// still enumerated in its own right.
    fn enumerate(&self) -> Result<Vec<(ObjectId, ObjectKind)>, StoreError> {
        let odb = self
            .repo
            .odb()
            .map_err(|e| StoreError::from_git2(e, "odb"))?;

        let mut raw = Vec::new();
        odb.foreach(|oid| {
            raw.push(*oid);
            true
        })
        .map_err(|e| StoreError::from_git2(e, "odb iteration"))?;

        let mut out = Vec::with_capacity(raw.len());
        for oid in raw {
            let (_, otype) = odb
                .read_header(oid)
                .map_err(|e| StoreError::from_git2(e, &oid.to_string()))?;
            let kind = match otype {
                git2::ObjectType::Commit => ObjectKind::Commit,
                git2::ObjectType::Tree => ObjectKind::Tree,
                git2::ObjectType::Blob => ObjectKind::Blob,
                _ => continue,
            };
            out.push((ObjectId::new(oid.to_string())?, kind));
        }
        Ok(out)
    }

    fn fetch(&self, id: &ObjectId) -> Result<RepoObject, StoreError> {
        let oid = Self::parse_oid(id)?;
        let odb = self
            .repo
            .odb()
            .map_err(|e| StoreError::from_git2(e, "odb"))?;
        let (_, otype) = odb
            .read_header(oid)
            .map_err(|e| StoreError::from_git2(e, id.as_str()))?;

        match otype {
            git2::ObjectType::Commit => self.decode_commit(oid),
            git2::ObjectType::Tree => self.decode_tree(oid),
            git2::ObjectType::Blob => self.decode_blob(oid),
            other => Err(StoreError::Internal {
                message: format!("unsupported object type {:?} for {}", other, id),
            }),
        }
    }
}

fn path_string(path: Option<&Path>) -> Option<String> {
    path.map(|p| p.to_string_lossy().into_owned())
}

fn nonzero_id(oid: git2::Oid) -> Result<Option<ObjectId>, StoreError> {
    if oid.is_zero() {
        Ok(None)
    } else {
        Ok(Some(ObjectId::new(oid.to_string())?))
    }
}

fn mode_bits(mode: git2::FileMode) -> Option<u32> {
    match i32::from(mode) {
        0 => None,
        m => Some(m as u32),
    }
}
