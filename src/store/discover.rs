//! store::discover
//!
//! Filesystem-level repository detection.
//!
//! Used by `gitviz repos` to list the repositories directly under a
//! directory without opening each one. Detection is purely structural:
//! a `.git` child (directory, or the file form worktrees use) marks a
//! normal repository; the hooks/info/objects/refs layout marks a bare
//! one.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::store::errors::StoreError;

/// Directories that together mark a bare repository layout.
const BARE_MARKERS: &[&str] = &["hooks", "info", "objects", "refs"];

/// One discovered repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoEntry {
    /// Directory name under the listing root
    pub name: String,
    /// Full path to the repository
    pub path: PathBuf,
    /// Whether the repository is bare
    pub bare: bool,
}

/// Check whether a directory is a git repository (normal or bare).
pub fn is_repository(path: &Path) -> bool {
    path.join(".git").exists() || is_bare_layout(path)
}

fn is_bare_layout(path: &Path) -> bool {
    BARE_MARKERS.iter().all(|dir| path.join(dir).is_dir())
}

/// List the git repositories directly under `root`, sorted by name.
///
/// Only immediate children are examined; this does not recurse.
///
/// # Errors
///
/// Returns [`StoreError::Access`] if `root` cannot be read.
pub fn list_repositories(root: &Path) -> Result<Vec<RepoEntry>, StoreError> {
    let entries = std::fs::read_dir(root).map_err(|e| StoreError::Access {
        message: format!("cannot read {}: {}", root.display(), e),
    })?;

    let mut repos = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::Access {
            message: format!("cannot read {}: {}", root.display(), e),
        })?;
        let path = entry.path();
        if !path.is_dir() || !is_repository(&path) {
            continue;
        }
        repos.push(RepoEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            bare: !path.join(".git").exists(),
            path,
        });
    }

    repos.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(repos)
}
