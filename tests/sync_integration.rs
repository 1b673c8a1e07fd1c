//! Integration tests for synchronization passes over real repositories.
//!
//! These tests create real git repositories via tempfile and the git CLI,
//! then run sessions against them to verify the walk, overlay, and
//! reconcile phases against actual on-disk state.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use gitviz::core::types::ObjectId;
use gitviz::dot::{self, DotOptions};
use gitviz::session::{Session, SessionOptions};
use gitviz::store::{list_repositories, GitStore, StoreError};

/// Test fixture that creates a real git repository.
struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new test repository with an initial commit on main.
    fn new() -> Self {
        let repo = Self::new_empty();
        std::fs::write(repo.path().join("README.md"), "# Test Repo\n").unwrap();
        run_git(repo.path(), &["add", "README.md"]);
        run_git(repo.path(), &["commit", "-m", "Initial commit"]);
        repo
    }

    /// Create an initialized repository with no commits (unborn HEAD).
    fn new_empty() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init", "-b", "main"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);

        Self { dir }
    }

    /// Get the path to the repository.
    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open a store on this repository.
    fn store(&self) -> GitStore {
        GitStore::open(self.path()).expect("failed to open test repo")
    }

    /// Create a file and commit it, returning the new commit id.
    fn commit_file(&self, path: &str, content: &str, message: &str) -> ObjectId {
        std::fs::write(self.path().join(path), content).unwrap();
        run_git(self.path(), &["add", path]);
        run_git(self.path(), &["commit", "-m", message]);
        self.head_id()
    }

    /// Get HEAD's commit id using git directly.
    fn head_id(&self) -> ObjectId {
        let raw = run_git_capture(self.path(), &["rev-parse", "HEAD"]);
        ObjectId::new(raw.trim()).expect("rev-parse returned a bad id")
    }

    /// Write a blob straight into the odb, bypassing any ref.
    fn hash_object(&self, content: &str) -> ObjectId {
        let scratch = self.path().join(".gitviz-scratch");
        std::fs::write(&scratch, content).unwrap();
        let raw = run_git_capture(self.path(), &["hash-object", "-w", ".gitviz-scratch"]);
        std::fs::remove_file(&scratch).unwrap();
        ObjectId::new(raw.trim()).expect("hash-object returned a bad id")
    }

    /// Path of the loose object file for the given id.
    fn loose_object_path(&self, id: &ObjectId) -> PathBuf {
        self.path()
            .join(".git/objects")
            .join(&id.as_str()[..2])
            .join(&id.as_str()[2..])
    }
}

/// Run a git command in the given directory.
fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Run a git command and capture its stdout.
fn run_git_capture(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8(output.stdout).unwrap()
}

/// Serialize a session's graph with default options.
fn dot_text(session: &Session) -> String {
    dot::serialize(session.graph(), &DotOptions::default())
}

// =============================================================================
// First Pass
// =============================================================================

#[test]
fn fresh_repository_builds_commit_tree_blob_and_overlay() {
    let repo = TestRepo::new();
    let mut session = Session::new(SessionOptions::default());

    let stats = session.sync(&repo.store()).unwrap();

    // commit + tree + blob objects, plus the branch and HEAD nodes
    assert_eq!(stats.created, 3);
    assert_eq!(stats.vertices, 5);
    // tree + entry edges from the walk, ref + head from the overlay
    assert_eq!(stats.edges, 4);
    assert_eq!(stats.refs, 1);
    assert_eq!(stats.dangling_refs, 0);
    assert_eq!(stats.missing_objects, 0);
    assert_eq!(stats.pruned, 0);
}

#[test]
fn dot_output_lists_branch_head_and_tree() {
    let repo = TestRepo::new();
    let mut session = Session::new(SessionOptions::default());
    session.sync(&repo.store()).unwrap();

    let out = dot_text(&session);

    assert!(out.starts_with("digraph {\n"));
    assert!(out.contains("label=\"main\""));
    assert!(out.contains("\"HEAD\" -> \"refs/heads/main\" [style=dotted];"));
    assert!(out.contains("shape=folder"));
    // Blob label comes from file content
    assert!(out.contains("label=\"# Test Repo\""));
    // Tree entry edges carry the file name, indented
    assert!(out.contains("label=\"  README.md\""));
}

// =============================================================================
// Incremental Passes
// =============================================================================

#[test]
fn second_pass_on_unchanged_repository_is_stable() {
    let repo = TestRepo::new();
    let mut session = Session::new(SessionOptions::default());

    let first = session.sync(&repo.store()).unwrap();
    let before = dot_text(&session);
    let second = session.sync(&repo.store()).unwrap();

    assert_eq!(second.vertices, first.vertices);
    assert_eq!(second.edges, first.edges);
    assert_eq!(second.created, 0);
    assert_eq!(second.pruned, 0);
    // Byte-identical serialization for identical state
    assert_eq!(dot_text(&session), before);
}

#[test]
fn new_commit_is_synchronized_incrementally() {
    let repo = TestRepo::new();
    let mut session = Session::new(SessionOptions::default());
    session.sync(&repo.store()).unwrap();

    let commit = repo.commit_file("next.txt", "more\n", "Second commit");
    let stats = session.sync(&repo.store()).unwrap();

    // new blob, new root tree, new commit
    assert_eq!(stats.created, 3);
    assert_eq!(stats.pruned, 0);
    assert!(session.graph().contains_object(&commit));
}

#[test]
fn pruned_object_is_retired() {
    let repo = TestRepo::new();
    let orphan = repo.hash_object("stray content\n");
    let mut session = Session::new(SessionOptions::default());

    session.sync(&repo.store()).unwrap();
    assert!(session.graph().contains_object(&orphan));

    std::fs::remove_file(repo.loose_object_path(&orphan)).unwrap();
    let stats = session.sync(&repo.store()).unwrap();

    assert_eq!(stats.pruned, 1);
    assert!(!session.graph().contains_object(&orphan));
}

// =============================================================================
// Refs and HEAD
// =============================================================================

#[test]
fn dangling_ref_keeps_node_without_edge() {
    let repo = TestRepo::new();
    let phantom = repo.path().join(".git/refs/heads/phantom");
    std::fs::write(&phantom, format!("{}\n", "a".repeat(40))).unwrap();

    let mut session = Session::new(SessionOptions::default());
    let stats = session.sync(&repo.store()).unwrap();
    let out = dot_text(&session);

    assert_eq!(stats.dangling_refs, 1);
    assert!(out.contains("\"refs/heads/phantom\" ["));
    assert!(!out.contains("\"refs/heads/phantom\" ->"));
}

#[test]
fn remote_ref_gets_prefixed_label() {
    let repo = TestRepo::new();
    run_git(repo.path(), &["update-ref", "refs/remotes/origin/main", "HEAD"]);

    let mut session = Session::new(SessionOptions::default());
    session.sync(&repo.store()).unwrap();
    let out = dot_text(&session);

    assert!(out.contains("label=\"remote: origin/main\""));
}

#[test]
fn detached_head_links_to_commit() {
    let repo = TestRepo::new();
    run_git(repo.path(), &["checkout", "-q", "--detach"]);
    let head = repo.head_id();

    let mut session = Session::new(SessionOptions::default());
    session.sync(&repo.store()).unwrap();
    let out = dot_text(&session);

    assert!(out.contains(&format!("\"HEAD\" -> \"{}\" [style=dotted];", head)));
}

// =============================================================================
// Index Overlay
// =============================================================================

#[test]
fn staged_change_draws_index_overlay() {
    let repo = TestRepo::new();
    std::fs::write(repo.path().join("README.md"), "# Edited\n").unwrap();
    run_git(repo.path(), &["add", "README.md"]);

    let mut session = Session::new(SessionOptions::default());
    let stats = session.sync(&repo.store()).unwrap();
    let out = dot_text(&session);

    assert_eq!(stats.index_entries, 1);
    assert!(out.contains("\"index\" ["));
    assert!(out.contains("\"index\" ->"));
    assert!(out.contains("label=\"  README.md\""));
}

#[test]
fn unborn_head_suppresses_index_overlay() {
    let repo = TestRepo::new_empty();
    std::fs::write(repo.path().join("first.txt"), "hello\n").unwrap();
    run_git(repo.path(), &["add", "first.txt"]);

    let mut session = Session::new(SessionOptions::default());
    let stats = session.sync(&repo.store()).unwrap();
    let out = dot_text(&session);

    // The staged blob exists in the odb and is walked as an orphan, but
    // there is no HEAD tree to diff against, so no index node appears
    assert_eq!(stats.index_entries, 0);
    assert_eq!(session.graph().object_count(), 1);
    assert!(!out.contains("\"index\" ["));
    // Unborn symbolic HEAD still points at its branch-to-be
    assert!(out.contains("\"HEAD\" -> \"refs/heads/main\" [style=dotted];"));
}

// =============================================================================
// Orphans, Corruption, Degradation
// =============================================================================

#[test]
fn orphaned_blob_is_surfaced() {
    let repo = TestRepo::new();
    let orphan = repo.hash_object("unreferenced\n");

    let mut session = Session::new(SessionOptions::default());
    session.sync(&repo.store()).unwrap();

    assert!(session.graph().contains_object(&orphan));
    // The orphan has a vertex but nothing points at it
    let out = dot_text(&session);
    assert!(!out.contains(&format!("-> \"{}\"", orphan)));
}

#[test]
fn corrupt_object_aborts_pass() {
    let repo = TestRepo::new();
    let victim = repo.hash_object("soon to be garbage\n");
    let path = repo.loose_object_path(&victim);
    std::fs::remove_file(&path).unwrap();
    std::fs::write(&path, b"not a zlib stream").unwrap();

    let mut session = Session::new(SessionOptions::default());
    let err = session.sync(&repo.store()).unwrap_err();

    assert!(matches!(err, StoreError::Corrupt { .. }), "got {:?}", err);
}

// =============================================================================
// Repository Shapes
// =============================================================================

#[test]
fn bare_repository_is_accepted() {
    let dir = TempDir::new().unwrap();
    run_git(dir.path(), &["init", "--bare", "-b", "main"]);

    let store = GitStore::open(dir.path()).unwrap();
    assert!(store.is_bare());

    let mut session = Session::new(SessionOptions::default());
    let stats = session.sync(&store).unwrap();

    assert_eq!(stats.index_entries, 0);
    assert_eq!(session.graph().object_count(), 0);
}

#[test]
fn merge_commit_first_parent_is_heaviest() {
    let repo = TestRepo::new();
    run_git(repo.path(), &["checkout", "-q", "-b", "side"]);
    repo.commit_file("side.txt", "side\n", "Side commit");
    run_git(repo.path(), &["checkout", "-q", "main"]);
    repo.commit_file("main.txt", "main\n", "Main commit");
    run_git(repo.path(), &["merge", "side", "-m", "Merge side"]);
    let merge = repo.head_id();

    let mut session = Session::new(SessionOptions::default());
    session.sync(&repo.store()).unwrap();
    let out = dot_text(&session);

    assert!(out.contains(&format!("\"{}\" -> ", merge)));
    // Two parents: the first gets weight 3, the second weight 2
    assert!(out.contains("weight=3"));
    assert!(out.contains("weight=2"));
}

#[test]
fn excluding_blobs_leaves_commits_only() {
    let repo = TestRepo::new();
    repo.commit_file("extra.txt", "x\n", "Second commit");

    let mut session = Session::new(SessionOptions {
        include_blobs: false,
        ..Default::default()
    });
    session.sync(&repo.store()).unwrap();
    let out = dot_text(&session);

    assert_eq!(session.graph().object_count(), 2);
    assert!(!out.contains("shape=folder"));
    assert!(!out.contains("shape=ellipse"));
}

// =============================================================================
// Change Detection
// =============================================================================

#[test]
fn fingerprint_is_stable_and_moves_on_commit() {
    let repo = TestRepo::new();

    let store = repo.store();
    let first = store.fingerprint().unwrap();
    assert_eq!(store.fingerprint().unwrap(), first);

    repo.commit_file("change.txt", "x\n", "Move the fingerprint");
    let moved = repo.store().fingerprint().unwrap();
    assert_ne!(moved, first);
}

#[test]
fn fingerprint_moves_on_orphan_write() {
    let repo = TestRepo::new();
    let first = repo.store().fingerprint().unwrap();

    // No ref moves, only the object count changes
    repo.hash_object("orphan\n");
    let moved = repo.store().fingerprint().unwrap();

    assert_ne!(moved, first);
}

// =============================================================================
// Opening and Discovery
// =============================================================================

#[test]
fn open_from_subdirectory() {
    let repo = TestRepo::new();
    let subdir = repo.path().join("subdir");
    std::fs::create_dir(&subdir).unwrap();

    assert!(GitStore::open(&subdir).is_ok());
}

#[test]
fn open_non_repository_fails() {
    let dir = TempDir::new().unwrap();
    let err = GitStore::open(dir.path()).unwrap_err();
    assert!(matches!(err, StoreError::NotARepo { .. }));
}

#[test]
fn repositories_discovered_under_root() {
    let root = TempDir::new().unwrap();
    run_git(root.path(), &["init", "-b", "main", "alpha"]);
    run_git(root.path(), &["init", "--bare", "-b", "main", "bravo.git"]);
    std::fs::create_dir(root.path().join("plain")).unwrap();
    std::fs::write(root.path().join("notes.txt"), "x").unwrap();

    let entries = list_repositories(root.path()).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "alpha");
    assert!(!entries[0].bare);
    assert_eq!(entries[1].name, "bravo.git");
    assert!(entries[1].bare);
}
