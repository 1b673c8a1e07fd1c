//! graph::walker
//!
//! Depth-first traversal over the object store.
//!
//! # Design
//!
//! The walk seeds from *every* hash the store enumerates, not only from
//! refs. Orphaned objects (a `git hash-object -w` stray, a commit whose
//! branch was deleted) surface in the graph on purpose; hiding them
//! would defeat the point of visualizing the whole store.
//!
//! Traversal uses an explicit work stack rather than recursion, so a
//! pathological history of thousands of linear ancestors cannot overflow
//! the thread stack. A `visited` set guarantees each hash expands at
//! most once per pass, which both bounds the work and terminates the
//! walk even on a malformed store with a self-referencing tree entry.
//!
//! Child edges are drawn at the referencing site, before the visited
//! check gates descent: a tree holding the same blob under two names
//! draws both entry edges, and a blob shared by two trees gets one
//! vertex with two incoming edges.
//!
//! # Failure semantics
//!
//! A hash that fetches as [`StoreError::NotFound`] is tolerated: the
//! subtree is skipped and the id is recorded in
//! [`WalkOutcome::missing`]. Any other fetch failure (notably
//! [`StoreError::Corrupt`]) aborts the whole pass.

use std::collections::{BTreeSet, HashSet};

use crate::core::types::ObjectId;
use crate::graph::model::{EdgeAttrs, EdgeKind, NodeIndex, VizGraph};
use crate::graph::style::{self, LabelStyle};
use crate::store::{CommitRecord, ObjectKind, ObjectStore, RepoObject, StoreError, TreeRecord};

/// Layout weight of the commit-to-tree edge; lighter than any parent
/// edge so lineage dominates the layout.
const TREE_EDGE_WEIGHT: u32 = 1;

/// Result of one walk over the store.
#[derive(Debug)]
pub struct WalkOutcome {
    /// Every hash that received a vertex this pass. This is the set
    /// [`VizGraph::reconcile`] must be called with.
    pub reachable: HashSet<ObjectId>,
    /// Referenced hashes the store no longer has, in sorted order.
    pub missing: Vec<ObjectId>,
}

/// One depth-first walk over an object store.
///
/// Borrows the graph for the duration of the walk; constructing a new
/// walker per pass keeps the visited set scoped to that pass.
pub struct Walker<'a, S: ObjectStore> {
    store: &'a S,
    graph: &'a mut VizGraph,
    include_blobs: bool,
    style: &'a LabelStyle,
    visited: HashSet<ObjectId>,
    reachable: HashSet<ObjectId>,
    missing: BTreeSet<ObjectId>,
}

impl<'a, S: ObjectStore> Walker<'a, S> {
    /// Create a walker for one pass.
    pub fn new(
        store: &'a S,
        graph: &'a mut VizGraph,
        include_blobs: bool,
        style: &'a LabelStyle,
    ) -> Self {
        Self {
            store,
            graph,
            include_blobs,
            style,
            visited: HashSet::new(),
            reachable: HashSet::new(),
            missing: BTreeSet::new(),
        }
    }

    /// Run the walk to completion.
    pub fn run(mut self) -> Result<WalkOutcome, StoreError> {
        for (id, kind) in self.store.enumerate()? {
            // Blob gating skips blobs and trees together; a commit's tree
            // is likewise not descended into below.
            if !self.include_blobs && matches!(kind, ObjectKind::Blob | ObjectKind::Tree) {
                continue;
            }
            self.descend(id)?;
        }
        Ok(WalkOutcome {
            reachable: self.reachable,
            missing: self.missing.into_iter().collect(),
        })
    }

    /// Expand one seed and everything reachable from it.
    fn descend(&mut self, seed: ObjectId) -> Result<(), StoreError> {
        let mut stack = vec![seed];
        while let Some(id) = stack.pop() {
            if self.visited.contains(&id) {
                continue;
            }
            // An enumerated hash can vanish before we fetch it (a gc
            // racing the walk); treat that like any missing reference.
            let object = match self.store.try_fetch(&id)? {
                Some(object) => object,
                None => {
                    self.missing.insert(id.clone());
                    self.visited.insert(id);
                    continue;
                }
            };
            self.visited.insert(id.clone());
            let vertex = self.ensure(&id, &object);

            match object {
                RepoObject::Blob(_) => {}
                RepoObject::Tree(tree) => self.expand_tree(vertex, &tree, &mut stack)?,
                RepoObject::Commit(commit) => self.expand_commit(vertex, &commit, &mut stack)?,
            }
        }
        Ok(())
    }

    /// Register a vertex and record it reachable.
    fn ensure(&mut self, id: &ObjectId, object: &RepoObject) -> NodeIndex {
        self.reachable.insert(id.clone());
        self.graph.ensure_object(id, object, self.style)
    }

    /// Resolve a referenced hash to a vertex, recording it missing when
    /// the store no longer has it.
    fn resolve(&mut self, id: &ObjectId) -> Result<Option<NodeIndex>, StoreError> {
        match self.store.try_fetch(id)? {
            Some(object) => Ok(Some(self.ensure(id, &object))),
            None => {
                self.missing.insert(id.clone());
                Ok(None)
            }
        }
    }

    fn expand_tree(
        &mut self,
        vertex: NodeIndex,
        tree: &TreeRecord,
        stack: &mut Vec<ObjectId>,
    ) -> Result<(), StoreError> {
        for entry in &tree.entries {
            // The edge is drawn at the referencing entry, so two entries
            // naming the same child each get their own labeled edge.
            if let Some(child) = self.resolve(&entry.target)? {
                self.graph.connect(
                    vertex,
                    child,
                    EdgeAttrs::labeled(EdgeKind::Entry, style::edge_label(&entry.name)),
                );
                stack.push(entry.target.clone());
            }
        }
        Ok(())
    }

    fn expand_commit(
        &mut self,
        vertex: NodeIndex,
        commit: &CommitRecord,
        stack: &mut Vec<ObjectId>,
    ) -> Result<(), StoreError> {
        if self.include_blobs {
            if let Some(tree) = self.resolve(&commit.tree)? {
                self.graph
                    .connect(vertex, tree, EdgeAttrs::weighted(EdgeKind::Tree, TREE_EDGE_WEIGHT));
                stack.push(commit.tree.clone());
            }
        }

        // First parent heaviest, so primary lineage renders more
        // prominently than merge lineage.
        let parent_count = commit.parents.len() as u32;
        for (i, parent_id) in commit.parents.iter().enumerate() {
            if let Some(parent) = self.resolve(parent_id)? {
                let weight = parent_count - i as u32 + 1;
                self.graph
                    .connect(vertex, parent, EdgeAttrs::weighted(EdgeKind::Parent, weight));
                stack.push(parent_id.clone());
            }
        }
        Ok(())
    }
}
