//! session
//!
//! The explicit lifecycle object for synchronization passes.
//!
//! # Design
//!
//! A [`Session`] owns the [`VizGraph`] and the options that shape it,
//! and runs one pass at a time: walk, then overlay, then reconcile, in
//! that order and never interleaved. The registry persists across
//! passes, so a long-running watch session only adds and retires
//! vertices instead of rebuilding the graph from scratch.
//!
//! `sync` takes `&mut self`, which serializes passes by construction:
//! two walks can never interleave their mutation of the registry.

use serde::Serialize;

use crate::graph::{overlay, OverlayInput, VizGraph, Walker};
use crate::graph::style::LabelStyle;
use crate::store::{GitStore, ObjectStore, StoreError};

/// Options shaping what a pass builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Include blob and tree objects (and their edges)
    pub include_blobs: bool,
    /// Include the staged-index overlay
    pub include_index: bool,
    /// Label construction settings
    pub style: LabelStyle,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            include_blobs: true,
            include_index: true,
            style: LabelStyle::default(),
        }
    }
}

/// What one synchronization pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PassStats {
    /// Total nodes after the pass, overlay included
    pub vertices: usize,
    /// Total edges after the pass
    pub edges: usize,
    /// Object vertices created this pass
    pub created: usize,
    /// Object vertices retired by reconciliation
    pub pruned: usize,
    /// Ref nodes emitted
    pub refs: usize,
    /// Refs whose target had no walked vertex
    pub dangling_refs: usize,
    /// Staged changes considered for the index overlay
    pub index_entries: usize,
    /// Referenced hashes absent from the store
    pub missing_objects: usize,
}

/// A synchronization session: one registry, many passes.
#[derive(Debug, Default)]
pub struct Session {
    graph: VizGraph,
    options: SessionOptions,
}

impl Session {
    /// Create a session with the given options.
    pub fn new(options: SessionOptions) -> Self {
        Self {
            graph: VizGraph::new(),
            options,
        }
    }

    /// The current graph, for serialization.
    pub fn graph(&self) -> &VizGraph {
        &self.graph
    }

    /// The session options.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Run one pass against a git repository.
    ///
    /// Gathers refs, HEAD, and (unless disabled or the repository is
    /// bare) the staged-index diff, then delegates to
    /// [`sync_with`](Self::sync_with). The store is assumed stable for
    /// the duration of the pass.
    pub fn sync(&mut self, store: &GitStore) -> Result<PassStats, StoreError> {
        let refs = store.references()?;
        let head = store.head()?;
        let index = if self.options.include_index && !store.is_bare() {
            let head_tree = store.head_tree()?;
            store.index_changes(head_tree.as_ref())?
        } else {
            Vec::new()
        };

        self.sync_with(
            store,
            OverlayInput {
                refs,
                head: Some(head),
                index,
            },
        )
    }

    /// Run one pass against any object store, with the overlay state
    /// supplied by the caller.
    pub fn sync_with<S: ObjectStore>(
        &mut self,
        store: &S,
        input: OverlayInput,
    ) -> Result<PassStats, StoreError> {
        let registered_before = self.graph.object_count();

        self.graph.begin_pass();
        let outcome = Walker::new(
            store,
            &mut self.graph,
            self.options.include_blobs,
            &self.options.style,
        )
        .run()?;
        let overlay_stats = overlay::apply(&mut self.graph, &input);
        let pruned = self.graph.reconcile(&outcome.reachable);

        // Every reachable hash has a vertex after reconcile, so the
        // delta over the pass's survivors is exactly the new vertices.
        let survivors = registered_before - pruned;
        let created = outcome.reachable.len() - survivors;

        Ok(PassStats {
            vertices: self.graph.node_count(),
            edges: self.graph.edge_count(),
            created,
            pruned,
            refs: overlay_stats.refs,
            dangling_refs: overlay_stats.dangling_refs,
            index_entries: overlay_stats.index_entries,
            missing_objects: outcome.missing.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{HeadState, MemoryStore, RefRecord};

    fn seeded_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        let blob = store.add_blob("b1", b"content");
        let tree = store.add_tree("a1", &[("f.txt", &blob)]);
        store.add_commit("c1", &tree, &[]);
        store
    }

    fn main_overlay() -> OverlayInput {
        OverlayInput {
            refs: vec![RefRecord {
                name: "refs/heads/main".to_string(),
                target: MemoryStore::id("c1"),
            }],
            head: Some(HeadState::Symbolic {
                target: "refs/heads/main".to_string(),
            }),
            index: Vec::new(),
        }
    }

    #[test]
    fn first_pass_builds_everything() {
        let store = seeded_store();
        let mut session = Session::new(SessionOptions::default());

        let stats = session.sync_with(&store, main_overlay()).unwrap();

        // 3 objects + branch + HEAD
        assert_eq!(stats.vertices, 5);
        assert_eq!(stats.created, 3);
        assert_eq!(stats.pruned, 0);
        assert_eq!(stats.refs, 1);
        assert_eq!(stats.dangling_refs, 0);
        // entry + tree + ref + head edges
        assert_eq!(stats.edges, 4);
    }

    #[test]
    fn second_pass_is_stable() {
        let store = seeded_store();
        let mut session = Session::new(SessionOptions::default());

        let first = session.sync_with(&store, main_overlay()).unwrap();
        let second = session.sync_with(&store, main_overlay()).unwrap();

        assert_eq!(second.vertices, first.vertices);
        assert_eq!(second.edges, first.edges);
        assert_eq!(second.created, 0);
        assert_eq!(second.pruned, 0);
    }

    #[test]
    fn reconciliation_removes_pruned_objects() {
        let mut store = seeded_store();
        let orphan = store.add_blob("b9", b"stray");
        let mut session = Session::new(SessionOptions::default());

        session.sync_with(&store, main_overlay()).unwrap();
        assert!(session.graph().contains_object(&orphan));

        store.remove(&orphan);
        let stats = session.sync_with(&store, main_overlay()).unwrap();

        assert_eq!(stats.pruned, 1);
        assert!(!session.graph().contains_object(&orphan));
        // No edge references the retired vertex
        assert!(session
            .graph()
            .edges()
            .all(|(s, t, _)| s.dot_id() != orphan.as_str() && t.dot_id() != orphan.as_str()));
    }

    #[test]
    fn new_objects_are_created_incrementally() {
        let mut store = seeded_store();
        let mut session = Session::new(SessionOptions::default());
        session.sync_with(&store, main_overlay()).unwrap();

        store.add_blob("b2", b"new");
        let stats = session.sync_with(&store, main_overlay()).unwrap();

        assert_eq!(stats.created, 1);
        assert_eq!(stats.pruned, 0);
    }

    #[test]
    fn blob_gating_flows_through_options() {
        let store = seeded_store();
        let mut session = Session::new(SessionOptions {
            include_blobs: false,
            ..Default::default()
        });

        let stats = session.sync_with(&store, OverlayInput::default()).unwrap();

        // Only the commit vertex
        assert_eq!(stats.vertices, 1);
        assert_eq!(stats.edges, 0);
    }

    #[test]
    fn dangling_ref_counted() {
        let store = seeded_store();
        let mut session = Session::new(SessionOptions::default());
        let input = OverlayInput {
            refs: vec![RefRecord {
                name: "refs/heads/gone".to_string(),
                target: MemoryStore::id("dead"),
            }],
            ..Default::default()
        };

        let stats = session.sync_with(&store, input).unwrap();

        assert_eq!(stats.dangling_refs, 1);
    }

    #[test]
    fn stats_serialize_to_json() {
        let store = seeded_store();
        let mut session = Session::new(SessionOptions::default());
        let stats = session.sync_with(&store, OverlayInput::default()).unwrap();

        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["vertices"], 3);
        assert_eq!(json["pruned"], 0);
    }
}
