//! graph::model
//!
//! The visual-graph value and its vertex registry.
//!
//! # Design
//!
//! [`VizGraph`] is the single owner of vertex identity. Object vertices
//! are keyed by [`ObjectId`] and live for as long as the hash stays
//! reachable: re-encountering a hash refreshes the existing vertex in
//! place, and [`VizGraph::reconcile`] retires every vertex whose hash
//! fell out of the reachable set. Overlay nodes (branches, HEAD, the
//! staged index) are not content-addressed; they are cheap and are
//! recreated on every pass.
//!
//! The backing structure is a petgraph `StableDiGraph`, so a vertex's
//! `NodeIndex` survives both edge clearing and the removal of other
//! vertices. That stability is what makes the registry incremental: a
//! long-running watch session only ever adds and retires vertices.
//!
//! # Pass lifecycle
//!
//! ```text
//! begin_pass()      clear edges, drop overlay nodes
//! ensure_*()        create or refresh vertices, connect edges
//! reconcile(set)    retire object vertices not in `set`
//! ```
//!
//! Edges never accumulate across passes: `begin_pass` clears them all and
//! the walk rebuilds the current set. Within one pass, parallel edges
//! between the same pair are allowed and meaningful (a tree holding the
//! same blob under two names draws two labeled edges).

use std::collections::{HashMap, HashSet};

use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

pub use petgraph::stable_graph::NodeIndex;

use crate::core::types::ObjectId;
use crate::graph::style::{self, LabelStyle, NodeAttrs};
use crate::store::RepoObject;

/// Stable identity of a node, used as its DOT id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKey {
    /// An immutable store object, keyed by hash
    Object(ObjectId),
    /// A branch or remote ref, keyed by full ref name
    Ref(String),
    /// The HEAD pointer
    Head,
    /// The staged-index overlay
    Index,
}

impl NodeKey {
    /// The identifier this node carries in serialized output.
    pub fn dot_id(&self) -> &str {
        match self {
            NodeKey::Object(id) => id.as_str(),
            NodeKey::Ref(name) => name,
            NodeKey::Head => "HEAD",
            NodeKey::Index => "index",
        }
    }
}

/// One graph node: identity, presentation, and (for object vertices) the
/// last-seen decoded object.
#[derive(Debug)]
pub struct Node {
    /// Stable identity
    pub key: NodeKey,
    /// Presentation attributes, recomputed on every refresh
    pub attrs: NodeAttrs,
    /// The decoded object, for object vertices only
    pub object: Option<RepoObject>,
}

/// The relationship an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// Commit to parent commit
    Parent,
    /// Commit to its tree
    Tree,
    /// Tree to one of its entries
    Entry,
    /// Branch node to its target object
    Ref,
    /// HEAD to the branch or commit it designates
    Head,
    /// Index node to a staged blob
    Index,
}

impl EdgeKind {
    /// Kind name, for debug output and tests.
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Parent => "parent",
            EdgeKind::Tree => "tree",
            EdgeKind::Entry => "entry",
            EdgeKind::Ref => "ref",
            EdgeKind::Head => "head",
            EdgeKind::Index => "index",
        }
    }

    /// Overlay edges render dotted; object edges solid.
    pub fn is_dotted(&self) -> bool {
        matches!(self, EdgeKind::Ref | EdgeKind::Head)
    }
}

/// One directed edge with its presentation metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeAttrs {
    /// What relationship the edge represents
    pub kind: EdgeKind,
    /// Optional label (entry name, staged path)
    pub label: Option<String>,
    /// Optional layout weight; heavier edges render straighter
    pub weight: Option<u32>,
}

impl EdgeAttrs {
    /// An edge with no label or weight.
    pub fn plain(kind: EdgeKind) -> Self {
        Self {
            kind,
            label: None,
            weight: None,
        }
    }

    /// A labeled edge.
    pub fn labeled(kind: EdgeKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: Some(label.into()),
            weight: None,
        }
    }

    /// A weighted edge.
    pub fn weighted(kind: EdgeKind, weight: u32) -> Self {
        Self {
            kind,
            label: None,
            weight: Some(weight),
        }
    }
}

/// Registry key for overlay nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum OverlayKey {
    Ref(String),
    Head,
    Index,
}

/// The visual graph: vertices, edges, and the hash-to-vertex registry.
///
/// Nothing outside this module constructs nodes; every vertex enters the
/// graph through an `ensure_*` method.
#[derive(Debug, Default)]
pub struct VizGraph {
    graph: StableDiGraph<Node, EdgeAttrs>,
    objects: HashMap<ObjectId, NodeIndex>,
    overlay: HashMap<OverlayKey, NodeIndex>,
}

impl VizGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a synchronization pass.
    ///
    /// Clears every edge and removes all overlay nodes. Object vertices
    /// persist; the walk refreshes the reachable ones and
    /// [`reconcile`](Self::reconcile) retires the rest.
    pub fn begin_pass(&mut self) {
        self.graph.clear_edges();
        for (_, index) in self.overlay.drain() {
            self.graph.remove_node(index);
        }
    }

    /// Get or create the vertex for an object, refreshing its stored
    /// object and presentation attributes.
    ///
    /// Idempotent within a pass: repeated calls for the same id return
    /// the same `NodeIndex`.
    pub fn ensure_object(
        &mut self,
        id: &ObjectId,
        object: &RepoObject,
        style: &LabelStyle,
    ) -> NodeIndex {
        let attrs = style::object_attrs(id, object, style);
        if let Some(&index) = self.objects.get(id) {
            let node = &mut self.graph[index];
            node.attrs = attrs;
            node.object = Some(object.clone());
            return index;
        }
        let index = self.graph.add_node(Node {
            key: NodeKey::Object(id.clone()),
            attrs,
            object: Some(object.clone()),
        });
        self.objects.insert(id.clone(), index);
        index
    }

    /// Get or create the branch node for a ref name.
    pub fn ensure_ref_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&index) = self.overlay.get(&OverlayKey::Ref(name.to_string())) {
            return index;
        }
        let index = self.graph.add_node(Node {
            key: NodeKey::Ref(name.to_string()),
            attrs: style::branch_attrs(name),
            object: None,
        });
        self.overlay.insert(OverlayKey::Ref(name.to_string()), index);
        index
    }

    /// Get or create the HEAD node.
    pub fn ensure_head_node(&mut self) -> NodeIndex {
        if let Some(&index) = self.overlay.get(&OverlayKey::Head) {
            return index;
        }
        let index = self.graph.add_node(Node {
            key: NodeKey::Head,
            attrs: style::head_attrs(),
            object: None,
        });
        self.overlay.insert(OverlayKey::Head, index);
        index
    }

    /// Get or create the staged-index node.
    pub fn ensure_index_node(&mut self) -> NodeIndex {
        if let Some(&index) = self.overlay.get(&OverlayKey::Index) {
            return index;
        }
        let index = self.graph.add_node(Node {
            key: NodeKey::Index,
            attrs: style::index_attrs(),
            object: None,
        });
        self.overlay.insert(OverlayKey::Index, index);
        index
    }

    /// Add a directed edge.
    pub fn connect(&mut self, source: NodeIndex, target: NodeIndex, attrs: EdgeAttrs) {
        self.graph.add_edge(source, target, attrs);
    }

    /// Retire every object vertex whose hash is absent from `reachable`.
    ///
    /// Removing a vertex also drops its incident edges. Must run only
    /// after a walk has completed, with that walk's full reachable set.
    /// Returns the number of vertices retired.
    pub fn reconcile(&mut self, reachable: &HashSet<ObjectId>) -> usize {
        let stale: Vec<(ObjectId, NodeIndex)> = self
            .objects
            .iter()
            .filter(|(id, _)| !reachable.contains(*id))
            .map(|(id, index)| (id.clone(), *index))
            .collect();

        for (id, index) in &stale {
            self.graph.remove_node(*index);
            self.objects.remove(id);
        }
        stale.len()
    }

    /// Look up the vertex for an object hash.
    pub fn object_index(&self, id: &ObjectId) -> Option<NodeIndex> {
        self.objects.get(id).copied()
    }

    /// Check whether an object hash is registered.
    pub fn contains_object(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Number of registered object vertices.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Total node count, overlay nodes included.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Total edge count.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The node behind an index.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.graph[index]
    }

    /// Iterate over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Iterate over all edges as (source key, target key, attributes).
    pub fn edges(&self) -> impl Iterator<Item = (&NodeKey, &NodeKey, &EdgeAttrs)> {
        self.graph.edge_references().map(|edge| {
            (
                &self.graph[edge.source()].key,
                &self.graph[edge.target()].key,
                edge.weight(),
            )
        })
    }
}
