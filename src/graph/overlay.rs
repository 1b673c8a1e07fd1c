//! graph::overlay
//!
//! Overlays mutable repository state onto the object graph.
//!
//! Refs, HEAD, and the staged index are not content-addressed: they move
//! between passes, so their nodes are recreated every pass rather than
//! registered. The overlay runs after the walk, when every reachable
//! object already has a vertex, and only ever *points into* the walked
//! set; a pointer whose target is not there (a dangling ref, a staged
//! deletion) keeps its node but draws no edge.

use crate::graph::model::{EdgeAttrs, EdgeKind, VizGraph};
use crate::graph::style;
use crate::store::{HeadState, IndexChange, RefRecord};

/// Mutable repository state consumed by one overlay application.
#[derive(Debug, Clone, Default)]
pub struct OverlayInput {
    /// All refs except HEAD, resolved to direct targets
    pub refs: Vec<RefRecord>,
    /// HEAD, when the repository has one
    pub head: Option<HeadState>,
    /// Staged changes against HEAD's tree; empty when HEAD is unborn
    /// or the index overlay is disabled
    pub index: Vec<IndexChange>,
}

/// What the overlay added, for pass statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayStats {
    /// Ref nodes emitted
    pub refs: usize,
    /// Refs whose target had no walked vertex (node kept, edge dropped)
    pub dangling_refs: usize,
    /// Staged changes considered for the index overlay
    pub index_entries: usize,
}

/// Apply the overlay to a walked graph.
pub fn apply(graph: &mut VizGraph, input: &OverlayInput) -> OverlayStats {
    let mut stats = OverlayStats::default();

    for record in &input.refs {
        let node = graph.ensure_ref_node(&record.name);
        stats.refs += 1;
        match graph.object_index(&record.target) {
            Some(target) => graph.connect(node, target, EdgeAttrs::plain(EdgeKind::Ref)),
            None => stats.dangling_refs += 1,
        }
    }

    if let Some(head) = &input.head {
        apply_head(graph, head);
    }

    stats.index_entries = apply_index(graph, &input.index);
    stats
}

/// HEAD is never treated as a plain ref: it always gets its highlighted
/// node, and a symbolic HEAD points at a branch node rather than an
/// object, creating the branch node on demand (the unborn-branch case).
fn apply_head(graph: &mut VizGraph, head: &HeadState) {
    let head_node = graph.ensure_head_node();
    match head {
        HeadState::Symbolic { target } => {
            let branch = graph.ensure_ref_node(target);
            graph.connect(head_node, branch, EdgeAttrs::plain(EdgeKind::Head));
        }
        HeadState::Detached { id } => {
            // Dangling detached HEAD keeps the node, loses the edge
            if let Some(commit) = graph.object_index(id) {
                graph.connect(head_node, commit, EdgeAttrs::plain(EdgeKind::Head));
            }
        }
    }
}

/// Emit the index node and one edge per staged change that still
/// resolves. Pure deletions carry no new id and draw no edge; a new id
/// missing from the walked set (blob gating, racing gc) is skipped the
/// same way.
fn apply_index(graph: &mut VizGraph, changes: &[IndexChange]) -> usize {
    if changes.is_empty() {
        return 0;
    }
    let index_node = graph.ensure_index_node();
    for change in changes {
        let target = match change.new_id.as_ref().and_then(|id| graph.object_index(id)) {
            Some(target) => target,
            None => continue,
        };
        let label = style::edge_label(change.new_path.as_deref().unwrap_or(""));
        graph.connect(index_node, target, EdgeAttrs::labeled(EdgeKind::Index, label));
    }
    changes.len()
}
