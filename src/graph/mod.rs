//! graph
//!
//! The visual-graph core: vertex registry, walker, and overlays.
//!
//! # Modules
//!
//! - [`model`] - [`VizGraph`], the vertex registry and edge set
//! - [`walker`] - Depth-first traversal over an object store
//! - [`overlay`] - Ref, HEAD, and staged-index overlay nodes
//! - [`style`] - Presentation attributes per node kind
//!
//! # Invariants
//!
//! - [`VizGraph`] is the single owner of vertex identity; every vertex
//!   enters through an `ensure_*` method
//! - One pass runs walk, then overlay, then reconcile, never interleaved
//! - Edges are cleared at the start of each pass and rebuilt

pub mod model;
pub mod overlay;
pub mod style;
pub mod walker;

pub use model::{EdgeAttrs, EdgeKind, Node, NodeKey, VizGraph};
pub use overlay::{OverlayInput, OverlayStats};
pub use style::{LabelStyle, NodeAttrs};
pub use walker::{WalkOutcome, Walker};
