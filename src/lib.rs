//! gitviz - Visualize the object graph of a git repository
//!
//! gitviz walks a repository's content-addressed object store (commits,
//! trees, blobs - orphans included), overlays its mutable state (branch
//! refs, HEAD, the staged index), and emits the result as Graphviz DOT,
//! optionally piped through a renderer subprocess. A persistent vertex
//! registry keeps hash-to-vertex identity stable across passes, so a
//! long-running watch session synchronizes incrementally instead of
//! rebuilding.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to handlers)
//! - [`session`] - Pass lifecycle: walk, overlay, reconcile
//! - [`graph`] - Vertex registry, store walker, overlays, node styles
//! - [`store`] - Single doorway to the repository (git2-backed, plus an
//!   in-memory test store)
//! - [`dot`] - DOT serialization
//! - [`render`] - Renderer subprocess hand-off
//! - [`core`] - Strong types and configuration
//! - [`ui`] - Output utilities
//!
//! # Correctness Invariants
//!
//! gitviz maintains the following invariants:
//!
//! 1. Vertex identity has a single owner: every vertex enters the graph
//!    through the registry, keyed by object hash
//! 2. A pass runs walk, then overlay, then reconcile, never interleaved
//! 3. Missing objects degrade the graph (skipped subtrees, edgeless ref
//!    nodes); corrupt objects abort the pass
//! 4. The repository is never written to

pub mod cli;
pub mod core;
pub mod dot;
pub mod graph;
pub mod render;
pub mod session;
pub mod store;
pub mod ui;
