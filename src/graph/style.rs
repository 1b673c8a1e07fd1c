//! graph::style
//!
//! Presentation attributes for graph nodes.
//!
//! Everything here is pure presentation: which shape and color each node
//! kind gets, how a ref name is shortened for display, how much blob
//! content fits in a label. The walker and overlay ask this module for a
//! [`NodeAttrs`] bag; the DOT serializer flattens it verbatim.

use crate::core::types::ObjectId;
use crate::store::RepoObject;

/// Number of id characters shown in tooltips.
const TOOLTIP_ID_LEN: usize = 20;

/// Label-building settings.
///
/// Font settings are graph-level defaults and live with the serializer;
/// only per-node label construction is configured here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelStyle {
    /// Maximum characters of blob content shown in a blob label
    pub blob_content_limit: usize,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            blob_content_limit: 200,
        }
    }
}

/// Display attributes of one node.
///
/// All nodes render filled; `fillcolor`/`fontcolor` of `None` mean the
/// renderer's defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAttrs {
    /// Node label text (unescaped; the serializer quotes it)
    pub label: String,
    /// Graphviz shape name
    pub shape: &'static str,
    /// Fill color, if not the renderer default
    pub fillcolor: Option<&'static str>,
    /// Font color, if not the renderer default
    pub fontcolor: Option<&'static str>,
    /// Hover tooltip
    pub tooltip: Option<String>,
}

/// Compute display attributes for a repository object.
pub fn object_attrs(id: &ObjectId, object: &RepoObject, style: &LabelStyle) -> NodeAttrs {
    let short = id.short(TOOLTIP_ID_LEN);
    match object {
        RepoObject::Commit(commit) => NodeAttrs {
            label: commit.message.trim().to_string(),
            shape: "note",
            fillcolor: Some("#ccffcc"),
            fontcolor: None,
            tooltip: Some(format!("Commit: {}", short)),
        },
        RepoObject::Tree(_) => NodeAttrs {
            label: "tree".to_string(),
            shape: "folder",
            fillcolor: Some("#ffffff"),
            fontcolor: Some("#a0a0a0"),
            tooltip: Some(format!("Tree: {}", short)),
        },
        RepoObject::Blob(blob) => NodeAttrs {
            label: blob_preview(&blob.content, style.blob_content_limit),
            shape: "ellipse",
            fillcolor: Some("#ffffff"),
            fontcolor: None,
            tooltip: Some(format!("Blob: {}", short)),
        },
    }
}

/// Compute display attributes for a branch node.
pub fn branch_attrs(name: &str) -> NodeAttrs {
    let label = ref_label(name);
    NodeAttrs {
        tooltip: Some(format!("Branch: {}", label)),
        label,
        shape: "diamond",
        fillcolor: None,
        fontcolor: None,
    }
}

/// Compute display attributes for the HEAD node.
pub fn head_attrs() -> NodeAttrs {
    NodeAttrs {
        label: "HEAD".to_string(),
        shape: "diamond",
        fillcolor: Some("#ff3333"),
        fontcolor: Some("white"),
        tooltip: Some("Symbolic Ref: HEAD".to_string()),
    }
}

/// Compute display attributes for the staged-index node.
pub fn index_attrs() -> NodeAttrs {
    NodeAttrs {
        label: "index".to_string(),
        shape: "invtriangle",
        fillcolor: Some("#33ff33"),
        fontcolor: None,
        tooltip: None,
    }
}

/// Format a ref name for display.
///
/// `refs/heads/X` shortens to `X`, `refs/remotes/Y` to `remote: Y`;
/// anything else renders verbatim.
pub fn ref_label(name: &str) -> String {
    if let Some(branch) = name.strip_prefix("refs/heads/") {
        branch.to_string()
    } else if let Some(remote) = name.strip_prefix("refs/remotes/") {
        format!("remote: {}", remote)
    } else {
        name.to_string()
    }
}

/// Label text for a tree entry or index edge.
///
/// The two-space prefix keeps edge labels from hugging the edge line.
pub fn edge_label(name: &str) -> String {
    format!("  {}", name)
}

/// Build a blob's label from the first part of its content.
///
/// The content is decoded lossily as UTF-8, NUL bytes are dropped, and
/// the result is truncated to `limit` characters. Truncation counts
/// characters rather than bytes so multibyte sequences never split.
pub fn blob_preview(content: &[u8], limit: usize) -> String {
    String::from_utf8_lossy(content)
        .chars()
        .filter(|&c| c != '\0')
        .take(limit)
        .collect::<String>()
        .trim()
        .to_string()
}
