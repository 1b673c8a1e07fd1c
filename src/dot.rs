//! dot
//!
//! Serializes a [`VizGraph`] to Graphviz DOT text.
//!
//! # Design
//!
//! Pure structural flattening: every node and edge becomes one line, with
//! its attribute bag rendered verbatim. Nodes are emitted sorted by DOT
//! id and edges sorted by (source, target, kind, label, weight), so a
//! given repository state always serializes to identical bytes. Watch
//! mode relies on that stability: equal output means nothing to redraw.
//!
//! Labels pass through [`quote`], which escapes quotes, backslashes, and
//! newlines so arbitrary commit messages and blob previews cannot break
//! the DOT syntax.

use std::fmt::Write;

use crate::graph::model::{EdgeAttrs, Node, NodeKey, VizGraph};

/// Graph-level font defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotOptions {
    /// Font family applied to nodes and edges
    pub fontname: String,
    /// Font size applied to nodes and edges
    pub fontsize: u32,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            fontname: "Monaco".to_string(),
            fontsize: 8,
        }
    }
}

/// Serialize the graph to DOT text.
pub fn serialize(graph: &VizGraph, options: &DotOptions) -> String {
    let mut out = String::new();
    out.push_str("digraph {\n");
    out.push_str("    bgcolor=\"#00000000\";\n");
    let _ = writeln!(
        out,
        "    node [fontname={}, fontsize={}];",
        quote(&options.fontname),
        options.fontsize
    );
    let _ = writeln!(
        out,
        "    edge [fontname={}, fontsize={}, labelfontsize=11, labelfloat=false];",
        quote(&options.fontname),
        options.fontsize
    );

    let mut nodes: Vec<&Node> = graph.nodes().collect();
    nodes.sort_by(|a, b| a.key.dot_id().cmp(b.key.dot_id()));
    for node in nodes {
        out.push_str(&node_line(node));
    }

    let mut edges: Vec<(&NodeKey, &NodeKey, &EdgeAttrs)> = graph.edges().collect();
    edges.sort_by(|a, b| {
        (a.0.dot_id(), a.1.dot_id(), a.2.kind, &a.2.label, a.2.weight).cmp(&(
            b.0.dot_id(),
            b.1.dot_id(),
            b.2.kind,
            &b.2.label,
            b.2.weight,
        ))
    });
    for (source, target, attrs) in edges {
        out.push_str(&edge_line(source, target, attrs));
    }

    out.push_str("}\n");
    out
}

fn node_line(node: &Node) -> String {
    let attrs = &node.attrs;
    let mut parts = vec![
        format!("label={}", quote(&attrs.label)),
        format!("shape={}", attrs.shape),
        "style=filled".to_string(),
    ];
    if let Some(fill) = attrs.fillcolor {
        parts.push(format!("fillcolor={}", quote(fill)));
    }
    if let Some(font) = attrs.fontcolor {
        parts.push(format!("fontcolor={}", quote(font)));
    }
    if let Some(tooltip) = &attrs.tooltip {
        parts.push(format!("tooltip={}", quote(tooltip)));
    }
    format!("    {} [{}];\n", quote(node.key.dot_id()), parts.join(", "))
}

fn edge_line(source: &NodeKey, target: &NodeKey, attrs: &EdgeAttrs) -> String {
    let mut parts = Vec::new();
    if attrs.kind.is_dotted() {
        parts.push("style=dotted".to_string());
    }
    if let Some(label) = &attrs.label {
        parts.push(format!("label={}", quote(label)));
    }
    if let Some(weight) = attrs.weight {
        parts.push(format!("weight={}", weight));
    }

    let mut line = format!("    {} -> {}", quote(source.dot_id()), quote(target.dot_id()));
    if !parts.is_empty() {
        let _ = write!(line, " [{}]", parts.join(", "));
    }
    line.push_str(";\n");
    line
}

/// Quote a string as a DOT identifier or attribute value.
///
/// Backslashes and double quotes are escaped, newlines become `\n`, and
/// carriage returns are dropped.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
