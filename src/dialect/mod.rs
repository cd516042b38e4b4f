//! Textual graph dialects
//!
//! Both outputs are produced by one walk over the [`GenericGraph`]
//! ([`render`]); a [`Dialect`] only decides how classes map to attributes,
//! whether clusters and rank hints are emitted, and how label text is
//! escaped. Keeping the walk shared keeps statement order identical across
//! dialects.

mod dot;
mod gephi;
pub mod style;

pub use dot::DotDialect;
pub use gephi::GephiDialect;

use crate::view::{GenericGraph, GraphEdge, GraphNode, NodeClass};
use std::collections::HashSet;
use std::fmt::Write;

/// Attribute value, quoted or bare depending on type
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Integer(n)
    }
}

impl From<u8> for AttrValue {
    fn from(n: u8) -> Self {
        AttrValue::Integer(i64::from(n))
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

/// One `key=value` pair
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: AttrValue,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Attribute mapping strategy for one output dialect
pub trait Dialect: Send + Sync {
    fn name(&self) -> &'static str;

    /// Graph-level statements emitted right after the opening line
    fn graph_attributes(&self) -> Vec<Attr>;

    /// Group nodes into one subgraph per cluster key
    fn uses_clusters(&self) -> bool;

    /// Emit `rank=min` for root theses of each cluster
    fn ranks_roots(&self) -> bool;

    fn node_attributes(&self, node: &GraphNode) -> Vec<Attr>;

    fn edge_attributes(&self, edge: &GraphEdge) -> Vec<Attr>;

    /// How a line break inside a label is written
    fn line_break(&self) -> &'static str;
}

/// Render a generic graph in the given dialect
///
/// Output depends only on the graph and the dialect value: nodes first,
/// then edges, each in graph order.
pub fn render(graph: &GenericGraph, dialect: &dyn Dialect) -> String {
    let mut out = String::new();
    let breaks = dialect.line_break();

    out.push_str("digraph G {\n");
    for attr in dialect.graph_attributes() {
        let _ = writeln!(out, "    {};", format_attr(&attr, breaks));
    }

    if dialect.uses_clusters() {
        let roots: HashSet<&str> = graph.roots().into_iter().map(|n| n.id.as_str()).collect();
        for (key, members) in graph.clusters() {
            let _ = writeln!(out, "    subgraph {} {{", quote(&format!("cluster_{}", key), breaks));
            let _ = writeln!(out, "        label={};", quote(key, breaks));
            for node in &members {
                node_statement(&mut out, "        ", node, dialect);
            }
            if dialect.ranks_roots() {
                let ranked: Vec<String> = members
                    .iter()
                    .filter(|n| n.class == NodeClass::Thesis && roots.contains(n.id.as_str()))
                    .map(|n| quote(&n.id, breaks))
                    .collect();
                if !ranked.is_empty() {
                    let _ = writeln!(out, "        {{ rank=min; {}; }}", ranked.join("; "));
                }
            }
            out.push_str("    }\n");
        }
    } else {
        for node in &graph.nodes {
            node_statement(&mut out, "    ", node, dialect);
        }
    }

    for edge in &graph.edges {
        let _ = writeln!(
            out,
            "    {} -> {}{};",
            quote(&edge.source, breaks),
            quote(&edge.target, breaks),
            attr_list(&dialect.edge_attributes(edge), breaks)
        );
    }

    out.push_str("}\n");
    out
}

fn node_statement(out: &mut String, indent: &str, node: &GraphNode, dialect: &dyn Dialect) {
    let breaks = dialect.line_break();
    let _ = writeln!(
        out,
        "{}{}{};",
        indent,
        quote(&node.id, breaks),
        attr_list(&dialect.node_attributes(node), breaks)
    );
}

fn attr_list(attrs: &[Attr], breaks: &str) -> String {
    if attrs.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = attrs.iter().map(|a| format_attr(a, breaks)).collect();
    format!(" [{}]", parts.join(", "))
}

fn format_attr(attr: &Attr, breaks: &str) -> String {
    let value = match &attr.value {
        AttrValue::Text(text) => quote(text, breaks),
        AttrValue::Integer(n) => n.to_string(),
        AttrValue::Number(n) if n.is_finite() => format!("{}", n),
        AttrValue::Number(_) => "0".to_string(),
        AttrValue::Bool(b) => b.to_string(),
    };
    format!("{}={}", attr.key, value)
}

/// Quote and escape a string; `\n` in the input becomes `breaks`
pub fn quote(text: &str, breaks: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str(breaks),
            '\r' => {}
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render with the hierarchical dialect and default attributes
pub fn render_dot(graph: &GenericGraph) -> String {
    render(graph, &DotDialect::default())
}

/// Render with the force-directed dialect and default attributes
pub fn render_gephi(graph: &GenericGraph) -> String {
    render(graph, &GephiDialect::default())
}
