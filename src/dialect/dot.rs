//! Hierarchical dialect for `dot`

use super::style::{edge_look, node_look};
use super::{Attr, Dialect};
use crate::document::text::{wrap, WRAP_WIDTH};
use crate::view::{EdgeClass, GraphEdge, GraphNode};

/// Clustered, ranked output for tree-like layouts
#[derive(Debug, Clone, PartialEq)]
pub struct DotDialect {
    graph_attributes: Vec<Attr>,
    wrap_width: usize,
}

impl Default for DotDialect {
    fn default() -> Self {
        Self {
            graph_attributes: vec![
                Attr::new("compound", true),
                Attr::new("newrank", true),
                Attr::new("rankdir", "TB"),
                Attr::new("splines", "ortho"),
            ],
            wrap_width: WRAP_WIDTH,
        }
    }
}

impl DotDialect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay layout attributes; keys already present are replaced in place
    pub fn with_layout(mut self, layout: impl IntoIterator<Item = Attr>) -> Self {
        for attr in layout {
            match self.graph_attributes.iter_mut().find(|a| a.key == attr.key) {
                Some(existing) => existing.value = attr.value,
                None => self.graph_attributes.push(attr),
            }
        }
        self
    }

    pub fn with_wrap_width(mut self, width: usize) -> Self {
        self.wrap_width = width.max(1);
        self
    }

    fn label(&self, node: &GraphNode) -> String {
        let mut lines = vec![node.heading.clone()];
        lines.extend(wrap(&node.label, self.wrap_width));
        if let Some(excerpt) = &node.excerpt {
            lines.push(format!("\u{ab}{}\u{bb}", excerpt));
        }
        if let Some(speakers) = &node.speakers {
            lines.push(format!("[{}]", speakers));
        }
        if let Some(locus) = &node.locus {
            lines.push(format!("({})", locus));
        }
        lines.join("\n")
    }
}

impl Dialect for DotDialect {
    fn name(&self) -> &'static str {
        "dot"
    }

    fn graph_attributes(&self) -> Vec<Attr> {
        self.graph_attributes.clone()
    }

    fn uses_clusters(&self) -> bool {
        true
    }

    fn ranks_roots(&self) -> bool {
        true
    }

    fn node_attributes(&self, node: &GraphNode) -> Vec<Attr> {
        let look = node_look(node.class);
        vec![
            Attr::new("label", self.label(node)),
            Attr::new("shape", look.shape),
            Attr::new("style", look.style),
            Attr::new("fillcolor", look.fill.hex()),
            Attr::new("color", look.border.hex()),
        ]
    }

    fn edge_attributes(&self, edge: &GraphEdge) -> Vec<Attr> {
        let look = edge_look(edge.class);
        let mut attrs = Vec::with_capacity(5);
        if !edge.label.is_empty() {
            attrs.push(Attr::new("label", edge.label.as_str()));
        }
        attrs.push(Attr::new("color", look.color.hex()));
        attrs.push(Attr::new("style", look.style));
        attrs.push(Attr::new("penwidth", look.penwidth));
        if edge.class == EdgeClass::Ordering {
            // Keep steps top to bottom inside their parent
            attrs.push(Attr::new("weight", 10i64));
        }
        attrs
    }

    fn line_break(&self) -> &'static str {
        "\\n"
    }
}
