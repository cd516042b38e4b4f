//! Force-directed dialect tuned for Gephi's DOT import
//!
//! No clusters or rank hints. Colors become numeric `r`/`g`/`b`
//! attributes and emphasis becomes numeric `size`/`weight`, since the
//! importer drops style keywords.

use super::style::{edge_look, node_look};
use super::{Attr, Dialect};
use crate::view::{GraphEdge, GraphNode};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GephiDialect {
    graph_attributes: Vec<Attr>,
}

impl GephiDialect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph attributes for a force-directed engine (`fdp`, `neato`)
    pub fn with_layout(mut self, layout: impl IntoIterator<Item = Attr>) -> Self {
        self.graph_attributes.extend(layout);
        self
    }
}

impl Dialect for GephiDialect {
    fn name(&self) -> &'static str {
        "gephi"
    }

    fn graph_attributes(&self) -> Vec<Attr> {
        self.graph_attributes.clone()
    }

    fn uses_clusters(&self) -> bool {
        false
    }

    fn ranks_roots(&self) -> bool {
        false
    }

    fn node_attributes(&self, node: &GraphNode) -> Vec<Attr> {
        let look = node_look(node.class);
        let mut attrs = vec![
            Attr::new("label", node.heading.as_str()),
            Attr::new("kind", node.class.kind().as_str()),
            Attr::new("source", node.cluster.as_str()),
            Attr::new("paraphrasis", node.label.as_str()),
        ];
        if let Some(excerpt) = &node.excerpt {
            attrs.push(Attr::new("excerpt", excerpt.as_str()));
        }
        if let Some(speakers) = &node.speakers {
            attrs.push(Attr::new("speakers", speakers.as_str()));
        }
        if let Some(locus) = &node.locus {
            attrs.push(Attr::new("locus", locus.as_str()));
        }
        attrs.extend([
            Attr::new("r", look.fill.0),
            Attr::new("g", look.fill.1),
            Attr::new("b", look.fill.2),
            Attr::new("size", look.size),
        ]);
        attrs
    }

    fn edge_attributes(&self, edge: &GraphEdge) -> Vec<Attr> {
        let look = edge_look(edge.class);
        let mut attrs = Vec::with_capacity(6);
        if !edge.label.is_empty() {
            attrs.push(Attr::new("label", edge.label.as_str()));
        }
        attrs.extend([
            Attr::new("category", edge.class.category().as_str()),
            Attr::new("r", look.color.0),
            Attr::new("g", look.color.1),
            Attr::new("b", look.color.2),
            Attr::new("weight", look.penwidth),
        ]);
        attrs
    }

    fn line_break(&self) -> &'static str {
        " "
    }
}
