//! Dialect-independent attributed graph

use crate::model::{EntityKind, LogicalKind, Manifestation, RelationCategory};
use serde::Serialize;
use std::collections::HashSet;

/// Visual class of a node, keyed by entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeClass {
    Thesis,
    Proposition,
    Step,
    Extrinsic { manifestation: Manifestation },
}

impl NodeClass {
    pub fn kind(&self) -> EntityKind {
        match self {
            NodeClass::Thesis => EntityKind::Thesis,
            NodeClass::Proposition => EntityKind::Proposition,
            NodeClass::Step => EntityKind::Sequence,
            NodeClass::Extrinsic { .. } => EntityKind::ExtrinsicElement,
        }
    }
}

/// Visual class of an edge, keyed by relation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum EdgeClass {
    Containment,
    Ordering,
    Logical { kind: LogicalKind },
    Correspondence,
}

impl EdgeClass {
    pub fn category(&self) -> RelationCategory {
        match self {
            EdgeClass::Containment | EdgeClass::Ordering => RelationCategory::Structural,
            EdgeClass::Logical { .. } => RelationCategory::Logical,
            EdgeClass::Correspondence => RelationCategory::Correspondence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    /// Short tag shown above the label (e.g. "PROP", "ph. 2")
    pub heading: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speakers: Option<String>,
    pub class: NodeClass,
    /// Grouping key: the owning source
    pub cluster: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    pub class: EdgeClass,
}

/// Nodes and edges in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenericGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GenericGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes grouped by cluster key, clusters in order of first appearance
    pub fn clusters(&self) -> Vec<(&str, Vec<&GraphNode>)> {
        let mut clusters: Vec<(&str, Vec<&GraphNode>)> = Vec::new();
        for node in &self.nodes {
            match clusters.iter_mut().find(|(key, _)| *key == node.cluster) {
                Some((_, members)) => members.push(node),
                None => clusters.push((node.cluster.as_str(), vec![node])),
            }
        }
        clusters
    }

    /// Nodes without an incoming containment edge from a visible node
    pub fn roots(&self) -> Vec<&GraphNode> {
        let contained: HashSet<&str> = self
            .edges
            .iter()
            .filter(|e| e.class == EdgeClass::Containment)
            .map(|e| e.target.as_str())
            .collect();
        self.nodes
            .iter()
            .filter(|node| !contained.contains(node.id.as_str()))
            .collect()
    }
}
