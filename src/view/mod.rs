//! Generic graph model shared by every output dialect

mod builder;
mod graph;

pub use builder::{build, build_selection};
pub use graph::{EdgeClass, GenericGraph, GraphEdge, GraphNode, NodeClass};
