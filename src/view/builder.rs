//! Maps visible entities and relations onto the generic graph

use super::graph::{EdgeClass, GenericGraph, GraphEdge, GraphNode, NodeClass};
use crate::document::text::snippet;
use crate::filter::Selection;
use crate::model::{Entity, EntityDetail, EntityId, EntityModel, Manifestation, Relation, RelationId, RelationType};
use std::collections::HashSet;

/// Build the generic graph for explicit visible sets
///
/// Every visible id present in the model becomes exactly one node or edge,
/// in model discovery order; nothing else is added.
pub fn build(model: &EntityModel, entities: &[EntityId], relations: &[RelationId]) -> GenericGraph {
    let entities: HashSet<&EntityId> = entities.iter().collect();
    let relations: HashSet<&RelationId> = relations.iter().collect();

    GenericGraph {
        nodes: model
            .entities()
            .iter()
            .filter(|e| entities.contains(&e.id))
            .map(node_for)
            .collect(),
        edges: model
            .relations()
            .iter()
            .filter(|r| relations.contains(&r.id))
            .map(edge_for)
            .collect(),
    }
}

/// Build the generic graph for a filter selection
pub fn build_selection(model: &EntityModel, selection: &Selection) -> GenericGraph {
    build(model, selection.entity_ids(), selection.relation_ids())
}

fn node_for(entity: &Entity) -> GraphNode {
    let (class, heading) = match &entity.detail {
        EntityDetail::Thesis => (NodeClass::Thesis, "THESIS".to_string()),
        EntityDetail::Proposition => (NodeClass::Proposition, "PROP".to_string()),
        EntityDetail::Sequence { step, .. } => (NodeClass::Step, format!("ph. {}", step)),
        EntityDetail::ExtrinsicElement { manifestation } => (
            NodeClass::Extrinsic {
                manifestation: *manifestation,
            },
            match manifestation {
                Manifestation::Explicit => "MISC",
                Manifestation::Implicit => "impl. MISC",
                Manifestation::Extrinsic => "extr. MISC",
            }
            .to_string(),
        ),
    };

    GraphNode {
        id: entity.id.to_string(),
        heading,
        label: entity.paraphrasis.clone(),
        excerpt: entity.text.as_deref().map(snippet),
        locus: entity.locus.clone(),
        speakers: (!entity.speakers.is_empty()).then(|| entity.speakers.join(", ")),
        class,
        cluster: entity.source.clone(),
    }
}

fn edge_for(relation: &Relation) -> GraphEdge {
    let class = match &relation.relation_type {
        RelationType::Contains => EdgeClass::Containment,
        RelationType::Precedes => EdgeClass::Ordering,
        RelationType::Logical { kind, .. } => EdgeClass::Logical { kind: *kind },
        RelationType::Correspondence { .. } => EdgeClass::Correspondence,
    };

    GraphEdge {
        id: relation.id.to_string(),
        source: relation.source.to_string(),
        target: relation.target.to_string(),
        label: relation.relation_type.label(),
        class,
    }
}
