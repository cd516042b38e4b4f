//! Adjacency over relation positions

use crate::model::EntityModel;

/// Outgoing and incoming relation positions per entity position
#[derive(Debug, Clone)]
pub(crate) struct EdgeIndex {
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    endpoints: Vec<Option<(usize, usize)>>,
}

impl EdgeIndex {
    pub(crate) fn build(model: &EntityModel) -> Self {
        let n = model.entity_count();
        let mut outgoing = vec![Vec::new(); n];
        let mut incoming = vec![Vec::new(); n];
        let mut endpoints = Vec::with_capacity(model.relation_count());

        for (pos, relation) in model.relations().iter().enumerate() {
            let ends = model
                .position(relation.source.as_str())
                .zip(model.position(relation.target.as_str()));
            if let Some((source, target)) = ends {
                outgoing[source].push(pos);
                incoming[target].push(pos);
            }
            endpoints.push(ends);
        }

        Self {
            outgoing,
            incoming,
            endpoints,
        }
    }

    pub(crate) fn outgoing(&self, entity: usize) -> &[usize] {
        &self.outgoing[entity]
    }

    pub(crate) fn incoming(&self, entity: usize) -> &[usize] {
        &self.incoming[entity]
    }

    /// (source, target) entity positions of a relation
    pub(crate) fn endpoints(&self, relation: usize) -> Option<(usize, usize)> {
        self.endpoints[relation]
    }
}
