//! EntityModel: arena of entities and relations for one document snapshot

use super::entity::{Entity, EntityId};
use super::relation::{Relation, RelationId};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while populating an EntityModel
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("duplicate source identifier: {0}")]
    DuplicateSource(String),

    #[error("duplicate entity identifier: {0}")]
    DuplicateEntity(EntityId),

    #[error("entity {entity} belongs to undeclared source {source_id}")]
    UnknownSource { entity: EntityId, source_id: String },

    #[error("relation endpoint not found: {0}")]
    UnknownEndpoint(EntityId),
}

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// All entities and relations of a document snapshot
///
/// Entities and relations live in insertion order, which is discovery
/// order during extraction. Positions are stable for the lifetime of the
/// model, so derived views address them by index.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityModel {
    sources: Vec<String>,
    entities: Vec<Entity>,
    relations: Vec<Relation>,
    #[serde(skip)]
    entity_index: HashMap<EntityId, usize>,
    #[serde(skip)]
    relation_index: HashMap<RelationId, usize>,
}

impl EntityModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a source
    pub fn add_source(&mut self, source: impl Into<String>) -> ModelResult<()> {
        let source = source.into();
        if self.has_source(&source) {
            return Err(ModelError::DuplicateSource(source));
        }
        self.sources.push(source);
        Ok(())
    }

    /// Add an entity; its source must already be declared
    pub fn add_entity(&mut self, entity: Entity) -> ModelResult<usize> {
        if self.entity_index.contains_key(&entity.id) {
            return Err(ModelError::DuplicateEntity(entity.id));
        }
        if !self.has_source(&entity.source) {
            return Err(ModelError::UnknownSource {
                entity: entity.id,
                source_id: entity.source,
            });
        }
        let position = self.entities.len();
        self.entity_index.insert(entity.id.clone(), position);
        self.entities.push(entity);
        Ok(position)
    }

    /// Add a relation between two known entities
    ///
    /// Returns `Ok(false)` when an identical relation already exists.
    pub fn add_relation(&mut self, relation: Relation) -> ModelResult<bool> {
        for endpoint in [&relation.source, &relation.target] {
            if !self.contains(endpoint.as_str()) {
                return Err(ModelError::UnknownEndpoint(endpoint.clone()));
            }
        }
        if self.relation_index.contains_key(&relation.id) {
            return Ok(false);
        }
        self.relation_index
            .insert(relation.id.clone(), self.relations.len());
        self.relations.push(relation);
        Ok(true)
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn has_source(&self, source: &str) -> bool {
        self.sources.iter().any(|s| s == source)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entity_index.contains_key(id)
    }

    /// Arena position of an entity
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entity_index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.position(id).map(|i| &self.entities[i])
    }

    pub fn relation_position(&self, id: &RelationId) -> Option<usize> {
        self.relation_index.get(id).copied()
    }

    pub fn get_relation(&self, id: &RelationId) -> Option<&Relation> {
        self.relation_position(id).map(|i| &self.relations[i])
    }

    /// Entities declared in one source, in discovery order
    pub fn entities_in_source<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(move |e| e.source == source)
    }
}
