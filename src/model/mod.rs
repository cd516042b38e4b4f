//! Entity model: the immutable graph extracted from one document snapshot

mod entity;
mod relation;
mod store;


pub use entity::{Entity, EntityDetail, EntityId, EntityKind, Manifestation};
pub use relation::{LogicalKind, Relation, RelationCategory, RelationId, RelationType};
pub use store::{EntityModel, ModelError, ModelResult};
