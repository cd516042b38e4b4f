//! Typed, directed relations between entities

use super::entity::EntityId;
use serde::{Deserialize, Serialize};

/// Unique identifier for a relation
///
/// Derived from the endpoints and the type key, so identical declarations
/// collapse onto one relation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationId(String);

impl RelationId {
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RelationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Logical and rhetorical relation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalKind {
    Entailment,
    Contrast,
    Confirmation,
    Etiology,
    Analogy,
    Reference,
}

impl LogicalKind {
    pub const ALL: [LogicalKind; 6] = [
        LogicalKind::Entailment,
        LogicalKind::Contrast,
        LogicalKind::Confirmation,
        LogicalKind::Etiology,
        LogicalKind::Analogy,
        LogicalKind::Reference,
    ];

    /// Parse the markup spelling (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalKind::Entailment => "entailment",
            LogicalKind::Contrast => "contrast",
            LogicalKind::Confirmation => "confirmation",
            LogicalKind::Etiology => "etiology",
            LogicalKind::Analogy => "analogy",
            LogicalKind::Reference => "reference",
        }
    }

    /// Edge caption
    pub fn caption(&self) -> &'static str {
        match self {
            LogicalKind::Entailment => "ENTAILS",
            LogicalKind::Contrast => "CONTRASTS WITH",
            LogicalKind::Confirmation => "CONFIRMS",
            LogicalKind::Etiology => "IN ETIOLOGY",
            LogicalKind::Analogy => "COMPARED IN",
            LogicalKind::Reference => "IS REFERENCED IN",
        }
    }
}

/// Coarse grouping used for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationCategory {
    Logical,
    Structural,
    Correspondence,
}

impl RelationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationCategory::Logical => "logical",
            RelationCategory::Structural => "structural",
            RelationCategory::Correspondence => "correspondence",
        }
    }
}

/// Relation type with its payload
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelationType {
    /// Parent context contains the target
    Contains,
    /// Step precedes the next step of the same parent
    Precedes,
    Logical {
        kind: LogicalKind,
        /// Optional role of the source (e.g. "premise")
        #[serde(default, skip_serializing_if = "Option::is_none")]
        qualifier: Option<String>,
    },
    /// Step-to-step mapping across sequences
    Correspondence { label: String },
}

impl RelationType {
    pub fn logical(kind: LogicalKind) -> Self {
        RelationType::Logical {
            kind,
            qualifier: None,
        }
    }

    pub fn category(&self) -> RelationCategory {
        match self {
            RelationType::Contains | RelationType::Precedes => RelationCategory::Structural,
            RelationType::Logical { .. } => RelationCategory::Logical,
            RelationType::Correspondence { .. } => RelationCategory::Correspondence,
        }
    }

    pub fn is_containment(&self) -> bool {
        matches!(self, RelationType::Contains)
    }

    /// Key that identifies the type within an endpoint pair
    pub fn key(&self) -> String {
        match self {
            RelationType::Contains => "contains".to_string(),
            RelationType::Precedes => "precedes".to_string(),
            RelationType::Logical { kind, .. } => kind.as_str().to_string(),
            RelationType::Correspondence { label } => format!("corresponds:{}", label),
        }
    }

    /// Display label of the edge; empty for containment
    pub fn label(&self) -> String {
        match self {
            RelationType::Contains => String::new(),
            RelationType::Precedes => "THEN".to_string(),
            RelationType::Logical {
                kind,
                qualifier: Some(qualifier),
            } => format!("by {}, {}", qualifier, kind.caption()),
            RelationType::Logical { kind, .. } => kind.caption().to_string(),
            RelationType::Correspondence { label } => label.to_uppercase(),
        }
    }
}

/// A directed edge between two known entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub id: RelationId,
    pub source: EntityId,
    pub target: EntityId,
    #[serde(flatten)]
    pub relation_type: RelationType,
}

impl Relation {
    pub fn new(source: impl Into<EntityId>, target: impl Into<EntityId>, relation_type: RelationType) -> Self {
        let source = source.into();
        let target = target.into();
        let id = RelationId(format!("{}->{}:{}", source, target, relation_type.key()));
        Self {
            id,
            source,
            target,
            relation_type,
        }
    }

    pub fn category(&self) -> RelationCategory {
        self.relation_type.category()
    }
}
