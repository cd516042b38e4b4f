//! Entities extracted from the corpus

use crate::document::text::EMPTY_LABEL;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Identifier of an entity, exactly as declared in the markup
///
/// Serializes as a plain string (e.g. "plut.t12")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create an EntityId from a string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Closed set of entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Thesis,
    Proposition,
    Sequence,
    ExtrinsicElement,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Thesis => "thesis",
            EntityKind::Proposition => "proposition",
            EntityKind::Sequence => "sequence",
            EntityKind::ExtrinsicElement => "extrinsic_element",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an extrinsic element shows up in the excerpt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Manifestation {
    /// Stated in the text
    #[default]
    Explicit,
    /// Presupposed by the text
    Implicit,
    /// Supplied from outside the text
    Extrinsic,
}

impl Manifestation {
    /// Whether the element is not literally present in the excerpt
    pub fn is_tacit(&self) -> bool {
        !matches!(self, Manifestation::Explicit)
    }
}

/// Kind-specific payload of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityDetail {
    Thesis,
    Proposition,
    Sequence {
        /// 1-based position among the steps of `parent`
        step: u32,
        parent: EntityId,
    },
    ExtrinsicElement {
        manifestation: Manifestation,
    },
}

impl EntityDetail {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityDetail::Thesis => EntityKind::Thesis,
            EntityDetail::Proposition => EntityKind::Proposition,
            EntityDetail::Sequence { .. } => EntityKind::Sequence,
            EntityDetail::ExtrinsicElement { .. } => EntityKind::ExtrinsicElement,
        }
    }
}

/// A thesis, proposition, sequence step or extrinsic element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Identifier of the work the entity was excerpted from
    pub source: String,
    #[serde(flatten)]
    pub detail: EntityDetail,
    /// Normalized paraphrasis, the entity's display label
    pub paraphrasis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locus: Option<String>,
    /// Speakers of highest precedence (lowest rank)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub speakers: Vec<String>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, source: impl Into<String>, detail: EntityDetail) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            detail,
            paraphrasis: EMPTY_LABEL.to_string(),
            text: None,
            locus: None,
            speakers: Vec::new(),
        }
    }

    pub fn thesis(id: impl Into<EntityId>, source: impl Into<String>) -> Self {
        Self::new(id, source, EntityDetail::Thesis)
    }

    pub fn proposition(id: impl Into<EntityId>, source: impl Into<String>) -> Self {
        Self::new(id, source, EntityDetail::Proposition)
    }

    pub fn sequence(
        id: impl Into<EntityId>,
        source: impl Into<String>,
        parent: impl Into<EntityId>,
        step: u32,
    ) -> Self {
        Self::new(
            id,
            source,
            EntityDetail::Sequence {
                step,
                parent: parent.into(),
            },
        )
    }

    pub fn extrinsic(
        id: impl Into<EntityId>,
        source: impl Into<String>,
        manifestation: Manifestation,
    ) -> Self {
        Self::new(id, source, EntityDetail::ExtrinsicElement { manifestation })
    }

    pub fn with_paraphrasis(mut self, paraphrasis: impl Into<String>) -> Self {
        self.paraphrasis = paraphrasis.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_locus(mut self, locus: impl Into<String>) -> Self {
        self.locus = Some(locus.into());
        self
    }

    pub fn with_speakers(mut self, speakers: Vec<String>) -> Self {
        self.speakers = speakers;
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.detail.kind()
    }

    /// Step index, for sequence steps
    pub fn step(&self) -> Option<u32> {
        match &self.detail {
            EntityDetail::Sequence { step, .. } => Some(*step),
            _ => None,
        }
    }
}
