//! Entity extraction
//!
//! Turns a parsed corpus tree into an [`EntityModel`] in two passes: the
//! first collects every entity under its declared identifier, the second
//! resolves relation declarations against that index so that forward
//! references work. Malformed markup is fatal; dangling references are
//! dropped and reported as warnings.

mod extractor;
mod fields;

pub use extractor::{extract, Extractor};

use crate::model::{EntityId, EntityModel};
use thiserror::Error;

/// Element names recognized by the extractor
pub mod tags {
    pub const SOURCE: &str = "source";
    pub const THESIS: &str = "thesis";
    pub const PROPOSITION: &str = "proposition";
    pub const SEQUENCE: &str = "sequence";
    pub const MISC: &str = "misc";

    pub const PARAPHRASIS: &str = "paraphrasis";
    pub const TEXT: &str = "text";
    pub const LOCUS: &str = "locus";
    pub const SPEAKER: &str = "speaker";
    pub const SPEAKERS: &str = "speakers";

    pub const MATCHING_PROPOSITION: &str = "matchingProposition";
    pub const ENTAILED_BY: &str = "entailedBy";
    pub const RELATION: &str = "relation";
    pub const MATCHING_SEQUENCE: &str = "matchingSequence";
}

/// Fatal extraction failure; `node` is the element's path in the tree
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("{node}: missing required attribute `{attribute}`")]
    MissingAttribute { node: String, attribute: &'static str },

    #[error("{node}: malformed attribute `{attribute}`: {reason}")]
    MalformedAttribute {
        node: String,
        attribute: &'static str,
        reason: String,
    },

    #[error("{node}: duplicate entity identifier {id}")]
    DuplicateIdentifier { node: String, id: EntityId },

    #[error("{node}: duplicate source identifier {id}")]
    DuplicateSource { node: String, id: String },

    #[error("{node}: <{tag}> must be declared inside a source")]
    OutsideSource { node: String, tag: String },

    #[error("{node}: <{tag}> must be declared inside an entity")]
    MissingContext { node: String, tag: String },

    #[error("{node}: step {found} breaks the step order of {parent}, expected {expected}")]
    StepOrder {
        node: String,
        parent: EntityId,
        found: u32,
        expected: u32,
    },
}

/// Result type for extraction
pub type ExtractResult<T> = Result<T, ExtractionError>;

/// Non-fatal condition met while resolving relations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionWarning {
    /// The relation names an identifier that no entity declares
    UnresolvedReference {
        node: String,
        from: EntityId,
        reference: String,
    },
    /// The relation points back at its declaring entity
    SelfReference { node: String, id: EntityId },
}

impl std::fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionWarning::UnresolvedReference {
                node,
                from,
                reference,
            } => write!(
                f,
                "{}: relation from {} references unknown identifier {}",
                node, from, reference
            ),
            ExtractionWarning::SelfReference { node, id } => {
                write!(f, "{}: relation from {} to itself ignored", node, id)
            }
        }
    }
}

/// Extraction output: the model plus accumulated warnings
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub model: EntityModel,
    pub warnings: Vec<ExtractionWarning>,
}

impl Extraction {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
