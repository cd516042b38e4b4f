//! Filter engine
//!
//! Computes which entities and relations of an [`EntityModel`] are visible
//! under a [`FilterConfig`]. Steps run in a fixed order: source allow-list,
//! kind exclusions, custom overrides, focus anchoring, edge derivation.
//! Every step only narrows the candidate set; edge visibility is always
//! derived from endpoint visibility.
//!
//! [`EntityModel`]: crate::model::EntityModel

mod config;
mod engine;
mod focus;
mod index;
pub mod matching;
mod overrides;

pub use config::{FilterConfig, OverrideRules};
pub use engine::{select, FilterEngine, Selection};
pub use matching::{
    FilteredPropositionSteps, MatchingRule, PropositionSteps, SequenceMatcher, StructuralLink,
};

use crate::model::EntityKind;
use thiserror::Error;

/// Fatal problem with a filter configuration, raised before any filtering
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unknown source in sources_to_select: {0}")]
    UnknownSource(String),

    #[error("unknown focus anchor: {0}")]
    UnknownFocusAnchor(String),

    #[error("focus anchor {id} is a {kind}, not a thesis")]
    FocusAnchorNotThesis { id: String, kind: EntityKind },
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, ConfigurationError>;

/// Non-fatal condition met while filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterWarning {
    /// Override names an entity the model does not contain; override ignored
    UnknownOverrideEntity { entity: String },
    /// Override context is not in the model; that context is ignored
    UnknownOverrideContext { entity: String, context: String },
    /// Anchor was removed by an earlier step and contributes nothing
    FocusAnchorFiltered { anchor: String },
}

impl std::fmt::Display for FilterWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterWarning::UnknownOverrideEntity { entity } => {
                write!(f, "custom override for unknown entity {} ignored", entity)
            }
            FilterWarning::UnknownOverrideContext { entity, context } => write!(
                f,
                "custom override for {} names unknown context {}; ignored",
                entity, context
            ),
            FilterWarning::FocusAnchorFiltered { anchor } => {
                write!(f, "focus anchor {} was removed by earlier filters", anchor)
            }
        }
    }
}
