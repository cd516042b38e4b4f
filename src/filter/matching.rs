//! Matching-proposition-sequence predicates
//!
//! Decides which sequence steps the `filter_matching_proposition_sequences`
//! switch removes. The engine hands every structural link between a
//! sequence step and a proposition to the matcher; a step is removed if any
//! of its links matches.

use crate::model::Entity;
use serde::Deserialize;

/// A structural (containment) link between a sequence step and a proposition
#[derive(Debug, Clone, Copy)]
pub struct StructuralLink<'a> {
    pub sequence: &'a Entity,
    pub proposition: &'a Entity,
    /// Whether the proposition survived source and kind filtering
    pub proposition_visible: bool,
}

/// Strategy for the matching-sequence rule
pub trait SequenceMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, link: &StructuralLink<'_>) -> bool;
}

/// Any step structurally linked to a proposition
///
/// Steps that belong to propositions are the proposition-side halves of
/// sequence correspondences; removing them leaves thesis-side sequences
/// intact.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropositionSteps;

impl SequenceMatcher for PropositionSteps {
    fn name(&self) -> &'static str {
        "proposition-steps"
    }

    fn matches(&self, _link: &StructuralLink<'_>) -> bool {
        true
    }
}

/// Only steps linked to a proposition that was itself filtered out
#[derive(Debug, Clone, Copy, Default)]
pub struct FilteredPropositionSteps;

impl SequenceMatcher for FilteredPropositionSteps {
    fn name(&self) -> &'static str {
        "filtered-proposition-steps"
    }

    fn matches(&self, link: &StructuralLink<'_>) -> bool {
        !link.proposition_visible
    }
}

/// Named choice of matcher, as written in settings files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchingRule {
    #[default]
    PropositionSteps,
    FilteredPropositionSteps,
}

impl MatchingRule {
    pub fn matcher(&self) -> Box<dyn SequenceMatcher> {
        match self {
            MatchingRule::PropositionSteps => Box::new(PropositionSteps),
            MatchingRule::FilteredPropositionSteps => Box::new(FilteredPropositionSteps),
        }
    }
}
