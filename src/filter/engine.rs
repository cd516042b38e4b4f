//! FilterEngine: derives visible entity and relation sets from a config

use super::config::FilterConfig;
use super::index::EdgeIndex;
use super::matching::{PropositionSteps, SequenceMatcher, StructuralLink};
use super::{focus, overrides, ConfigurationError, FilterResult, FilterWarning};
use crate::model::{EntityId, EntityKind, EntityModel, RelationId};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Select the visible subgraph of `model` with the default sequence matcher
pub fn select(model: &EntityModel, config: &FilterConfig) -> FilterResult<Selection> {
    FilterEngine::new(model).select(config)
}

/// Visible entities and relations for one filter configuration
///
/// Ids are listed in discovery order. The base model is never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entities: Vec<EntityId>,
    relations: Vec<RelationId>,
    entity_set: HashSet<EntityId>,
    relation_set: HashSet<RelationId>,
    pub warnings: Vec<FilterWarning>,
}

impl Selection {
    fn new(entities: Vec<EntityId>, relations: Vec<RelationId>, warnings: Vec<FilterWarning>) -> Self {
        Self {
            entity_set: entities.iter().cloned().collect(),
            relation_set: relations.iter().cloned().collect(),
            entities,
            relations,
            warnings,
        }
    }

    pub fn entity_ids(&self) -> &[EntityId] {
        &self.entities
    }

    pub fn relation_ids(&self) -> &[RelationId] {
        &self.relations
    }

    pub fn contains_entity(&self, id: &str) -> bool {
        self.entity_set.contains(id)
    }

    pub fn contains_relation(&self, id: &RelationId) -> bool {
        self.relation_set.contains(id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    pub fn add_warning(&mut self, warning: FilterWarning) {
        self.warnings.push(warning);
    }
}

/// Filter engine bound to one entity model
pub struct FilterEngine<'m> {
    model: &'m EntityModel,
    index: EdgeIndex,
    matcher: Box<dyn SequenceMatcher>,
}

impl<'m> FilterEngine<'m> {
    pub fn new(model: &'m EntityModel) -> Self {
        Self {
            model,
            index: EdgeIndex::build(model),
            matcher: Box::new(PropositionSteps),
        }
    }

    /// Replace the matching-proposition-sequence predicate
    pub fn with_matcher(mut self, matcher: Box<dyn SequenceMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn matcher_name(&self) -> &'static str {
        self.matcher.name()
    }

    /// Apply source, kind, override and focus filters, then derive edges
    ///
    /// Configuration problems are reported before any filtering happens.
    pub fn select(&self, config: &FilterConfig) -> FilterResult<Selection> {
        let config = config.normalized();
        let anchors = self.validate(&config)?;
        let model = self.model;
        let entities = model.entities();

        // Source filter
        let mut visible: Vec<bool> = entities
            .iter()
            .map(|e| {
                config.sources_to_select.is_empty()
                    || config.sources_to_select.iter().any(|s| *s == e.source)
            })
            .collect();

        // Kind exclusions
        if config.filter_propositions {
            self.exclude_kind(&mut visible, EntityKind::Proposition);
        }
        if config.filter_matching_proposition_sequences {
            let matching = self.matching_sequences(&visible);
            for position in matching {
                visible[position] = false;
            }
        }
        if config.filter_all_sequences {
            self.exclude_kind(&mut visible, EntityKind::Sequence);
        }
        if config.filter_extrinsic_elements {
            self.exclude_kind(&mut visible, EntityKind::ExtrinsicElement);
        }

        // Custom overrides
        let outcome = overrides::apply(model, &self.index, &config);
        let mut warnings = outcome.warnings;
        for (flag, hidden) in visible.iter_mut().zip(&outcome.hidden) {
            *flag &= !hidden;
        }
        let usable: Vec<bool> = outcome.cut.iter().map(|c| !c).collect();

        // Focus anchoring
        if !anchors.is_empty() {
            for &anchor in &anchors {
                if !visible[anchor] {
                    warnings.push(FilterWarning::FocusAnchorFiltered {
                        anchor: entities[anchor].id.to_string(),
                    });
                }
            }
            let reached = focus::reachable(&self.index, &anchors, &visible, &usable);
            for (flag, reached) in visible.iter_mut().zip(reached) {
                *flag &= reached;
            }
        }

        // Edge derivation
        let relations: Vec<RelationId> = model
            .relations()
            .iter()
            .enumerate()
            .filter(|(position, _)| {
                usable[*position]
                    && self
                        .index
                        .endpoints(*position)
                        .is_some_and(|(source, target)| visible[source] && visible[target])
            })
            .map(|(_, relation)| relation.id.clone())
            .collect();
        let entity_ids: Vec<EntityId> = entities
            .iter()
            .zip(&visible)
            .filter(|(_, visible)| **visible)
            .map(|(entity, _)| entity.id.clone())
            .collect();

        for warning in &warnings {
            warn!("{}", warning);
        }
        debug!(
            entities = entity_ids.len(),
            relations = relations.len(),
            matcher = self.matcher.name(),
            "selection complete"
        );

        Ok(Selection::new(entity_ids, relations, warnings))
    }

    /// Check sources and anchors; returns anchor positions
    fn validate(&self, config: &FilterConfig) -> FilterResult<Vec<usize>> {
        for source in &config.sources_to_select {
            if !self.model.has_source(source) {
                return Err(ConfigurationError::UnknownSource(source.clone()));
            }
        }

        let mut anchors = Vec::with_capacity(config.thesis_focus_id.len());
        for anchor in &config.thesis_focus_id {
            let Some(position) = self.model.position(anchor) else {
                return Err(ConfigurationError::UnknownFocusAnchor(anchor.clone()));
            };
            let kind = self.model.entities()[position].kind();
            if kind != EntityKind::Thesis {
                return Err(ConfigurationError::FocusAnchorNotThesis {
                    id: anchor.clone(),
                    kind,
                });
            }
            anchors.push(position);
        }
        Ok(anchors)
    }

    fn exclude_kind(&self, visible: &mut [bool], kind: EntityKind) {
        for (flag, entity) in visible.iter_mut().zip(self.model.entities()) {
            if entity.kind() == kind {
                *flag = false;
            }
        }
    }

    /// Visible steps that the matcher pairs with a proposition
    fn matching_sequences(&self, visible: &[bool]) -> Vec<usize> {
        let entities = self.model.entities();
        let relations = self.model.relations();
        let mut matching = Vec::new();

        for (position, entity) in entities.iter().enumerate() {
            if !visible[position] || entity.kind() != EntityKind::Sequence {
                continue;
            }
            let matched = self
                .index
                .incoming(position)
                .iter()
                .chain(self.index.outgoing(position))
                .copied()
                .filter(|&r| relations[r].relation_type.is_containment())
                .filter_map(|r| self.index.endpoints(r))
                .map(|(source, target)| if source == position { target } else { source })
                .filter(|&other| entities[other].kind() == EntityKind::Proposition)
                .any(|other| {
                    self.matcher.matches(&StructuralLink {
                        sequence: entity,
                        proposition: &entities[other],
                        proposition_visible: visible[other],
                    })
                });
            if matched {
                matching.push(position);
            }
        }
        matching
    }
}

impl std::fmt::Debug for FilterEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEngine")
            .field("entities", &self.model.entity_count())
            .field("matcher", &self.matcher.name())
            .finish()
    }
}
