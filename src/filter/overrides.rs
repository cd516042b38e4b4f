//! Custom per-entity, per-context exclusions

use super::config::FilterConfig;
use super::index::EdgeIndex;
use super::FilterWarning;
use crate::model::{EntityKind, EntityModel};
use std::collections::{HashMap, HashSet, VecDeque};

/// Relations cut and entities hidden by the custom overrides
///
/// Depends only on the model and the override tables, never on the other
/// filter steps, so applying the same rules again changes nothing.
#[derive(Debug, Clone)]
pub(crate) struct OverrideOutcome {
    /// Per relation position
    pub cut: Vec<bool>,
    /// Per entity position
    pub hidden: Vec<bool>,
    pub warnings: Vec<FilterWarning>,
}

pub(crate) fn apply(model: &EntityModel, index: &EdgeIndex, config: &FilterConfig) -> OverrideOutcome {
    let mut cut = vec![false; model.relation_count()];
    let mut warnings = Vec::new();
    let mut scopes: HashMap<usize, HashSet<usize>> = HashMap::new();

    for (entity, contexts) in config.overrides() {
        let Some(target) = model.position(entity) else {
            warnings.push(FilterWarning::UnknownOverrideEntity {
                entity: entity.to_string(),
            });
            continue;
        };
        // A proposition's steps leave the context together with it
        let own_scope = containment_scope(model, index, target);
        let steps: Vec<usize> = if model.entities()[target].kind() == EntityKind::Proposition {
            own_scope
                .iter()
                .copied()
                .filter(|&e| model.entities()[e].kind() == EntityKind::Sequence)
                .collect()
        } else {
            Vec::new()
        };
        for context in contexts {
            let Some(context_pos) = model.position(context) else {
                warnings.push(FilterWarning::UnknownOverrideContext {
                    entity: entity.to_string(),
                    context: context.clone(),
                });
                continue;
            };
            let scope = scopes
                .entry(context_pos)
                .or_insert_with(|| containment_scope(model, index, context_pos));
            for relation in cut_into(model, index, target, &steps, context_pos, scope, &own_scope) {
                cut[relation] = true;
            }
        }
    }

    let hidden = orphaned(model, index, &cut);
    OverrideOutcome {
        cut,
        hidden,
        warnings,
    }
}

/// Relations into `target` (or one of its `steps`) that the override cuts
///
/// Every edge straight from the context goes. From inside the context only
/// links that are not the entity's own nesting go, and never links from
/// the entity's own subtree.
fn cut_into(
    model: &EntityModel,
    index: &EdgeIndex,
    target: usize,
    steps: &[usize],
    context: usize,
    scope: &HashSet<usize>,
    own_scope: &HashSet<usize>,
) -> Vec<usize> {
    let relations = model.relations();
    let mut cut = Vec::new();

    for &relation in index.incoming(target) {
        let Some((source, _)) = index.endpoints(relation) else {
            continue;
        };
        if source == context
            || (scope.contains(&source)
                && !own_scope.contains(&source)
                && !relations[relation].relation_type.is_containment())
        {
            cut.push(relation);
        }
    }
    for &step in steps {
        for &relation in index.incoming(step) {
            let Some((source, _)) = index.endpoints(relation) else {
                continue;
            };
            if scope.contains(&source)
                && !own_scope.contains(&source)
                && !relations[relation].relation_type.is_containment()
            {
                cut.push(relation);
            }
        }
    }
    cut
}

/// The context and everything it transitively contains
fn containment_scope(model: &EntityModel, index: &EdgeIndex, context: usize) -> HashSet<usize> {
    let relations = model.relations();
    let mut scope = HashSet::from([context]);
    let mut queue = VecDeque::from([context]);

    while let Some(current) = queue.pop_front() {
        for &relation in index.outgoing(current) {
            if !relations[relation].relation_type.is_containment() {
                continue;
            }
            if let Some((_, child)) = index.endpoints(relation) {
                if scope.insert(child) {
                    queue.push_back(child);
                }
            }
        }
    }
    scope
}

/// Entities left without any parent once the cut containment edges are gone
///
/// An entity is hidden when every incoming containment edge is cut or comes
/// from a hidden parent. Entities that never had a parent stay visible.
fn orphaned(model: &EntityModel, index: &EdgeIndex, cut: &[bool]) -> Vec<bool> {
    let relations = model.relations();
    let mut hidden = vec![false; model.entity_count()];

    loop {
        let mut changed = false;
        for entity in 0..hidden.len() {
            if hidden[entity] {
                continue;
            }
            let mut parents = index
                .incoming(entity)
                .iter()
                .copied()
                .filter(|&r| relations[r].relation_type.is_containment())
                .peekable();
            if parents.peek().is_none() {
                continue;
            }
            let detached = parents.all(|r| {
                cut[r] || index.endpoints(r).is_some_and(|(parent, _)| hidden[parent])
            });
            if detached {
                hidden[entity] = true;
                changed = true;
            }
        }
        if !changed {
            return hidden;
        }
    }
}
