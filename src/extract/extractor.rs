//! Two-pass walk over the document tree

use super::{fields, tags, ExtractResult, Extraction, ExtractionError, ExtractionWarning};
use crate::document::text::normalize_ref;
use crate::document::DocumentNode;
use crate::model::{
    Entity, EntityDetail, EntityId, EntityModel, LogicalKind, Manifestation, ModelError, Relation,
    RelationType,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Extract an entity model from a parsed corpus
pub fn extract(root: &DocumentNode) -> ExtractResult<Extraction> {
    Extractor::new().extract(root)
}

/// Stateful two-pass extractor
///
/// One instance extracts one document; `extract` consumes it.
#[derive(Debug, Default)]
pub struct Extractor {
    model: EntityModel,
    warnings: Vec<ExtractionWarning>,
    /// Last step index seen per parent (pass one)
    last_step: HashMap<EntityId, u32>,
    /// Previous step entity per parent (pass two)
    previous_step: HashMap<EntityId, EntityId>,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(mut self, root: &DocumentNode) -> ExtractResult<Extraction> {
        let root_path = format!("/{}", root.tag);

        self.collect(root, &root_path, None, None)?;
        debug!(
            sources = self.model.sources().len(),
            entities = self.model.entity_count(),
            "collected entities"
        );

        self.link(root, &root_path, None)?;
        debug!(
            relations = self.model.relation_count(),
            warnings = self.warnings.len(),
            "resolved relations"
        );

        for warning in &self.warnings {
            warn!("{}", warning);
        }

        Ok(Extraction {
            model: self.model,
            warnings: self.warnings,
        })
    }

    // ------------------------------------------------------------------
    // Pass one: entities
    // ------------------------------------------------------------------

    fn collect(
        &mut self,
        node: &DocumentNode,
        path: &str,
        source: Option<&str>,
        parent: Option<&EntityId>,
    ) -> ExtractResult<()> {
        match node.tag.as_str() {
            tags::SOURCE => {
                let id = required_id(node, path)?.to_string();
                self.model.add_source(id.clone()).map_err(|err| match err {
                    ModelError::DuplicateSource(id) => ExtractionError::DuplicateSource {
                        node: path.to_string(),
                        id,
                    },
                    other => model_error(path, other),
                })?;
                for (child, child_path) in child_paths(node, path) {
                    self.collect(child, &child_path, Some(id.as_str()), None)?;
                }
                Ok(())
            }
            tags::THESIS | tags::PROPOSITION | tags::SEQUENCE | tags::MISC => {
                let Some(source) = source else {
                    return Err(ExtractionError::OutsideSource {
                        node: path.to_string(),
                        tag: node.tag.clone(),
                    });
                };
                let entity = self.entity_from(node, path, source, parent)?;
                let id = entity.id.clone();
                self.model.add_entity(entity).map_err(|err| match err {
                    ModelError::DuplicateEntity(id) => ExtractionError::DuplicateIdentifier {
                        node: path.to_string(),
                        id,
                    },
                    other => model_error(path, other),
                })?;
                for (child, child_path) in child_paths(node, path) {
                    self.collect(child, &child_path, Some(source), Some(&id))?;
                }
                Ok(())
            }
            _ => {
                for (child, child_path) in child_paths(node, path) {
                    self.collect(child, &child_path, source, parent)?;
                }
                Ok(())
            }
        }
    }

    fn entity_from(
        &mut self,
        node: &DocumentNode,
        path: &str,
        source: &str,
        parent: Option<&EntityId>,
    ) -> ExtractResult<Entity> {
        let id = required_id(node, path)?;
        let detail = match node.tag.as_str() {
            tags::THESIS => EntityDetail::Thesis,
            tags::PROPOSITION => EntityDetail::Proposition,
            tags::SEQUENCE => {
                let Some(parent) = parent else {
                    return Err(ExtractionError::MissingContext {
                        node: path.to_string(),
                        tag: node.tag.clone(),
                    });
                };
                let step = self.next_step(node, path, parent)?;
                EntityDetail::Sequence {
                    step,
                    parent: parent.clone(),
                }
            }
            _ => EntityDetail::ExtrinsicElement {
                manifestation: manifestation(node),
            },
        };

        let mut entity = Entity::new(id, source, detail)
            .with_paraphrasis(fields::paraphrasis(node))
            .with_speakers(fields::speakers(node));
        entity.text = fields::excerpt(node);
        entity.locus = fields::locus(node);
        Ok(entity)
    }

    /// Validate the declared step (or infer it) against the parent's last step
    fn next_step(&mut self, node: &DocumentNode, path: &str, parent: &EntityId) -> ExtractResult<u32> {
        let previous = self.last_step.get(parent).copied();
        let expected = match previous {
            Some(previous) => previous.checked_add(1).ok_or_else(|| ExtractionError::MalformedAttribute {
                node: path.to_string(),
                attribute: "step",
                reason: format!("no step can follow step {} of {}", previous, parent),
            })?,
            None => 1,
        };
        let step = match node.attr("step") {
            Some(raw) => {
                let step: u32 = raw
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|s| *s >= 1)
                    .ok_or_else(|| ExtractionError::MalformedAttribute {
                        node: path.to_string(),
                        attribute: "step",
                        reason: format!("expected a positive integer, got {:?}", raw),
                    })?;
                if previous.is_some() && step != expected {
                    return Err(ExtractionError::StepOrder {
                        node: path.to_string(),
                        parent: parent.clone(),
                        found: step,
                        expected,
                    });
                }
                step
            }
            None => expected,
        };
        self.last_step.insert(parent.clone(), step);
        Ok(step)
    }

    // ------------------------------------------------------------------
    // Pass two: relations
    // ------------------------------------------------------------------

    fn link(&mut self, node: &DocumentNode, path: &str, parent: Option<&EntityId>) -> ExtractResult<()> {
        match node.tag.as_str() {
            tags::SOURCE => {
                for (child, child_path) in child_paths(node, path) {
                    self.link(child, &child_path, None)?;
                }
            }
            tags::THESIS | tags::PROPOSITION | tags::SEQUENCE | tags::MISC => {
                let id = required_id(node, path)?;
                if let Some(parent) = parent {
                    self.push_relation(Relation::new(parent.clone(), id.clone(), RelationType::Contains));
                    if node.tag == tags::SEQUENCE {
                        if let Some(previous) = self.previous_step.insert(parent.clone(), id.clone()) {
                            self.push_relation(Relation::new(previous, id.clone(), RelationType::Precedes));
                        }
                    }
                }
                for (child, child_path) in child_paths(node, path) {
                    self.link(child, &child_path, Some(&id))?;
                }
            }
            tags::MATCHING_PROPOSITION
            | tags::ENTAILED_BY
            | tags::RELATION
            | tags::MATCHING_SEQUENCE => {
                let Some(owner) = parent else {
                    return Err(ExtractionError::MissingContext {
                        node: path.to_string(),
                        tag: node.tag.clone(),
                    });
                };
                let reference = required_attr(node, path, "ref")?;
                let relation_type = relation_type(node, path)?;
                let reference = normalize_ref(reference).to_string();

                if !self.model.contains(&reference) {
                    self.warnings.push(ExtractionWarning::UnresolvedReference {
                        node: path.to_string(),
                        from: owner.clone(),
                        reference,
                    });
                } else if reference == owner.as_str() {
                    self.warnings.push(ExtractionWarning::SelfReference {
                        node: path.to_string(),
                        id: owner.clone(),
                    });
                } else if node.tag == tags::ENTAILED_BY {
                    self.push_relation(Relation::new(reference, owner.clone(), relation_type));
                } else {
                    self.push_relation(Relation::new(owner.clone(), reference, relation_type));
                }
            }
            _ => {
                for (child, child_path) in child_paths(node, path) {
                    self.link(child, &child_path, parent)?;
                }
            }
        }
        Ok(())
    }

    fn push_relation(&mut self, relation: Relation) {
        let id = relation.id.clone();
        match self.model.add_relation(relation) {
            Ok(true) => {}
            Ok(false) => debug!(relation = %id, "merged duplicate relation"),
            // Endpoints are checked before every call
            Err(err) => debug!(relation = %id, error = %err, "relation skipped"),
        }
    }
}

/// Children paired with their tree path (`/corpus/source[1]/thesis[2]`)
fn child_paths<'a>(node: &'a DocumentNode, path: &str) -> Vec<(&'a DocumentNode, String)> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    node.children
        .iter()
        .map(|child| {
            let n = seen.entry(child.tag.as_str()).or_insert(0);
            *n += 1;
            (child, format!("{}/{}[{}]", path, child.tag, n))
        })
        .collect()
}

fn required_attr<'a>(node: &'a DocumentNode, path: &str, attribute: &'static str) -> ExtractResult<&'a str> {
    match node.attr(attribute).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ExtractionError::MissingAttribute {
            node: path.to_string(),
            attribute,
        }),
    }
}

fn required_id(node: &DocumentNode, path: &str) -> ExtractResult<EntityId> {
    let id = required_attr(node, path, "id")?;
    if id.chars().any(char::is_whitespace) {
        return Err(ExtractionError::MalformedAttribute {
            node: path.to_string(),
            attribute: "id",
            reason: format!("identifier {:?} contains whitespace", id),
        });
    }
    Ok(EntityId::from(id))
}

fn manifestation(node: &DocumentNode) -> Manifestation {
    if node.flag("extrinsic") {
        Manifestation::Extrinsic
    } else if node.flag("implicit") {
        Manifestation::Implicit
    } else {
        Manifestation::Explicit
    }
}

fn relation_type(node: &DocumentNode, path: &str) -> ExtractResult<RelationType> {
    let qualifier = |key: &str| {
        node.attr(key)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    match node.tag.as_str() {
        tags::MATCHING_PROPOSITION => Ok(RelationType::Contains),
        tags::ENTAILED_BY => Ok(RelationType::Logical {
            kind: LogicalKind::Entailment,
            qualifier: qualifier("as"),
        }),
        tags::MATCHING_SEQUENCE => Ok(RelationType::Correspondence {
            label: qualifier("label").unwrap_or_else(|| "matches".to_string()),
        }),
        _ => {
            let raw = required_attr(node, path, "type")?;
            let kind = LogicalKind::parse(raw).ok_or_else(|| ExtractionError::MalformedAttribute {
                node: path.to_string(),
                attribute: "type",
                reason: format!("unknown relation type {:?}", raw),
            })?;
            Ok(RelationType::Logical {
                kind,
                qualifier: qualifier("qualifier"),
            })
        }
    }
}

fn model_error(path: &str, err: ModelError) -> ExtractionError {
    ExtractionError::MalformedAttribute {
        node: path.to_string(),
        attribute: "id",
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityKind, RelationCategory};

    fn source(id: &str) -> DocumentNode {
        DocumentNode::new("source").with_attr("id", id)
    }

    fn entity(tag: &str, id: &str) -> DocumentNode {
        DocumentNode::new(tag).with_attr("id", id)
    }

    fn reference(tag: &str, target: &str) -> DocumentNode {
        DocumentNode::new(tag).with_attr("ref", target)
    }

    fn corpus(children: Vec<DocumentNode>) -> DocumentNode {
        DocumentNode::new("corpus").with_children(children)
    }

    #[test]
    fn test_extracts_entities_in_document_order() {
        let doc = corpus(vec![source("plut").with_child(
            entity("thesis", "plut.t1")
                .with_child(DocumentNode::new("paraphrasis").with_text("Bread is  healthy"))
                .with_child(entity("proposition", "plut.p1"))
                .with_child(entity("misc", "plut.m1").with_attr("implicit", "true")),
        )]);

        let extraction = extract(&doc).unwrap();
        let model = &extraction.model;

        let kinds: Vec<EntityKind> = model.entities().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![EntityKind::Thesis, EntityKind::Proposition, EntityKind::ExtrinsicElement]
        );
        assert_eq!(model.get("plut.t1").unwrap().paraphrasis, "Bread is healthy");
        assert_eq!(
            model.get("plut.m1").unwrap().detail,
            EntityDetail::ExtrinsicElement {
                manifestation: Manifestation::Implicit
            }
        );
        assert_eq!(model.relation_count(), 2);
        assert!(model
            .relations()
            .iter()
            .all(|r| r.relation_type == RelationType::Contains && r.source.as_str() == "plut.t1"));
        assert!(!extraction.has_warnings());
    }

    #[test]
    fn test_forward_reference_resolves_in_second_pass() {
        let doc = corpus(vec![source("plut")
            .with_child(entity("thesis", "plut.t1").with_child(reference("matchingProposition", "#plut.p1")))
            .with_child(entity("proposition", "plut.p1"))]);

        let extraction = extract(&doc).unwrap();
        let relation = &extraction.model.relations()[0];
        assert_eq!(relation.source.as_str(), "plut.t1");
        assert_eq!(relation.target.as_str(), "plut.p1");
        assert!(relation.relation_type.is_containment());
    }

    #[test]
    fn test_dangling_reference_becomes_warning() {
        let doc = corpus(vec![source("plut").with_child(
            entity("thesis", "plut.t1").with_child(
                DocumentNode::new("relation")
                    .with_attr("type", "contrast")
                    .with_attr("ref", "plut.t99"),
            ),
        )]);

        let extraction = extract(&doc).unwrap();
        assert_eq!(extraction.model.relation_count(), 0);
        assert_eq!(
            extraction.warnings,
            vec![ExtractionWarning::UnresolvedReference {
                node: "/corpus/source[1]/thesis[1]/relation[1]".to_string(),
                from: EntityId::from("plut.t1"),
                reference: "plut.t99".to_string(),
            }]
        );
    }

    #[test]
    fn test_entailed_by_points_at_declaring_entity() {
        let doc = corpus(vec![source("plut")
            .with_child(entity("proposition", "plut.p1"))
            .with_child(
                entity("proposition", "plut.p2")
                    .with_child(reference("entailedBy", "plut.p1").with_attr("as", "premise")),
            )]);

        let model = extract(&doc).unwrap().model;
        let relation = &model.relations()[0];
        assert_eq!(relation.source.as_str(), "plut.p1");
        assert_eq!(relation.target.as_str(), "plut.p2");
        assert_eq!(relation.relation_type.label(), "by premise, ENTAILS");
    }

    #[test]
    fn test_sequence_steps_chain_with_precedes() {
        let doc = corpus(vec![source("gal").with_child(
            entity("proposition", "gal.p1")
                .with_child(entity("sequence", "gal.s1").with_attr("step", "1"))
                .with_child(entity("sequence", "gal.s2"))
                .with_child(entity("sequence", "gal.s3").with_attr("step", "3")),
        )]);

        let model = extract(&doc).unwrap().model;
        assert_eq!(model.get("gal.s2").unwrap().step(), Some(2));
        let precedes: Vec<(&str, &str)> = model
            .relations()
            .iter()
            .filter(|r| r.relation_type == RelationType::Precedes)
            .map(|r| (r.source.as_str(), r.target.as_str()))
            .collect();
        assert_eq!(precedes, vec![("gal.s1", "gal.s2"), ("gal.s2", "gal.s3")]);
    }

    #[test]
    fn test_step_gap_is_fatal() {
        let doc = corpus(vec![source("gal").with_child(
            entity("proposition", "gal.p1")
                .with_child(entity("sequence", "gal.s1").with_attr("step", "1"))
                .with_child(entity("sequence", "gal.s3").with_attr("step", "3")),
        )]);

        let err = extract(&doc).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::StepOrder {
                node: "/corpus/source[1]/proposition[1]/sequence[2]".to_string(),
                parent: EntityId::from("gal.p1"),
                found: 3,
                expected: 2,
            }
        );
    }

    #[test]
    fn test_step_after_largest_index_is_an_error() {
        let doc = corpus(vec![source("gal").with_child(
            entity("proposition", "gal.p1")
                .with_child(entity("sequence", "gal.s1").with_attr("step", "4294967295"))
                .with_child(entity("sequence", "gal.s2")),
        )]);

        let err = extract(&doc).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::MalformedAttribute { ref node, attribute: "step", .. }
                if node == "/corpus/source[1]/proposition[1]/sequence[2]"
        ));
    }

    #[test]
    fn test_missing_id_names_the_node() {
        let doc = corpus(vec![source("plut").with_child(DocumentNode::new("thesis"))]);
        let err = extract(&doc).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::MissingAttribute {
                node: "/corpus/source[1]/thesis[1]".to_string(),
                attribute: "id",
            }
        );
    }

    #[test]
    fn test_duplicate_identifier_is_fatal() {
        let doc = corpus(vec![
            source("plut").with_child(entity("thesis", "x.t1")),
            source("gal").with_child(entity("thesis", "x.t1")),
        ]);
        assert!(matches!(
            extract(&doc).unwrap_err(),
            ExtractionError::DuplicateIdentifier { .. }
        ));
    }

    #[test]
    fn test_entity_outside_source_is_fatal() {
        let doc = corpus(vec![entity("thesis", "plut.t1")]);
        assert!(matches!(
            extract(&doc).unwrap_err(),
            ExtractionError::OutsideSource { .. }
        ));
    }

    #[test]
    fn test_unknown_relation_type_is_fatal() {
        let doc = corpus(vec![source("plut")
            .with_child(entity("thesis", "plut.t1"))
            .with_child(
                entity("thesis", "plut.t2").with_child(
                    DocumentNode::new("relation")
                        .with_attr("type", "causes")
                        .with_attr("ref", "plut.t1"),
                ),
            )]);
        assert!(matches!(
            extract(&doc).unwrap_err(),
            ExtractionError::MalformedAttribute { attribute: "type", .. }
        ));
    }

    #[test]
    fn test_correspondence_and_self_reference() {
        let doc = corpus(vec![
            source("plut").with_child(
                entity("thesis", "plut.t1").with_child(
                    entity("sequence", "plut.s1")
                        .with_child(reference("matchingSequence", "gal.s1").with_attr("label", "alters"))
                        .with_child(reference("matchingSequence", "plut.s1")),
                ),
            ),
            source("gal")
                .with_child(entity("proposition", "gal.p1").with_child(entity("sequence", "gal.s1"))),
        ]);

        let extraction = extract(&doc).unwrap();
        let correspondence: Vec<_> = extraction
            .model
            .relations()
            .iter()
            .filter(|r| r.category() == RelationCategory::Correspondence)
            .collect();
        assert_eq!(correspondence.len(), 1);
        assert_eq!(correspondence[0].relation_type.label(), "ALTERS");
        assert!(matches!(
            extraction.warnings[..],
            [ExtractionWarning::SelfReference { .. }]
        ));
    }
}
