//! Common test utilities for thesu integration tests
//!
//! Builds small corpus trees in memory so scenarios read like the markup
//! they describe.

#![allow(dead_code)]

use thesu::{extract, DocumentNode, EntityModel, Pipeline};

pub fn corpus(sources: Vec<DocumentNode>) -> DocumentNode {
    DocumentNode::new("corpus").with_children(sources)
}

pub fn source(id: &str, children: Vec<DocumentNode>) -> DocumentNode {
    DocumentNode::new("source")
        .with_attr("id", id)
        .with_children(children)
}

pub fn thesis(id: &str) -> DocumentNode {
    DocumentNode::new("thesis").with_attr("id", id)
}

pub fn proposition(id: &str) -> DocumentNode {
    DocumentNode::new("proposition").with_attr("id", id)
}

pub fn sequence(id: &str) -> DocumentNode {
    DocumentNode::new("sequence").with_attr("id", id)
}

pub fn misc(id: &str) -> DocumentNode {
    DocumentNode::new("misc").with_attr("id", id)
}

pub fn paraphrasis(text: &str) -> DocumentNode {
    DocumentNode::new("paraphrasis").with_text(text)
}

pub fn matching_proposition(target: &str) -> DocumentNode {
    DocumentNode::new("matchingProposition").with_attr("ref", target)
}

pub fn matching_sequence(target: &str, label: &str) -> DocumentNode {
    DocumentNode::new("matchingSequence")
        .with_attr("ref", target)
        .with_attr("label", label)
}

pub fn relation(kind: &str, target: &str) -> DocumentNode {
    DocumentNode::new("relation")
        .with_attr("type", kind)
        .with_attr("ref", target)
}

/// T1 contains P1 (with steps P1a, P1b) and S1; T2 also claims P1.
pub fn two_theses() -> DocumentNode {
    corpus(vec![source(
        "plut",
        vec![
            thesis("T1")
                .with_child(paraphrasis("Wine should be mixed before the meal"))
                .with_child(
                    proposition("P1")
                        .with_child(paraphrasis("Cold water tempers wine"))
                        .with_child(sequence("P1a"))
                        .with_child(sequence("P1b")),
                )
                .with_child(sequence("S1").with_child(matching_sequence("P1a", "extends"))),
            thesis("T2").with_child(matching_proposition("#P1")),
        ],
    )])
}

/// Two sources whose theses share no path; gal.P3 contrasts with plut.P1.
pub fn symposiacs() -> DocumentNode {
    corpus(vec![
        source(
            "plut",
            vec![
                thesis("plut.T1")
                    .with_child(
                        proposition("plut.P1")
                            .with_child(sequence("plut.P1a"))
                            .with_child(sequence("plut.P1b")),
                    )
                    .with_child(misc("plut.M1").with_attr("implicit", "true")),
                thesis("plut.T2")
                    .with_child(proposition("plut.P2").with_child(relation("entailment", "plut.P1")))
                    .with_child(sequence("plut.S1"))
                    .with_child(sequence("plut.S2")),
            ],
        ),
        source(
            "gal",
            vec![thesis("gal.T3").with_child(
                proposition("gal.P3")
                    .with_child(relation("contrast", "plut.P1"))
                    .with_child(misc("gal.M2").with_attr("extrinsic", "true")),
            )],
        ),
    ])
}

pub fn model_of(document: &DocumentNode) -> EntityModel {
    extract(document).expect("fixture extracts").model
}

pub fn pipeline_of(document: &DocumentNode) -> Pipeline {
    Pipeline::from_document(document).expect("fixture extracts")
}
