//! End-to-end scenarios: corpus tree in, filtered graph and dialect text out

mod common;

use common::*;
use thesu::{
    build_selection, extract, select, ExtractionWarning, FilterConfig, FilterWarning, Pipeline,
};

fn visible(pipeline: &Pipeline, config: &FilterConfig) -> Vec<String> {
    let selection = pipeline.select(config).unwrap();
    selection
        .entity_ids()
        .iter()
        .map(|id| id.to_string())
        .collect()
}

// ----------------------------------------------------------------------------
// Kind exclusions
// ----------------------------------------------------------------------------

#[test]
fn test_filtered_proposition_keeps_sibling_sequence() {
    let document = corpus(vec![source(
        "plut",
        vec![thesis("T1")
            .with_child(proposition("P1"))
            .with_child(sequence("S1"))],
    )]);
    let pipeline = pipeline_of(&document);
    let config = FilterConfig {
        filter_propositions: true,
        filter_all_sequences: false,
        ..Default::default()
    };

    let artifacts = pipeline.run(&config).unwrap();
    let ids: Vec<&str> = artifacts.graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["T1", "S1"]);
    assert!(!artifacts.graph.has_edge("T1", "P1"));
    assert!(artifacts.graph.has_edge("T1", "S1"));
    assert!(!artifacts.hierarchical.contains("\"P1\""));
}

#[test]
fn test_matching_sequences_leave_thesis_steps() {
    let pipeline = pipeline_of(&two_theses());
    let config = FilterConfig {
        filter_matching_proposition_sequences: true,
        ..Default::default()
    };

    assert_eq!(visible(&pipeline, &config), vec!["T1", "P1", "S1", "T2"]);
}

// ----------------------------------------------------------------------------
// Custom overrides
// ----------------------------------------------------------------------------

#[test]
fn test_override_hides_proposition_under_one_thesis_only() {
    let pipeline = pipeline_of(&two_theses());
    let config = FilterConfig::new().with_custom_proposition("P1", ["T1"]);

    let artifacts = pipeline.run(&config).unwrap();
    assert!(artifacts.graph.has_node("P1"));
    assert!(!artifacts.graph.has_edge("T1", "P1"));
    assert!(artifacts.graph.has_edge("T2", "P1"));
    // T1's own step no longer links into P1's steps
    assert!(!artifacts.graph.has_edge("S1", "P1a"));
    assert!(artifacts.graph.has_edge("P1a", "P1b"));
    assert!(artifacts.warnings.is_empty());
}

#[test]
fn test_override_under_every_parent_hides_subtree() {
    let pipeline = pipeline_of(&two_theses());
    let config = FilterConfig::new().with_custom_proposition("#P1", ["#T1", "#T2"]);

    let ids = visible(&pipeline, &config);
    assert_eq!(ids, vec!["T1", "S1", "T2"]);
}

#[test]
fn test_override_for_unknown_entity_warns() {
    let pipeline = pipeline_of(&two_theses());
    let config = FilterConfig::new().with_custom_sequence("S9", ["T1"]);

    let artifacts = pipeline.run(&config).unwrap();
    assert_eq!(artifacts.graph.nodes.len(), 6);
    assert_eq!(
        artifacts.warnings,
        vec![FilterWarning::UnknownOverrideEntity {
            entity: "S9".to_string()
        }]
    );
}

// ----------------------------------------------------------------------------
// Focus anchoring
// ----------------------------------------------------------------------------

#[test]
fn test_focus_on_disconnected_thesis_drops_the_other() {
    let document = corpus(vec![source(
        "plut",
        vec![
            thesis("T1")
                .with_child(proposition("P1"))
                .with_child(sequence("S1")),
            thesis("T2")
                .with_child(proposition("P2").with_child(sequence("P2a"))),
        ],
    )]);
    let pipeline = pipeline_of(&document);

    let ids = visible(&pipeline, &FilterConfig::new().with_focus(["T2"]));
    assert_eq!(ids, vec!["T2", "P2", "P2a"]);
}

#[test]
fn test_focus_follows_logical_edges_across_theses() {
    let pipeline = pipeline_of(&symposiacs());

    let ids = visible(&pipeline, &FilterConfig::new().with_focus(["plut.T2"]));
    assert_eq!(
        ids,
        vec!["plut.P1", "plut.P1a", "plut.P1b", "plut.T2", "plut.P2", "plut.S1", "plut.S2"]
    );
    assert!(!ids.contains(&"plut.T1".to_string()));
}

#[test]
fn test_focus_anchor_removed_by_source_filter_warns() {
    let pipeline = pipeline_of(&symposiacs());
    let config = FilterConfig::new()
        .with_sources(["gal"])
        .with_focus(["plut.T1"]);

    let artifacts = pipeline.run(&config).unwrap();
    assert!(artifacts.graph.is_empty());
    assert_eq!(
        artifacts.warnings,
        vec![FilterWarning::FocusAnchorFiltered {
            anchor: "plut.T1".to_string()
        }]
    );
}

// ----------------------------------------------------------------------------
// Extraction
// ----------------------------------------------------------------------------

#[test]
fn test_dangling_reference_is_dropped_with_warning() {
    let document = corpus(vec![source(
        "plut",
        vec![thesis("T1").with_child(proposition("P1").with_child(relation("contrast", "P404")))],
    )]);

    let extraction = extract(&document).unwrap();
    assert_eq!(extraction.model.entity_count(), 2);
    assert_eq!(extraction.model.relation_count(), 1);
    assert!(extraction
        .model
        .relations()
        .iter()
        .all(|r| r.target.as_str() != "P404"));
    assert!(matches!(
        extraction.warnings.as_slice(),
        [ExtractionWarning::UnresolvedReference { reference, .. }] if reference == "P404"
    ));
}

#[test]
fn test_cross_source_relations_survive_without_filters() {
    let model = model_of(&symposiacs());
    let selection = select(&model, &FilterConfig::default()).unwrap();
    let graph = build_selection(&model, &selection);

    assert!(graph.has_edge("gal.P3", "plut.P1"));
    assert!(graph.has_edge("plut.P2", "plut.P1"));
    assert!(graph.has_edge("plut.S1", "plut.S2"));
    assert_eq!(
        graph.clusters().iter().map(|(key, _)| *key).collect::<Vec<_>>(),
        vec!["plut", "gal"]
    );
}

// ----------------------------------------------------------------------------
// Dialects
// ----------------------------------------------------------------------------

#[test]
fn test_hierarchical_text_clusters_sources_and_ranks_roots() {
    let pipeline = pipeline_of(&symposiacs());
    let artifacts = pipeline.run(&FilterConfig::default()).unwrap();
    let dot = &artifacts.hierarchical;

    assert!(dot.starts_with("digraph G {\n"));
    assert!(dot.ends_with("}\n"));
    assert!(dot.contains("    subgraph \"cluster_plut\" {\n"));
    assert!(dot.contains("    subgraph \"cluster_gal\" {\n"));
    assert!(dot.contains("        { rank=min; \"plut.T1\"; \"plut.T2\"; }\n"));
    assert!(dot.contains("\"gal.P3\" -> \"plut.P1\""));
    assert!(dot.contains("CONTRASTS WITH"));

    let plut = dot.find("cluster_plut").unwrap();
    let gal = dot.find("cluster_gal").unwrap();
    let first_edge = dot.find(" -> ").unwrap();
    assert!(plut < gal && gal < first_edge);
}

#[test]
fn test_force_directed_text_is_flat() {
    let pipeline = pipeline_of(&symposiacs());
    let artifacts = pipeline.run(&FilterConfig::default()).unwrap();
    let gephi = &artifacts.force_directed;

    assert!(gephi.starts_with("digraph G {\n"));
    assert!(!gephi.contains("subgraph"));
    assert!(!gephi.contains("rank=min"));
    assert!(gephi.contains("\"plut.P2\" -> \"plut.P1\""));
    assert_eq!(
        gephi.lines().filter(|l| l.contains(" -> ")).count(),
        artifacts.graph.edges.len()
    );
}

#[test]
fn test_same_view_renders_identically_twice() {
    let config = FilterConfig {
        filter_extrinsic_elements: true,
        ..Default::default()
    };
    let first = pipeline_of(&symposiacs()).run(&config).unwrap();
    let second = pipeline_of(&symposiacs()).run(&config).unwrap();

    assert_eq!(first.hierarchical, second.hierarchical);
    assert_eq!(first.force_directed, second.force_directed);
}
