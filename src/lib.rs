//! thesu: compile annotated thesis corpora into filtered graph descriptions
//!
//! A corpus marks up sources with theses, propositions, ordered sequence
//! steps and extrinsic elements, plus the logical and correspondence
//! relations between them. This crate extracts those into an entity model,
//! narrows the model with a filter configuration and renders the result in
//! two graph dialects: a hierarchical DOT description clustered by source,
//! and a flat force-directed description for Gephi-style tools.
//!
//! # Core Concepts
//!
//! - **Entities**: theses, propositions, sequence steps and extrinsic elements
//! - **Relations**: containment, step ordering, logical and correspondence edges
//! - **Filters**: source selection, kind exclusions, custom overrides, focus
//! - **Dialects**: text serializations of one generic graph
//!
//! # Example
//!
//! ```
//! use thesu::{DocumentNode, FilterConfig, Pipeline};
//!
//! let corpus = DocumentNode::new("corpus").with_child(
//!     DocumentNode::new("source")
//!         .with_attr("id", "plut")
//!         .with_child(DocumentNode::new("thesis").with_attr("id", "plut.t1")),
//! );
//! let pipeline = Pipeline::from_document(&corpus).unwrap();
//! let artifacts = pipeline.run(&FilterConfig::default()).unwrap();
//! assert!(artifacts.hierarchical.starts_with("digraph G {"));
//! ```

pub mod dialect;
pub mod document;
pub mod extract;
pub mod filter;
pub mod model;
pub mod pipeline;
pub mod settings;
pub mod view;

pub use dialect::{render, render_dot, render_gephi, Dialect, DotDialect, GephiDialect};
pub use document::{load_document, DocumentError, DocumentNode, DocumentResult};
pub use extract::{extract, Extraction, ExtractionError, ExtractionWarning, Extractor};
pub use filter::{
    select, ConfigurationError, FilterConfig, FilterEngine, FilterResult, FilterWarning,
    MatchingRule, Selection, SequenceMatcher,
};
pub use model::{
    Entity, EntityId, EntityKind, EntityModel, LogicalKind, Manifestation, Relation, RelationId,
    RelationType,
};
pub use pipeline::{write_artifacts, ArtifactPaths, Artifacts, Pipeline, ThesuError, ThesuResult};
pub use settings::{ArtifactKind, LayoutEngine, Settings, SettingsError};
pub use view::{build, build_selection, GenericGraph, GraphEdge, GraphNode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
