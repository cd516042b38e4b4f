//! Pipeline: one extraction, any number of filtered views
//!
//! The entity model is extracted once and shared read-only; each filter
//! configuration gets its own selection, generic graph and pair of text
//! artifacts. Named views are evaluated in parallel.

use crate::dialect::{render, DotDialect, GephiDialect};
use crate::document::{DocumentError, DocumentNode};
use crate::extract::{extract, Extraction, ExtractionError, ExtractionWarning};
use crate::filter::{
    ConfigurationError, FilterConfig, FilterEngine, FilterResult, FilterWarning, MatchingRule,
    Selection,
};
use crate::model::EntityModel;
use crate::settings::{ArtifactKind, LayoutEngine, LayoutSettings, Settings, SettingsError};
use crate::view::{build_selection, GenericGraph};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Any failure along the pipeline
#[derive(Debug, Error)]
pub enum ThesuError {
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("view {view}: {source}")]
    View {
        view: String,
        source: ConfigurationError,
    },

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for pipeline operations
pub type ThesuResult<T> = Result<T, ThesuError>;

/// Output of one filter configuration
#[derive(Debug, Clone)]
pub struct Artifacts {
    /// Hierarchical dialect text
    pub hierarchical: String,
    /// Force-directed dialect text
    pub force_directed: String,
    pub graph: GenericGraph,
    pub warnings: Vec<FilterWarning>,
}

impl Artifacts {
    /// Text the given layout engine should render
    pub fn for_engine(&self, engine: LayoutEngine) -> &str {
        match engine.artifact() {
            ArtifactKind::Hierarchical => &self.hierarchical,
            ArtifactKind::ForceDirected => &self.force_directed,
        }
    }
}

/// Paths written by [`write_artifacts`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub hierarchical: PathBuf,
    pub force_directed: PathBuf,
}

/// Extraction result plus the dialect configuration for rendering
#[derive(Debug, Clone)]
pub struct Pipeline {
    model: EntityModel,
    extraction_warnings: Vec<ExtractionWarning>,
    matching_rule: MatchingRule,
    dot: DotDialect,
    gephi: GephiDialect,
}

impl Pipeline {
    /// Wrap an extraction with the default settings' matching rule and layout
    pub fn new(extraction: Extraction) -> Self {
        let (dot, gephi) = dialects(&LayoutSettings::default());
        Self {
            model: extraction.model,
            extraction_warnings: extraction.warnings,
            matching_rule: MatchingRule::default(),
            dot,
            gephi,
        }
    }

    /// Extract a document and wrap the result
    pub fn from_document(root: &DocumentNode) -> ThesuResult<Self> {
        Ok(Self::new(extract(root)?))
    }

    /// Apply matching rule and layout attributes from settings
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.matching_rule = settings.matching_rule;
        (self.dot, self.gephi) = dialects(&settings.layout);
        self
    }

    pub fn with_matching_rule(mut self, rule: MatchingRule) -> Self {
        self.matching_rule = rule;
        self
    }

    pub fn model(&self) -> &EntityModel {
        &self.model
    }

    pub fn extraction_warnings(&self) -> &[ExtractionWarning] {
        &self.extraction_warnings
    }

    pub fn select(&self, config: &FilterConfig) -> FilterResult<Selection> {
        FilterEngine::new(&self.model)
            .with_matcher(self.matching_rule.matcher())
            .select(config)
    }

    /// Filter, build and render both dialects for one configuration
    pub fn run(&self, config: &FilterConfig) -> FilterResult<Artifacts> {
        let selection = self.select(config)?;
        let graph = build_selection(&self.model, &selection);
        debug!(nodes = graph.nodes.len(), edges = graph.edges.len(), "graph built");

        Ok(Artifacts {
            hierarchical: render(&graph, &self.dot),
            force_directed: render(&graph, &self.gephi),
            graph,
            warnings: selection.warnings,
        })
    }

    /// Run every named view in parallel; results keep the map's order
    pub fn run_views(
        &self,
        views: &BTreeMap<String, FilterConfig>,
    ) -> Vec<(String, FilterResult<Artifacts>)> {
        views
            .par_iter()
            .map(|(name, config)| (name.clone(), self.run(config)))
            .collect()
    }
}

fn dialects(layout: &LayoutSettings) -> (DotDialect, GephiDialect) {
    (
        DotDialect::default().with_layout(layout.attributes(LayoutEngine::Dot)),
        GephiDialect::default().with_layout(layout.attributes(layout.force_directed_engine())),
    )
}

/// Write `<basename>.dot` and `<basename>_gephi.dot` into `directory`
pub fn write_artifacts(
    directory: impl AsRef<Path>,
    basename: &str,
    artifacts: &Artifacts,
) -> ThesuResult<ArtifactPaths> {
    let directory = directory.as_ref();
    std::fs::create_dir_all(directory)?;

    let paths = ArtifactPaths {
        hierarchical: directory.join(format!("{}.dot", basename)),
        force_directed: directory.join(format!("{}_gephi.dot", basename)),
    };
    std::fs::write(&paths.hierarchical, &artifacts.hierarchical)?;
    std::fs::write(&paths.force_directed, &artifacts.force_directed)?;
    info!(
        hierarchical = %paths.hierarchical.display(),
        force_directed = %paths.force_directed.display(),
        "artifacts written"
    );
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> DocumentNode {
        DocumentNode::new("corpus").with_child(
            DocumentNode::new("source").with_attr("id", "plut").with_child(
                DocumentNode::new("thesis")
                    .with_attr("id", "plut.t1")
                    .with_child(DocumentNode::new("proposition").with_attr("id", "plut.p1")),
            ),
        )
    }

    #[test]
    fn test_run_renders_both_dialects() {
        let pipeline = Pipeline::from_document(&corpus()).unwrap();
        let artifacts = pipeline.run(&FilterConfig::default()).unwrap();

        assert!(artifacts.hierarchical.contains("subgraph \"cluster_plut\""));
        assert!(!artifacts.force_directed.contains("subgraph"));
        assert_eq!(artifacts.graph.nodes.len(), 2);
        assert_eq!(artifacts.for_engine(LayoutEngine::Neato), artifacts.force_directed);
    }

    #[test]
    fn test_settings_layout_reaches_headers() {
        let settings = Settings::from_yaml_str("layout:\n  dot:\n    splines: polyline\n").unwrap();
        let pipeline = Pipeline::from_document(&corpus()).unwrap().with_settings(&settings);
        let artifacts = pipeline.run(&FilterConfig::default()).unwrap();

        assert!(artifacts.hierarchical.contains("    splines=\"polyline\";\n"));
        assert!(artifacts.force_directed.contains("    maxiter=2000;\n"));
    }

    #[test]
    fn test_default_settings_match_bare_pipeline() {
        let bare = Pipeline::from_document(&corpus()).unwrap();
        let configured = Pipeline::from_document(&corpus())
            .unwrap()
            .with_settings(&Settings::default());

        let bare = bare.run(&FilterConfig::default()).unwrap();
        let configured = configured.run(&FilterConfig::default()).unwrap();
        assert_eq!(bare.hierarchical, configured.hierarchical);
        assert_eq!(bare.force_directed, configured.force_directed);
        assert_eq!(bare.hierarchical.matches("splines=").count(), 1);
        assert!(bare.hierarchical.contains("    splines=\"ortho\";\n"));
    }

    #[test]
    fn test_views_keep_order_and_errors() {
        let pipeline = Pipeline::from_document(&corpus()).unwrap();
        let mut views = BTreeMap::new();
        views.insert("b-missing".to_string(), FilterConfig::new().with_sources(["gal"]));
        views.insert(
            "a-props".to_string(),
            FilterConfig {
                filter_propositions: true,
                ..Default::default()
            },
        );

        let results = pipeline.run_views(&views);
        assert_eq!(results[0].0, "a-props");
        assert_eq!(results[0].1.as_ref().unwrap().graph.nodes.len(), 1);
        assert_eq!(
            results[1].1.as_ref().unwrap_err(),
            &ConfigurationError::UnknownSource("gal".to_string())
        );
    }

    #[test]
    fn test_write_artifacts_names_files() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::from_document(&corpus()).unwrap();
        let artifacts = pipeline.run(&FilterConfig::default()).unwrap();

        let paths = write_artifacts(dir.path().join("out"), "symposiacs", &artifacts).unwrap();
        assert!(paths.hierarchical.ends_with("symposiacs.dot"));
        assert!(paths.force_directed.ends_with("symposiacs_gephi.dot"));
        assert_eq!(
            std::fs::read_to_string(&paths.hierarchical).unwrap(),
            artifacts.hierarchical
        );
    }
}
