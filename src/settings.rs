//! Settings file: filters, named views, layout and output options
//!
//! ```yaml
//! filters:
//!   sources_to_select: [plut]
//!   filter_extrinsic_elements: true
//! views:
//!   galen-only: { sources_to_select: [gal] }
//! matching_rule: proposition-steps
//! layout:
//!   default_engine: dot
//!   dot: { splines: ortho }
//! output:
//!   directory: output
//!   basename: graph
//! ```

use crate::dialect::{Attr, AttrValue};
use crate::filter::{FilterConfig, MatchingRule};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error reading settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for settings loading
pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub filters: FilterConfig,
    /// Named filter configurations rendered side by side
    pub views: BTreeMap<String, FilterConfig>,
    pub matching_rule: MatchingRule,
    pub layout: LayoutSettings,
    pub output: OutputSettings,
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(yaml: &str) -> SettingsResult<Self> {
        // An empty file is a valid, all-default settings file
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Layout engines the rendering collaborator can run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngine {
    #[default]
    Dot,
    Fdp,
    Neato,
}

/// Which of the two artifacts a layout engine renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Hierarchical,
    ForceDirected,
}

impl LayoutEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutEngine::Dot => "dot",
            LayoutEngine::Fdp => "fdp",
            LayoutEngine::Neato => "neato",
        }
    }

    pub fn artifact(&self) -> ArtifactKind {
        match self {
            LayoutEngine::Dot => ArtifactKind::Hierarchical,
            LayoutEngine::Fdp | LayoutEngine::Neato => ArtifactKind::ForceDirected,
        }
    }
}

/// Scalar graph attribute value from the settings file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LayoutValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl From<&LayoutValue> for AttrValue {
    fn from(value: &LayoutValue) -> Self {
        match value {
            LayoutValue::Bool(b) => AttrValue::Bool(*b),
            LayoutValue::Integer(n) => AttrValue::Integer(*n),
            LayoutValue::Number(n) => AttrValue::Number(*n),
            LayoutValue::Text(s) => AttrValue::Text(s.clone()),
        }
    }
}

/// Per-engine graph attributes; user entries overlay the built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub default_engine: LayoutEngine,
    pub dot: BTreeMap<String, LayoutValue>,
    pub fdp: BTreeMap<String, LayoutValue>,
    pub neato: BTreeMap<String, LayoutValue>,
}

impl LayoutSettings {
    /// Effective attributes for an engine, sorted by key
    pub fn attributes(&self, engine: LayoutEngine) -> Vec<Attr> {
        let overrides = match engine {
            LayoutEngine::Dot => &self.dot,
            LayoutEngine::Fdp => &self.fdp,
            LayoutEngine::Neato => &self.neato,
        };
        let mut merged = default_attributes(engine);
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
        merged
            .iter()
            .map(|(key, value)| Attr::new(key.as_str(), AttrValue::from(value)))
            .collect()
    }

    /// Engine used for the force-directed artifact: the default engine when
    /// it is force-directed, `fdp` otherwise
    pub fn force_directed_engine(&self) -> LayoutEngine {
        match self.default_engine {
            LayoutEngine::Dot => LayoutEngine::Fdp,
            engine => engine,
        }
    }
}

fn default_attributes(engine: LayoutEngine) -> BTreeMap<String, LayoutValue> {
    use LayoutValue::{Bool, Integer, Number, Text};

    let entries: Vec<(&str, LayoutValue)> = match engine {
        LayoutEngine::Dot => vec![
            ("overlap", Text("scalexy".into())),
            ("splines", Text("ortho".into())),
            ("nodesep", Number(0.25)),
            ("ranksep", Number(0.30)),
            ("outputorder", Text("edgesfirst".into())),
            ("concentrate", Bool(false)),
            ("newrank", Bool(true)),
        ],
        LayoutEngine::Fdp => vec![
            ("overlap", Text("prism".into())),
            ("splines", Text("spline".into())),
            ("nodesep", Number(0.10)),
            ("outputorder", Text("edgesfirst".into())),
            ("concentrate", Bool(true)),
            ("K", Number(0.5)),
            ("sep", Number(0.2)),
            ("maxiter", Integer(2000)),
            ("start", Text("regular".into())),
        ],
        LayoutEngine::Neato => vec![
            ("overlap", Text("prism".into())),
            ("splines", Text("spline".into())),
            ("nodesep", Number(0.1)),
            ("outputorder", Text("nodesfirst".into())),
            ("concentrate", Bool(true)),
            ("K", Number(0.3)),
            ("sep", Number(0.05)),
            ("maxiter", Integer(30000)),
            ("mode", Text("sgd".into())),
            ("model", Text("subset".into())),
        ],
    };
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub directory: PathBuf,
    pub basename: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            basename: "graph".to_string(),
        }
    }
}
