//! Parsed corpus documents
//!
//! The XML loader hands the corpus over as a [`DocumentNode`] tree. This
//! module reads that tree from its JSON or YAML export and provides the
//! text helpers used when deriving display labels.

pub mod text;
mod tree;

pub use tree::DocumentNode;

use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a document tree
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported document format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
}

/// Result type for document loading
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Load a document tree, picking the format from the file extension
pub fn load_document(path: impl AsRef<Path>) -> DocumentResult<DocumentNode> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let content = std::fs::read_to_string(path)?;
    match extension.as_str() {
        "json" => Ok(serde_json::from_str(&content)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
        _ => Err(DocumentError::UnsupportedFormat(path.display().to_string())),
    }
}
