//! Parsed document tree handed over by the XML loader

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One element of the parsed corpus
///
/// Mirrors an XML element: tag name, attributes, direct text, children.
/// Attribute order is irrelevant to extraction, so a sorted map keeps
/// re-serialization stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    /// Create an element with no attributes or children
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set an attribute
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Set the direct text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child element
    pub fn with_child(mut self, child: DocumentNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append several child elements
    pub fn with_children(mut self, children: impl IntoIterator<Item = DocumentNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Look up an attribute value
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Attribute interpreted as a flag (`true`, `yes`, `1`)
    pub fn flag(&self, key: &str) -> bool {
        matches!(
            self.attr(key).map(|v| v.trim().to_ascii_lowercase()).as_deref(),
            Some("true" | "yes" | "1")
        )
    }

    /// Direct children with the given tag
    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a DocumentNode> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// First direct child with the given tag
    pub fn first_child(&self, tag: &str) -> Option<&DocumentNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Concatenated text of this element and all descendants, in document order
    pub fn all_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_text_walks_descendants_in_order() {
        let node = DocumentNode::new("paraphrasis")
            .with_text("Bread")
            .with_child(DocumentNode::new("hi").with_text("is"))
            .with_child(DocumentNode::new("hi").with_child(DocumentNode::new("em").with_text("leavened")));

        assert_eq!(node.all_text(), "Bread is leavened");
    }

    #[test]
    fn flag_accepts_common_truthy_spellings() {
        let node = DocumentNode::new("misc")
            .with_attr("implicit", "True")
            .with_attr("extrinsic", "no");

        assert!(node.flag("implicit"));
        assert!(!node.flag("extrinsic"));
        assert!(!node.flag("missing"));
    }

    #[test]
    fn deserializes_with_optional_fields_omitted() {
        let json = r#"{"tag": "corpus", "children": [{"tag": "source", "attributes": {"id": "plut"}}]}"#;
        let node: DocumentNode = serde_json::from_str(json).unwrap();

        assert_eq!(node.tag, "corpus");
        assert_eq!(node.children[0].attr("id"), Some("plut"));
        assert!(node.children[0].children.is_empty());
    }
}
