//! Display fields read from an entity element

use super::tags;
use crate::document::text::{normalize_whitespace, EMPTY_LABEL};
use crate::document::DocumentNode;

/// Paraphrasis child text, else the `label` attribute, else the placeholder
pub fn paraphrasis(node: &DocumentNode) -> String {
    node.first_child(tags::PARAPHRASIS)
        .map(|p| normalize_whitespace(&p.all_text()))
        .filter(|s| !s.is_empty())
        .or_else(|| {
            node.attr("label")
                .map(normalize_whitespace)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| EMPTY_LABEL.to_string())
}

/// Excerpt text, if any
pub fn excerpt(node: &DocumentNode) -> Option<String> {
    node.first_child(tags::TEXT)
        .map(|t| normalize_whitespace(&t.all_text()))
        .filter(|s| !s.is_empty())
}

/// Citation locus from the attribute or a `locus` child
pub fn locus(node: &DocumentNode) -> Option<String> {
    node.attr("locus")
        .map(normalize_whitespace)
        .or_else(|| node.first_child(tags::LOCUS).map(|l| normalize_whitespace(&l.all_text())))
        .filter(|s| !s.is_empty())
}

/// Names of the speakers with the lowest rank
///
/// Speakers are direct children or grouped under a direct `speakers`
/// child. A missing or unparsable rank sorts last.
pub fn speakers(node: &DocumentNode) -> Vec<String> {
    let grouped = node
        .children_tagged(tags::SPEAKERS)
        .flat_map(|group| group.children_tagged(tags::SPEAKER));
    let ranked: Vec<(u32, String)> = node
        .children_tagged(tags::SPEAKER)
        .chain(grouped)
        .filter_map(|speaker| {
            let name = speaker
                .attr("name")
                .map(normalize_whitespace)
                .unwrap_or_else(|| normalize_whitespace(&speaker.all_text()));
            if name.is_empty() {
                return None;
            }
            let rank = speaker
                .attr("rank")
                .and_then(|r| r.trim().parse().ok())
                .unwrap_or(u32::MAX);
            Some((rank, name))
        })
        .collect();

    let Some(best) = ranked.iter().map(|(rank, _)| *rank).min() else {
        return Vec::new();
    };
    let mut names: Vec<String> = Vec::new();
    for (rank, name) in ranked {
        if rank == best && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
