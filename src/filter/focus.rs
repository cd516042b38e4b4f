//! Focus anchoring: breadth-first reachability from anchor theses

use super::index::EdgeIndex;
use std::collections::VecDeque;

/// Entities reachable from `anchors` along usable relations, following
/// edge direction
///
/// A relation is usable when `relation_ok` allows it and its target is
/// still a candidate. Anchors that are not candidates contribute nothing.
pub(crate) fn reachable(
    index: &EdgeIndex,
    anchors: &[usize],
    candidate: &[bool],
    relation_ok: &[bool],
) -> Vec<bool> {
    let mut visited = vec![false; candidate.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();

    for &anchor in anchors {
        if candidate[anchor] && !visited[anchor] {
            visited[anchor] = true;
            queue.push_back(anchor);
        }
    }

    while let Some(current) = queue.pop_front() {
        for &relation in index.outgoing(current) {
            if !relation_ok[relation] {
                continue;
            }
            let Some((_, target)) = index.endpoints(relation) else {
                continue;
            };
            if candidate[target] && !visited[target] {
                visited[target] = true;
                queue.push_back(target);
            }
        }
    }
    visited
}
