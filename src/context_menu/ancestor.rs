use crate::host::{Document, NodeId};

/// Nearest strict ancestor of `node` carrying `class`.
///
/// The walk stops at the document body: the body itself never matches and
/// detached subtrees yield `None` once their root is reached.
pub fn find_ancestor(doc: &Document, node: NodeId, class: &str) -> Option<NodeId> {
    let parent = doc.parent_element(node)?;
    if parent == doc.body() {
        return None;
    }
    if doc.has_class(parent, class) {
        return Some(parent);
    }
    find_ancestor(doc, parent, class)
}
