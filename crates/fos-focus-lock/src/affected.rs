//! Affected-node resolver
//!
//! Expands the scope of a trap into the full set of top-level nodes that
//! belong to it: every container of the same focus group, with nested
//! containers collapsed into their outermost ancestor.

use fos_dom::{DocumentPosition, DomTree, NodeId};

use crate::constants::{DISABLED_VALUE, FOCUS_DISABLED, FOCUS_GROUP};

/// Drop nodes contained in another node of the set (and exact duplicates)
pub fn filter_nested(dom: &DomTree, nodes: &[NodeId]) -> Vec<NodeId> {
    let mut unique: Vec<NodeId> = Vec::with_capacity(nodes.len());
    for &node in nodes {
        if !unique.contains(&node) {
            unique.push(node);
        }
    }
    let mut contained = vec![false; unique.len()];
    for i in (0..unique.len()).rev() {
        for j in (0..i).rev() {
            let position = dom.compare_document_position(unique[i], unique[j]);
            if position.contains(DocumentPosition::CONTAINED_BY) {
                contained[j] = true;
            }
            if position.contains(DocumentPosition::CONTAINS) {
                contained[i] = true;
            }
        }
    }
    unique
        .into_iter()
        .zip(contained)
        .filter_map(|(node, nested)| (!nested).then_some(node))
        .collect()
}

/// Outermost light-tree ancestor
pub fn get_top_parent(dom: &DomTree, node: NodeId) -> NodeId {
    dom.root(node)
}

/// Enabled containers of `group` under `top`, in tree order
fn group_members(dom: &DomTree, top: NodeId, group: &str) -> Vec<NodeId> {
    dom.descendants(top)
        .filter(|&node| {
            dom.get_attribute(node, FOCUS_GROUP) == Some(group)
                && dom.get_attribute(node, FOCUS_DISABLED) != Some(DISABLED_VALUE)
        })
        .collect()
}

/// Scope nodes with focus groups expanded and nesting removed
pub fn get_all_affected_nodes(dom: &DomTree, scope: &[NodeId]) -> Vec<NodeId> {
    let mut affected = Vec::new();
    for &node in scope.iter().filter(|&&n| dom.is_alive(n)) {
        match dom.get_attribute(node, FOCUS_GROUP).filter(|g| !g.is_empty()) {
            Some(group) => {
                let members = group_members(dom, get_top_parent(dom, node), group);
                affected.extend(filter_nested(dom, &members));
            }
            None => affected.push(node),
        }
    }
    filter_nested(dom, &affected)
}
