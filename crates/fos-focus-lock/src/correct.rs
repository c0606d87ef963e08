//! Radio group correction
//!
//! A named radio group is one tab stop: whichever member is checked.

use fos_dom::{DomTree, NodeId};

use crate::predicates::is_radio;

fn find_selected_radio(dom: &DomTree, node: NodeId, nodes: &[NodeId]) -> NodeId {
    let name = dom.get_attribute(node, "name");
    nodes
        .iter()
        .copied()
        .find(|&other| {
            is_radio(dom, other)
                && dom.get_attribute(other, "name") == name
                && dom.has_attribute(other, "checked")
        })
        .unwrap_or(node)
}

/// The node that stands for `node` in tab order
pub fn correct_node(dom: &DomTree, node: NodeId, nodes: &[NodeId]) -> NodeId {
    let named = dom.get_attribute(node, "name").is_some_and(|n| !n.is_empty());
    if is_radio(dom, node) && named {
        find_selected_radio(dom, node, nodes)
    } else {
        node
    }
}

/// Collapse radio groups to their representative, keeping order
pub fn correct_nodes(dom: &DomTree, nodes: &[NodeId]) -> Vec<NodeId> {
    let representatives: Vec<NodeId> = nodes.iter().map(|&node| correct_node(dom, node, nodes)).collect();
    nodes
        .iter()
        .copied()
        .filter(|node| representatives.contains(node))
        .collect()
}

/// First node, corrected for radio groups
pub fn pick_first_focus(dom: &DomTree, nodes: &[NodeId]) -> Option<NodeId> {
    match nodes {
        [] => None,
        [only] => Some(*only),
        [first, ..] => Some(correct_node(dom, *first, nodes)),
    }
}

/// Position of the corrected `node` in `nodes`
pub fn pick_focusable(dom: &DomTree, nodes: &[NodeId], node: NodeId) -> Option<usize> {
    let target = correct_node(dom, node, nodes);
    nodes.iter().position(|&n| n == target)
}
