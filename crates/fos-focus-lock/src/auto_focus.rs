//! Autofocus selection
//!
//! Picks the node that receives focus when a trap captures focus for the
//! first time (or lost track of where focus was).

use fos_dom::{DomTree, NodeId};

use crate::collector::{FocusableEntry, filter_focusable, get_focusables};
use crate::constants::{FOCUS_AUTO, FOCUS_AUTOFOCUS};
use crate::correct::pick_first_focus;
use crate::predicates::{VisibilityCache, is_auto_focus_allowed_cached, is_not_a_guard};

/// Focusable nodes inside `[data-autofocus-inside]` containers under `top_node`
pub fn parent_autofocusables(dom: &DomTree, top_node: NodeId, cache: &mut VisibilityCache) -> Vec<NodeId> {
    let containers: Vec<NodeId> = dom
        .descendants(top_node)
        .filter(|&node| dom.has_attribute(node, FOCUS_AUTO))
        .collect();
    let candidates: Vec<NodeId> = containers
        .into_iter()
        .flat_map(|container| get_focusables(dom, &[container], false))
        .collect();
    filter_focusable(dom, &candidates, cache)
}

/// [`parent_autofocusables`] for every entry
pub fn all_parent_autofocusables(dom: &DomTree, entries: &[NodeId], cache: &mut VisibilityCache) -> Vec<NodeId> {
    entries
        .iter()
        .flat_map(|&entry| parent_autofocusables(dom, entry, cache))
        .collect()
}

/// Node asks for autofocus itself or sits in an autofocus container
pub fn is_auto_focused(dom: &DomTree, node: NodeId, autofocusables: &[NodeId]) -> bool {
    dom.has_attribute(node, "autofocus")
        || dom.get_attribute(node, FOCUS_AUTOFOCUS).is_some_and(|v| !v.is_empty())
        || autofocusables.contains(&node)
}

/// Drop nodes under a `data-no-autofocus` region
pub fn filter_auto_focusable(dom: &DomTree, nodes: &[NodeId]) -> Vec<NodeId> {
    let mut cache = VisibilityCache::new();
    nodes
        .iter()
        .copied()
        .filter(|&node| is_auto_focus_allowed_cached(dom, &mut cache, node))
        .collect()
}

/// Autofocus candidate among `focusables`, else the first of `ordered_nodes`
pub fn pick_autofocus(
    dom: &DomTree,
    focusables: &[FocusableEntry],
    ordered_nodes: &[NodeId],
    autofocusables: &[NodeId],
) -> Option<NodeId> {
    let marked: Vec<NodeId> = focusables
        .iter()
        .map(|entry| entry.node)
        .filter(|&node| is_not_a_guard(dom, node) && is_auto_focused(dom, node, autofocusables))
        .collect();
    let marked = filter_auto_focusable(dom, &marked);
    if !marked.is_empty() {
        return pick_first_focus(dom, &marked);
    }
    pick_first_focus(dom, &filter_auto_focusable(dom, ordered_nodes))
}
