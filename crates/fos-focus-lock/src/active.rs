//! Active element queries
//!
//! The "deep" active element descends through open shadow roots and
//! same-origin frames to the node that really holds focus.

use fos_dom::{DomTree, NodeId};

use crate::affected::get_all_affected_nodes;
use crate::constants::FOCUS_ALLOW;
use crate::predicates::{is_frame, is_guard};

/// Top-level document hosting `node`, climbing out of frames
pub fn top_document(dom: &DomTree, node: NodeId) -> NodeId {
    let mut doc = dom.owner_document(node).unwrap_or_else(|| dom.document());
    while let Some(owner) = dom.frame_owner(doc) {
        match dom.owner_document(owner) {
            Some(outer) if outer != doc => doc = outer,
            _ => break,
        }
    }
    doc
}

/// Deep active element of `doc`
pub fn get_active_element(dom: &DomTree, doc: NodeId) -> Option<NodeId> {
    dom.active_element(doc).map(|active| descend(dom, active))
}

fn descend(dom: &DomTree, node: NodeId) -> NodeId {
    if let Some(root) = dom.shadow_root(node) {
        return match dom.shadow_active_element(root) {
            Some(inner) => descend(dom, inner),
            None => node,
        };
    }
    if is_frame(dom, node) {
        if let Some(inner) = dom.content_document(node).and_then(|doc| get_active_element(dom, doc)) {
            return inner;
        }
    }
    node
}

/// Deep active element of the document hosting the scope
pub fn scope_active_element(dom: &DomTree, scope: &[NodeId]) -> Option<NodeId> {
    let doc = scope
        .first()
        .map_or_else(|| dom.document(), |&first| top_document(dom, first));
    get_active_element(dom, doc)
}

/// Focus is inside any node affected by `scope` (never while on a guard)
pub fn focus_inside(dom: &DomTree, scope: &[NodeId], active: Option<NodeId>) -> bool {
    let Some(active) = active.or_else(|| scope_active_element(dom, scope)) else {
        return false;
    };
    if is_guard(dom, active) {
        return false;
    }
    get_all_affected_nodes(dom, scope)
        .iter()
        .any(|&node| dom.composed_contains(node, active))
}

/// Focus sits inside a region where it may roam free
pub fn focus_is_hidden(dom: &DomTree, doc: NodeId) -> bool {
    let Some(active) = get_active_element(dom, doc) else {
        return false;
    };
    let mut current = Some(active);
    while let Some(node) = current {
        if dom.has_attribute(node, FOCUS_ALLOW) {
            return true;
        }
        current = dom.composed_parent(node);
    }
    false
}
