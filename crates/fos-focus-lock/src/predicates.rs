//! DOM predicates
//!
//! Stateless verdicts about single nodes. The `_cached` variants memoize
//! per node for the duration of one solve; callers create a fresh cache
//! for every focus event.

use std::collections::HashMap;

use fos_dom::{DomTree, NodeId};

use crate::constants::{FOCUS_GUARD, FOCUS_NO_AUTOFOCUS};

/// Memo of per-node verdicts, valid for one solve
pub type VisibilityCache = HashMap<NodeId, bool>;

/// `parentNode`, stepping from a shadow root to its host
pub fn parent_node(dom: &DomTree, node: NodeId) -> Option<NodeId> {
    let parent = dom.parent(node)?;
    Some(dom.host(parent).unwrap_or(parent))
}

fn is_top_node(dom: &DomTree, node: NodeId) -> bool {
    dom.get(node).is_none_or(|n| n.is_document())
}

/// Element itself is hidden: `display:none`, `visibility:hidden` or `inert`
pub fn is_element_hidden(dom: &DomTree, node: NodeId) -> bool {
    match dom.element(node) {
        Some(element) => {
            element.has_attr("inert")
                || dom.computed_style(node).is_some_and(|style| style.hides_element())
        }
        None => false,
    }
}

/// Node and all ancestors (through shadow hosts) are visible
pub fn is_visible_cached(dom: &DomTree, cache: &mut VisibilityCache, node: NodeId) -> bool {
    if let Some(&cached) = cache.get(&node) {
        return cached;
    }
    let visible = if is_top_node(dom, node) {
        true
    } else if is_element_hidden(dom, node) {
        false
    } else {
        match parent_node(dom, node) {
            Some(parent) => is_visible_cached(dom, cache, parent),
            None => true,
        }
    };
    cache.insert(node, visible);
    visible
}

/// Node itself does not opt out of autofocus
pub fn is_auto_focus_allowed(dom: &DomTree, node: NodeId) -> bool {
    !matches!(dom.get_attribute(node, FOCUS_NO_AUTOFOCUS), Some("" | "true"))
}

/// Neither the node nor an ancestor opts out of autofocus
pub fn is_auto_focus_allowed_cached(dom: &DomTree, cache: &mut VisibilityCache, node: NodeId) -> bool {
    if let Some(&cached) = cache.get(&node) {
        return cached;
    }
    let allowed = if is_top_node(dom, node) {
        true
    } else {
        is_auto_focus_allowed(dom, node)
            && match parent_node(dom, node) {
                Some(parent) => is_auto_focus_allowed_cached(dom, cache, parent),
                None => true,
            }
    };
    cache.insert(node, allowed);
    allowed
}

/// Rejects `<input>`/`<button>` that are `type=hidden` or disabled
pub fn not_hidden_input(dom: &DomTree, node: NodeId) -> bool {
    match dom.element(node) {
        Some(element) if matches!(element.tag.as_str(), "input" | "button") => {
            !(element.input_type() == "hidden" || element.has_attr("disabled"))
        }
        _ => true,
    }
}

/// Boundary sentinel node
pub fn is_guard(dom: &DomTree, node: NodeId) -> bool {
    dom.has_attribute(node, FOCUS_GUARD)
}

pub fn is_not_a_guard(dom: &DomTree, node: NodeId) -> bool {
    !is_guard(dom, node)
}

/// `<input type=radio>`
pub fn is_radio(dom: &DomTree, node: NodeId) -> bool {
    dom.element(node)
        .is_some_and(|e| e.tag == "input" && e.input_type() == "radio")
}

/// `<iframe>` element
pub fn is_frame(dom: &DomTree, node: NodeId) -> bool {
    dom.tag_name(node) == Some("iframe")
}
