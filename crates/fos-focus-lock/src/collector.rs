//! Tabbable-node collector
//!
//! Walks root nodes through open shadow roots, slots and same-origin
//! frames, and produces the focusable/tabbable nodes in tab order.
//! Output is a snapshot; it is recomputed for every focus event.

use std::cmp::Ordering;

use fos_dom::{DomTree, NodeId};

use crate::predicates::{VisibilityCache, is_frame, is_guard, is_visible_cached, not_hidden_input};
use crate::tabbables::{get_tab_index, matches_tabbable};

/// One collected node with its ordering data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusableEntry {
    pub node: NodeId,
    /// Position in the unsorted (DOM order) collection
    pub dom_index: usize,
    pub tab_index: i32,
    pub is_guard: bool,
    /// Belongs to the active trap (filled by [`crate::expand_focusable_nodes`])
    pub is_lock_item: bool,
}

/// Unfiltered candidates under `roots`, in DOM order
pub fn get_focusables(dom: &DomTree, roots: &[NodeId], with_guards: bool) -> Vec<NodeId> {
    let mut out = Vec::new();
    for &root in roots {
        if matches_tabbable(dom, root, false) {
            out.push(root);
        }
        let mut found = Vec::new();
        query_tabbables(dom, root, with_guards, &mut found);
        for node in found {
            match dom.content_document(node).filter(|_| is_frame(dom, node)).and_then(|doc| dom.body(doc)) {
                Some(body) => out.extend(get_focusables(dom, &[body], with_guards)),
                None => out.push(node),
            }
        }
    }
    out
}

fn query_tabbables(dom: &DomTree, root: NodeId, with_guards: bool, out: &mut Vec<NodeId>) {
    let container = dom.shadow_root(root).unwrap_or(root);
    for child in dom.element_children(container) {
        visit(dom, child, with_guards, out);
    }
}

fn visit(dom: &DomTree, node: NodeId, with_guards: bool, out: &mut Vec<NodeId>) {
    if dom.tag_name(node) == Some("slot") {
        let assigned: Vec<NodeId> = dom
            .assigned_nodes(node)
            .into_iter()
            .filter(|&n| dom.is_element(n))
            .collect();
        if !assigned.is_empty() {
            for light in assigned {
                visit(dom, light, with_guards, out);
            }
            return;
        }
    }
    if matches_tabbable(dom, node, with_guards) {
        out.push(node);
    }
    query_tabbables(dom, node, with_guards, out);
}

/// Keep visible nodes that are not hidden or disabled inputs
pub fn filter_focusable(dom: &DomTree, nodes: &[NodeId], cache: &mut VisibilityCache) -> Vec<NodeId> {
    nodes
        .iter()
        .copied()
        .filter(|&node| is_visible_cached(dom, cache, node) && not_hidden_input(dom, node))
        .collect()
}

/// Positive indices first (ascending), then zero; DOM order breaks ties
pub fn tab_sort(a: &FocusableEntry, b: &FocusableEntry) -> Ordering {
    let a_tab = a.tab_index.max(0);
    let b_tab = b.tab_index.max(0);
    if a_tab != b_tab {
        if a_tab == 0 {
            return Ordering::Greater;
        }
        if b_tab == 0 {
            return Ordering::Less;
        }
        return a_tab.cmp(&b_tab);
    }
    a.dom_index.cmp(&b.dom_index)
}

/// Annotate and sort nodes by tab order
pub fn order_by_tab_index(
    dom: &DomTree,
    nodes: &[NodeId],
    filter_negative: bool,
    keep_guards: bool,
) -> Vec<FocusableEntry> {
    let mut entries: Vec<FocusableEntry> = nodes
        .iter()
        .enumerate()
        .map(|(dom_index, &node)| {
            let guard = is_guard(dom, node);
            let tab_index = if keep_guards && dom.tab_index(node) == -1 {
                if guard { 0 } else { -1 }
            } else {
                get_tab_index(dom, node)
            };
            FocusableEntry {
                node,
                dom_index,
                tab_index,
                is_guard: guard,
                is_lock_item: false,
            }
        })
        .filter(|entry| !filter_negative || entry.tab_index >= 0)
        .collect();
    entries.sort_by(tab_sort);
    entries
}

/// Sequentially focusable nodes under `roots`
pub fn get_tabbable_nodes(
    dom: &DomTree,
    roots: &[NodeId],
    cache: &mut VisibilityCache,
    with_guards: bool,
) -> Vec<FocusableEntry> {
    let candidates = get_focusables(dom, roots, with_guards);
    order_by_tab_index(dom, &filter_focusable(dom, &candidates, cache), true, with_guards)
}

/// All focusable nodes under `roots`, negative tab indices included
pub fn get_focusable_nodes(dom: &DomTree, roots: &[NodeId], cache: &mut VisibilityCache) -> Vec<FocusableEntry> {
    let candidates = get_focusables(dom, roots, false);
    order_by_tab_index(dom, &filter_focusable(dom, &candidates, cache), false, false)
}

/// Nodes of a collection, in collection order
pub fn nodes_of(entries: &[FocusableEntry]) -> Vec<NodeId> {
    entries.iter().map(|entry| entry.node).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FOCUS_GUARD;
    use fos_dom::{FrameOrigin, ShadowRootInit};

    fn tabbable(dom: &DomTree, roots: &[NodeId]) -> Vec<NodeId> {
        nodes_of(&get_tabbable_nodes(dom, roots, &mut VisibilityCache::new(), false))
    }

    #[test]
    fn test_dom_order_and_filters() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let scope = dom.append_element(body, "div", &[]).unwrap();
        let a = dom.append_element(scope, "button", &[]).unwrap();
        dom.append_element(scope, "button", &[("disabled", "")]).unwrap();
        dom.append_element(scope, "input", &[("type", "hidden")]).unwrap();
        let hidden = dom.append_element(scope, "div", &[("hidden", "")]).unwrap();
        dom.append_element(hidden, "input", &[]).unwrap();
        let wrapper = dom.append_element(scope, "p", &[]).unwrap();
        let link = dom.append_element(wrapper, "a", &[("href", "#")]).unwrap();
        let skip = dom.append_element(scope, "div", &[("tabindex", "-1")]).unwrap();

        assert_eq!(tabbable(&dom, &[scope]), vec![a, link]);
        let focusable = get_focusable_nodes(&dom, &[scope], &mut VisibilityCache::new());
        assert_eq!(nodes_of(&focusable), vec![a, link, skip]);
    }

    #[test]
    fn test_positive_tab_index_first() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let zero = dom.append_element(body, "button", &[]).unwrap();
        let three = dom.append_element(body, "button", &[("tabindex", "3")]).unwrap();
        let one = dom.append_element(body, "button", &[("tabindex", "1")]).unwrap();
        let another_one = dom.append_element(body, "input", &[("tabindex", "1")]).unwrap();
        assert_eq!(tabbable(&dom, &[body]), vec![one, another_one, three, zero]);
    }

    #[test]
    fn test_root_is_candidate() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let scope = dom.append_element(body, "div", &[("tabindex", "0")]).unwrap();
        let inner = dom.append_element(scope, "button", &[]).unwrap();
        assert_eq!(tabbable(&dom, &[scope]), vec![scope, inner]);
    }

    #[test]
    fn test_shadow_dom_and_slots() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let host = dom.append_element(body, "x-dialog", &[]).unwrap();
        let slotted = dom.append_element(host, "button", &[("slot", "footer")]).unwrap();
        let root = dom.attach_shadow(host, ShadowRootInit::open()).unwrap();
        let inner = dom.append_element(root, "input", &[]).unwrap();
        dom.append_element(root, "slot", &[("name", "footer")]).unwrap();
        let fallback_slot = dom.append_element(root, "slot", &[("name", "empty")]).unwrap();
        let fallback = dom.append_element(fallback_slot, "a", &[("href", "#")]).unwrap();

        assert_eq!(tabbable(&dom, &[host]), vec![inner, slotted, fallback]);
    }

    #[test]
    fn test_closed_shadow_root_is_opaque() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let host = dom.append_element(body, "x-closed", &[]).unwrap();
        let root = dom.attach_shadow(host, ShadowRootInit::closed()).unwrap();
        dom.append_element(root, "button", &[]).unwrap();
        assert!(tabbable(&dom, &[host]).is_empty());
    }

    #[test]
    fn test_frames() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let same = dom.append_element(body, "iframe", &[]).unwrap();
        let cross = dom.append_element(body, "iframe", &[]).unwrap();
        let inner_doc = dom.create_document("about:srcdoc");
        let inner_body = dom.body(inner_doc).unwrap();
        let inner_input = dom.append_element(inner_body, "input", &[]).unwrap();
        dom.set_frame_content(same, inner_doc, FrameOrigin::SameOrigin).unwrap();
        let foreign = dom.create_document("https://ads.example/");
        dom.set_frame_content(cross, foreign, FrameOrigin::CrossOrigin).unwrap();

        assert_eq!(tabbable(&dom, &[body]), vec![inner_input, cross]);
    }

    #[test]
    fn test_guards_kept_with_zero_index() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let guard = dom.append_element(body, "div", &[(FOCUS_GUARD, "true"), ("tabindex", "-1")]).unwrap();
        let button = dom.append_element(body, "button", &[]).unwrap();

        let with_guards = get_tabbable_nodes(&dom, &[body], &mut VisibilityCache::new(), true);
        assert_eq!(nodes_of(&with_guards), vec![guard, button]);
        assert!(with_guards[0].is_guard);
        assert_eq!(with_guards[0].tab_index, 0);
        assert_eq!(tabbable(&dom, &[body]), vec![button]);
    }

    #[test]
    fn test_tab_sort_is_deterministic() {
        let entry = |dom_index, tab_index| FocusableEntry {
            node: NodeId::NONE,
            dom_index,
            tab_index,
            is_guard: false,
            is_lock_item: false,
        };
        assert_eq!(tab_sort(&entry(0, 0), &entry(1, 2)), Ordering::Greater);
        assert_eq!(tab_sort(&entry(0, 2), &entry(1, 0)), Ordering::Less);
        assert_eq!(tab_sort(&entry(0, -1), &entry(1, 0)), Ordering::Less);
        assert_eq!(tab_sort(&entry(3, 1), &entry(2, 1)), Ordering::Greater);
    }
}
