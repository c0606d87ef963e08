//! Ancestor chains and common parents
//!
//! Chains step from a shadow root to its host, so nodes on both sides of
//! a shadow boundary share ancestors.

use fos_dom::{DomTree, NodeId};

use crate::predicates::parent_node;

/// `node` followed by its ancestors up to the document
pub fn get_parents(dom: &DomTree, node: NodeId) -> Vec<NodeId> {
    let mut parents = vec![node];
    let mut current = node;
    while let Some(parent) = parent_node(dom, current) {
        parents.push(parent);
        current = parent;
    }
    parents
}

/// Nearest shared inclusive ancestor
pub fn get_common_parent(dom: &DomTree, a: NodeId, b: NodeId) -> Option<NodeId> {
    let parents_b = get_parents(dom, b);
    get_parents(dom, a).into_iter().find(|parent| parents_b.contains(parent))
}

/// Smallest ancestor covering every scope node and the active element's
/// relation to every affected entry
pub fn get_top_common_parent(
    dom: &DomTree,
    active: NodeId,
    left_entries: &[NodeId],
    right_entries: &[NodeId],
) -> Option<NodeId> {
    let mut top_common: Option<NodeId> = None;
    for &entry in left_entries.iter().filter(|&&n| dom.is_alive(n)) {
        top_common = get_common_parent(dom, top_common.unwrap_or(entry), entry).or(top_common);
        for &sub_entry in right_entries.iter().filter(|&&n| dom.is_alive(n)) {
            let Some(common) = get_common_parent(dom, active, sub_entry) else {
                continue;
            };
            top_common = match top_common {
                Some(top) if !dom.composed_contains(common, top) => get_common_parent(dom, common, top),
                _ => Some(common),
            };
        }
    }
    top_common
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::ShadowRootInit;

    #[test]
    fn test_get_parents_crosses_shadow() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let host = dom.append_element(body, "x-modal", &[]).unwrap();
        let root = dom.attach_shadow(host, ShadowRootInit::open()).unwrap();
        let button = dom.append_element(root, "button", &[]).unwrap();

        let parents = get_parents(&dom, button);
        assert_eq!(parents[0], button);
        assert_eq!(parents[1], host);
        assert_eq!(*parents.last().unwrap(), dom.document());
    }

    #[test]
    fn test_common_parent() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let page = dom.append_element(body, "main", &[]).unwrap();
        let a = dom.append_element(page, "button", &[]).unwrap();
        let dialog = dom.append_element(body, "div", &[]).unwrap();
        let b = dom.append_element(dialog, "button", &[]).unwrap();

        assert_eq!(get_common_parent(&dom, a, b), Some(body));
        assert_eq!(get_common_parent(&dom, dialog, b), Some(dialog));
        let detached = dom.create_element("div");
        assert_eq!(get_common_parent(&dom, detached, b), None);
    }

    #[test]
    fn test_top_common_parent() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let main = dom.append_element(body, "main", &[]).unwrap();
        let outside = dom.append_element(main, "button", &[]).unwrap();
        let overlay = dom.append_element(body, "div", &[]).unwrap();
        let dialog = dom.append_element(overlay, "div", &[]).unwrap();

        assert_eq!(get_top_common_parent(&dom, outside, &[dialog], &[dialog]), Some(body));
        let inside = dom.append_element(dialog, "button", &[]).unwrap();
        assert_eq!(get_top_common_parent(&dom, inside, &[dialog], &[dialog]), Some(dialog));
    }
}
