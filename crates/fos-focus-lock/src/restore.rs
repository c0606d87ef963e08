//! Focus restore
//!
//! Records where an element sits in the tree (its ancestors and their
//! element neighbours, all as weak references) so focus can later go back
//! to the same spot, or the closest surviving equivalent, even after the
//! element itself was unmounted.

use fos_dom::{DomTree, NodeId, WeakNode};

use crate::collector::get_tabbable_nodes;
use crate::predicates::VisibilityCache;

/// One ancestor level of a recorded location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LocationLevel {
    current: WeakNode,
    parent: Option<WeakNode>,
    left: Option<WeakNode>,
    right: Option<WeakNode>,
}

/// Structural address of an element, innermost level first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusLocation {
    element: WeakNode,
    owner_document: Option<NodeId>,
    stack: Vec<LocationLevel>,
}

/// Record the location of `element` for a later [`FocusLocation::restore`]
pub fn capture_focus_restore(dom: &DomTree, element: NodeId) -> FocusLocation {
    let owner_document = dom.owner_document(element);
    let body = owner_document.and_then(|doc| dom.body(doc));
    let weak = |node: Option<NodeId>| node.map(|n| dom.downgrade(n));

    let mut stack = Vec::new();
    let mut current = Some(element);
    while let Some(node) = current.filter(|&n| Some(n) != body) {
        let parent = dom.parent_element(node);
        stack.push(LocationLevel {
            current: dom.downgrade(node),
            parent: weak(parent),
            left: weak(dom.previous_element_sibling(node)),
            right: weak(dom.next_element_sibling(node)),
        });
        current = parent;
    }
    FocusLocation {
        element: dom.downgrade(element),
        owner_document,
        stack,
    }
}

impl FocusLocation {
    /// The recorded element, if it still exists
    pub fn element(&self, dom: &DomTree) -> Option<NodeId> {
        dom.upgrade(self.element)
    }

    /// Levels recorded between the element and the body
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Tabbable node standing in for the recorded element.
    ///
    /// Walks outwards to the first ancestor still in the document, then
    /// prefers the element itself, its old neighbours and the siblings
    /// after them, and finally the ancestor's first tabbable.
    pub fn restore(&self, dom: &DomTree) -> Option<NodeId> {
        let doc = self.owner_document.filter(|&doc| dom.is_alive(doc))?;
        let mut cache = VisibilityCache::new();
        for level in &self.stack {
            let Some(parent) = level
                .parent
                .and_then(|p| dom.upgrade(p))
                .filter(|&p| dom.contains(doc, p))
            else {
                continue;
            };
            let current = dom.upgrade(level.current).filter(|&c| dom.contains(parent, c));
            let left = level.left.and_then(|l| dom.upgrade(l));
            let right = level.right.and_then(|r| dom.upgrade(r));
            let tabbables = get_tabbable_nodes(dom, &[parent], &mut cache, false);

            let mut aim = current
                .or_else(|| left.and_then(|l| dom.next_element_sibling(l)))
                .or(right)
                .or(left);
            while let Some(candidate) = aim {
                if let Some(found) = tabbables.iter().find(|entry| dom.composed_contains(candidate, entry.node)) {
                    return Some(found.node);
                }
                aim = dom.next_element_sibling(candidate);
            }
            if let Some(first) = tabbables.first() {
                return Some(first.node);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct List {
        dom: DomTree,
        list: NodeId,
        items: Vec<NodeId>,
        buttons: Vec<NodeId>,
    }

    fn list() -> List {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let list = dom.append_element(body, "ul", &[]).unwrap();
        let mut items = Vec::new();
        let mut buttons = Vec::new();
        for _ in 0..3 {
            let item = dom.append_element(list, "li", &[]).unwrap();
            buttons.push(dom.append_element(item, "button", &[]).unwrap());
            items.push(item);
        }
        List { dom, list, items, buttons }
    }

    #[test]
    fn test_restore_to_same_element() {
        let l = list();
        let location = capture_focus_restore(&l.dom, l.buttons[1]);
        assert_eq!(location.depth(), 3);
        assert_eq!(location.restore(&l.dom), Some(l.buttons[1]));
    }

    #[test]
    fn test_restore_to_right_neighbour() {
        let mut l = list();
        let location = capture_focus_restore(&l.dom, l.buttons[1]);
        l.dom.destroy(l.items[1]).unwrap();
        assert_eq!(location.element(&l.dom), None);
        assert_eq!(location.restore(&l.dom), Some(l.buttons[2]));
    }

    #[test]
    fn test_restore_to_left_when_last_removed() {
        let mut l = list();
        let location = capture_focus_restore(&l.dom, l.buttons[2]);
        l.dom.destroy(l.items[2]).unwrap();
        assert_eq!(location.restore(&l.dom), Some(l.buttons[1]));
    }

    #[test]
    fn test_restore_falls_back_to_first_tabbable() {
        let mut l = list();
        let location = capture_focus_restore(&l.dom, l.buttons[2]);
        l.dom.destroy(l.items[1]).unwrap();
        l.dom.destroy(l.items[2]).unwrap();
        assert_eq!(location.restore(&l.dom), Some(l.buttons[0]));
    }

    #[test]
    fn test_restore_gives_up_when_everything_gone() {
        let mut l = list();
        let location = capture_focus_restore(&l.dom, l.buttons[0]);
        l.dom.destroy(l.list).unwrap();
        assert_eq!(location.restore(&l.dom), None);
    }
}
