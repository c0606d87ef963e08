//! Boundary guards
//!
//! A trap container is wrapped in two invisible tabbable sentinels so that
//! Tab off either end lands on a node the lock can see, instead of leaving
//! the document. Auto guards are only tabbable while focus sits on the
//! lock item next to them.

use fos_dom::{DomTree, NodeId};

use crate::FocusLockError;
use crate::collector::FocusableEntry;
use crate::constants::{FOCUS_AUTO_GUARD, FOCUS_GUARD};
use crate::solver::expand_focusable_nodes;

/// Guards inserted around one container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusGuards {
    pub before: NodeId,
    pub after: NodeId,
}

impl FocusGuards {
    pub fn remove(self, dom: &mut DomTree) -> Result<(), FocusLockError> {
        remove_focus_guards(dom, self)
    }
}

/// Insert tabbable guards right before and after `container`
pub fn install_focus_guards(dom: &mut DomTree, container: NodeId) -> Result<FocusGuards, FocusLockError> {
    install(dom, container, &[(FOCUS_GUARD, "true"), ("tabindex", "0")])
}

/// Insert auto guards, untabbable until focus reaches the container's edge
pub fn install_auto_guards(dom: &mut DomTree, container: NodeId) -> Result<FocusGuards, FocusLockError> {
    install(dom, container, &[(FOCUS_GUARD, "true"), (FOCUS_AUTO_GUARD, "true")])
}

fn install(dom: &mut DomTree, container: NodeId, attrs: &[(&str, &str)]) -> Result<FocusGuards, FocusLockError> {
    let parent = dom.parent(container).ok_or(FocusLockError::Detached(container))?;
    let doc = dom.owner_document(container).unwrap_or_else(|| dom.document());
    let make = |dom: &mut DomTree| -> Result<NodeId, FocusLockError> {
        let guard = dom.create_element_in(doc, "div");
        for (name, value) in attrs {
            dom.set_attribute(guard, name, value)?;
        }
        Ok(guard)
    };
    let before = make(dom)?;
    let after = make(dom)?;
    dom.insert_before(parent, before, Some(container))?;
    let next = dom.next_sibling(container);
    dom.insert_before(parent, after, next)?;
    tracing::trace!(container = %container, "focus guards installed");
    Ok(FocusGuards { before, after })
}

/// Detach and free both guards
pub fn remove_focus_guards(dom: &mut DomTree, guards: FocusGuards) -> Result<(), FocusLockError> {
    dom.destroy(guards.before)?;
    dom.destroy(guards.after)?;
    Ok(())
}

fn is_auto_guard(dom: &DomTree, node: NodeId) -> bool {
    dom.has_attribute(node, FOCUS_AUTO_GUARD)
}

/// Make the auto guards adjacent to `focused` tabbable; returns them.
///
/// All other auto guards in the working area's tab order lose `tabindex`.
pub fn update_auto_guards(dom: &mut DomTree, working_area: &[NodeId], focused: NodeId) -> Vec<NodeId> {
    let all = expand_focusable_nodes(dom, working_area);
    let Some(index) = all.iter().position(|entry| entry.node == focused) else {
        return Vec::new();
    };
    let auto_guards: Vec<NodeId> = all
        .iter()
        .filter(|entry| entry.is_guard && is_auto_guard(dom, entry.node))
        .map(|entry| entry.node)
        .collect();
    for guard in auto_guards {
        dom.remove_attribute(guard, "tabindex");
    }
    [find_auto_guard(dom, &all, index, 1), find_auto_guard(dom, &all, index, -1)]
        .into_iter()
        .flatten()
        .filter(|&guard| dom.set_attribute(guard, "tabindex", "0").is_ok())
        .collect()
}

/// Auto guard reached by stepping from `start` before any other node
fn find_auto_guard(
    dom: &DomTree,
    all: &[FocusableEntry],
    start: usize,
    step: isize,
) -> Option<NodeId> {
    let mut last_guard = None;
    let mut i = start as isize;
    while let Some(item) = usize::try_from(i).ok().and_then(|i| all.get(i)) {
        if item.is_guard {
            if is_auto_guard(dom, item.node) {
                last_guard = Some(item.node);
            }
        } else if item.is_lock_item {
            if i != start as isize {
                // Tab stays inside the lock
                return None;
            }
            last_guard = None;
        } else {
            break;
        }
        i += step;
    }
    last_guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_and_remove() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let dialog = dom.append_element(body, "div", &[]).unwrap();
        let tail = dom.append_element(body, "p", &[]).unwrap();

        let guards = install_focus_guards(&mut dom, dialog).unwrap();
        let order: Vec<NodeId> = dom.element_children(body).collect();
        assert_eq!(order, vec![guards.before, dialog, guards.after, tail]);
        assert_eq!(dom.tab_index(guards.before), 0);
        assert!(dom.has_attribute(guards.after, FOCUS_GUARD));

        guards.remove(&mut dom).unwrap();
        let order: Vec<NodeId> = dom.element_children(body).collect();
        assert_eq!(order, vec![dialog, tail]);
    }

    #[test]
    fn test_detached_container() {
        let mut dom = DomTree::new();
        let loose = dom.create_element("div");
        assert_eq!(install_focus_guards(&mut dom, loose), Err(FocusLockError::Detached(loose)));
    }

    #[test]
    fn test_auto_guards_follow_focus() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        dom.append_element(body, "button", &[]).unwrap();
        let dialog = dom.append_element(body, "div", &[]).unwrap();
        let first = dom.append_element(dialog, "input", &[]).unwrap();
        let middle = dom.append_element(dialog, "input", &[]).unwrap();
        let last = dom.append_element(dialog, "input", &[]).unwrap();
        dom.append_element(body, "button", &[]).unwrap();
        let guards = install_auto_guards(&mut dom, dialog).unwrap();
        assert_eq!(dom.tab_index(guards.before), -1);

        assert_eq!(update_auto_guards(&mut dom, &[dialog], first), vec![guards.before]);
        assert_eq!(dom.tab_index(guards.before), 0);

        assert!(update_auto_guards(&mut dom, &[dialog], middle).is_empty());
        assert!(!dom.has_attribute(guards.before, "tabindex"));

        assert_eq!(update_auto_guards(&mut dom, &[dialog], last), vec![guards.after]);
        assert!(!dom.has_attribute(guards.before, "tabindex"));
        assert_eq!(dom.tab_index(guards.after), 0);
    }
}
