//! Focus solver
//!
//! Given the trap scope, the active element and the last node that was
//! focused inside the trap, decides whether focus may stay, which inner
//! node should receive it, or whether a fresh autofocus pick is needed.

use fos_dom::{DomTree, NodeId};

use crate::FocusLockError;
use crate::active::scope_active_element;
use crate::affected::get_all_affected_nodes;
use crate::auto_focus::{all_parent_autofocusables, pick_autofocus};
use crate::collector::{FocusableEntry, get_focusable_nodes, get_tabbable_nodes, nodes_of};
use crate::correct::{correct_nodes, pick_focusable};
use crate::parenting::get_top_common_parent;
use crate::predicates::{VisibilityCache, is_guard, is_not_a_guard, parent_node};

/// Outcome of [`new_focus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDecision {
    /// Focus is acceptable where it is
    Stay,
    /// Move focus to this index of the inner node list
    MoveTo(usize),
    /// No usable history; pick a fresh target
    NewFocus,
}

fn index_in(list: &[NodeId], node: Option<NodeId>) -> isize {
    node.and_then(|n| list.iter().position(|&x| x == n))
        .map_or(-1, |i| i as isize)
}

/// Tab-order aware choice of the next inner node.
///
/// `inner_nodes` are the trap's focusables in outer order, `outer_nodes`
/// every focusable under the common parent of the trap and the active
/// element. Comparing where focus went (`active`) with where it was
/// (`last_node`) tells a Tab past the end (wrap to first) from a
/// Shift+Tab before the start (wrap to last) and from a click or
/// programmatic jump far away (return to the last inner node).
pub fn new_focus(
    dom: &DomTree,
    inner_nodes: &[NodeId],
    inner_tabbables: &[NodeId],
    outer_nodes: &[NodeId],
    active: Option<NodeId>,
    last_node: Option<NodeId>,
) -> FocusDecision {
    use FocusDecision::*;

    if active.is_some_and(|a| inner_nodes.contains(&a)) {
        return Stay;
    }
    let count = inner_nodes.len() as isize;
    let is_on_guard = active.is_some_and(|a| is_guard(dom, a));

    let active_index = index_in(outer_nodes, active);
    let last_index = if last_node.is_some() { index_in(outer_nodes, last_node) } else { active_index };
    let last_node_inside = index_in(inner_nodes, last_node);

    if active_index == -1 {
        return if last_node_inside != -1 { MoveTo(last_node_inside as usize) } else { NewFocus };
    }
    if last_node_inside == -1 {
        return NewFocus;
    }
    let stay_at_last = MoveTo(last_node_inside as usize);

    let index_diff = active_index - last_index;
    let first_node_index = index_in(outer_nodes, inner_nodes.first().copied());
    let last_node_index = index_in(outer_nodes, inner_nodes.last().copied());

    let corrected = correct_nodes(dom, outer_nodes);
    let current_focusable_index = index_in(&corrected, active);
    let previous_focusable_index = if last_node.is_some() {
        index_in(&corrected, last_node)
    } else {
        current_focusable_index
    };
    let tabbable: Vec<NodeId> = corrected.iter().copied().filter(|&n| dom.tab_index(n) >= 0).collect();
    let current_tabbable_index = index_in(&tabbable, active);
    let previous_tabbable_index = if last_node.is_some() {
        index_in(&tabbable, last_node)
    } else {
        current_tabbable_index
    };
    let focus_index_diff = if current_tabbable_index >= 0 && previous_tabbable_index >= 0 {
        previous_tabbable_index - current_tabbable_index
    } else {
        previous_focusable_index - current_focusable_index
    };

    if index_diff == 0 {
        return stay_at_last;
    }
    let (Some(&first_tabbable), Some(&last_tabbable)) = (inner_tabbables.first(), inner_tabbables.last()) else {
        return stay_at_last;
    };
    let to = |index: Option<usize>| index.map_or(Stay, MoveTo);
    let return_first = to(pick_focusable(dom, inner_nodes, first_tabbable));
    let return_last = to(pick_focusable(dom, inner_nodes, last_tabbable));

    // tabbed from a guard across the whole trap
    if active_index <= first_node_index && is_on_guard && index_diff.abs() > 1 {
        return return_last;
    }
    if active_index >= last_node_index && is_on_guard && index_diff.abs() > 1 {
        return return_first;
    }
    // jumped away, not a sequential step
    if focus_index_diff.abs() > 1 {
        return stay_at_last;
    }
    if active_index <= first_node_index {
        return return_last;
    }
    if active_index > last_node_index {
        return return_first;
    }
    // inside the trap's span of the tab order, but not on a trap node
    if index_diff.abs() > 1 {
        return stay_at_last;
    }
    MoveTo((count + last_node_inside + index_diff).rem_euclid(count) as usize)
}

/// Decide where focus should go for a trap over `scope`.
///
/// `Ok(None)` means focus may stay. `Err(NoFocusTarget)` means nothing in
/// the trap can take focus and the caller should report it.
pub fn focus_solver(
    dom: &DomTree,
    scope: &[NodeId],
    last_node: Option<NodeId>,
) -> Result<Option<FocusableEntry>, FocusLockError> {
    let active = scope_active_element(dom, scope);
    let entries: Vec<NodeId> = get_all_affected_nodes(dom, scope)
        .into_iter()
        .filter(|&node| is_not_a_guard(dom, node))
        .collect();
    let Some(&first_entry) = entries.first() else {
        return Err(FocusLockError::NoFocusTarget);
    };

    let mut cache = VisibilityCache::new();
    let any_focusable = get_focusable_nodes(dom, &entries, &mut cache);
    let inner_elements: Vec<FocusableEntry> = any_focusable
        .iter()
        .copied()
        .filter(|entry| !entry.is_guard)
        .collect();
    if inner_elements.is_empty() {
        return Err(FocusLockError::NoFocusTarget);
    }

    let common_parent = get_top_common_parent(dom, active.unwrap_or(first_entry), scope, &entries);
    let outer_nodes = match common_parent {
        Some(parent) => nodes_of(&get_focusable_nodes(dom, &[parent], &mut cache)),
        None => nodes_of(&any_focusable),
    };
    let ordered_inner = reorder_nodes(&outer_nodes, &inner_elements);
    let inner_nodes = nodes_of(&ordered_inner);
    let inner_tabbables: Vec<NodeId> = ordered_inner
        .iter()
        .filter(|entry| entry.tab_index >= 0)
        .map(|entry| entry.node)
        .collect();

    match new_focus(dom, &inner_nodes, &inner_tabbables, &outer_nodes, active, last_node) {
        FocusDecision::Stay => Ok(None),
        FocusDecision::MoveTo(index) => Ok(ordered_inner.get(index).copied()),
        FocusDecision::NewFocus => {
            let autofocusables = all_parent_autofocusables(dom, &entries, &mut cache);
            let picked = pick_autofocus(dom, &any_focusable, &inner_tabbables, &autofocusables)
                .or_else(|| pick_autofocus(dom, &any_focusable, &inner_nodes, &autofocusables));
            match picked {
                Some(node) => Ok(any_focusable.iter().copied().find(|entry| entry.node == node)),
                None => Err(FocusLockError::NoFocusTarget),
            }
        }
    }
}

/// `inner` entries in the order their nodes appear in `outer`
fn reorder_nodes(outer: &[NodeId], inner: &[FocusableEntry]) -> Vec<FocusableEntry> {
    outer
        .iter()
        .filter_map(|&node| inner.iter().find(|entry| entry.node == node).copied())
        .collect()
}

/// Tab order around the trap with lock membership and guard flags
pub fn expand_focusable_nodes(dom: &DomTree, scope: &[NodeId]) -> Vec<FocusableEntry> {
    let entries: Vec<NodeId> = get_all_affected_nodes(dom, scope)
        .into_iter()
        .filter(|&node| is_not_a_guard(dom, node))
        .collect();
    let Some(&first) = scope.first() else {
        return Vec::new();
    };
    let mut common_parent = get_top_common_parent(dom, first, scope, &entries).unwrap_or(first);
    // a lone container: its guards are siblings, look one level up
    if entries.contains(&common_parent) {
        common_parent = parent_node(dom, common_parent).unwrap_or(common_parent);
    }
    let mut cache = VisibilityCache::new();
    let outer = get_tabbable_nodes(dom, &[common_parent], &mut cache, true);
    let inner: Vec<NodeId> = get_tabbable_nodes(dom, &entries, &mut cache, false)
        .into_iter()
        .filter(|entry| !entry.is_guard)
        .map(|entry| entry.node)
        .collect();
    outer
        .into_iter()
        .map(|entry| FocusableEntry {
            is_lock_item: inner.contains(&entry.node),
            ..entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FOCUS_GUARD;

    struct Page {
        dom: DomTree,
        header: NodeId,
        dialog: NodeId,
        inner: Vec<NodeId>,
        footer: NodeId,
    }

    fn page() -> Page {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let header = dom.append_element(body, "a", &[("href", "/")]).unwrap();
        let dialog = dom.append_element(body, "div", &[]).unwrap();
        let inner = (0..3)
            .map(|_| dom.append_element(dialog, "button", &[]).unwrap())
            .collect();
        let footer = dom.append_element(body, "a", &[("href", "/about")]).unwrap();
        Page { dom, header, dialog, inner, footer }
    }

    #[test]
    fn test_new_focus_inside_stays() {
        let p = page();
        let outer = vec![p.header, p.inner[0], p.inner[1], p.inner[2], p.footer];
        let decision = new_focus(&p.dom, &p.inner, &p.inner, &outer, Some(p.inner[1]), Some(p.inner[0]));
        assert_eq!(decision, FocusDecision::Stay);
    }

    #[test]
    fn test_new_focus_without_history() {
        let p = page();
        let outer = vec![p.header, p.inner[0], p.inner[1], p.inner[2], p.footer];
        assert_eq!(
            new_focus(&p.dom, &p.inner, &p.inner, &outer, Some(p.header), None),
            FocusDecision::NewFocus
        );
        assert_eq!(
            new_focus(&p.dom, &p.inner, &p.inner, &outer, None, Some(p.inner[2])),
            FocusDecision::MoveTo(2)
        );
    }

    #[test]
    fn test_new_focus_wraps() {
        let p = page();
        let outer = vec![p.header, p.inner[0], p.inner[1], p.inner[2], p.footer];
        // Tab past the end
        assert_eq!(
            new_focus(&p.dom, &p.inner, &p.inner, &outer, Some(p.footer), Some(p.inner[2])),
            FocusDecision::MoveTo(0)
        );
        // Shift+Tab before the start
        assert_eq!(
            new_focus(&p.dom, &p.inner, &p.inner, &outer, Some(p.header), Some(p.inner[0])),
            FocusDecision::MoveTo(2)
        );
    }

    #[test]
    fn test_new_focus_jump_returns_to_last() {
        let p = page();
        let outer = vec![p.header, p.inner[0], p.inner[1], p.inner[2], p.footer];
        // from the first inner node straight to the footer
        assert_eq!(
            new_focus(&p.dom, &p.inner, &p.inner, &outer, Some(p.footer), Some(p.inner[0])),
            FocusDecision::MoveTo(0)
        );
    }

    #[test]
    fn test_focus_solver_picks_first_then_wraps() {
        let mut p = page();
        let first = focus_solver(&p.dom, &[p.dialog], None).unwrap().unwrap();
        assert_eq!(first.node, p.inner[0]);

        p.dom.focus(p.footer);
        let wrapped = focus_solver(&p.dom, &[p.dialog], Some(p.inner[2])).unwrap().unwrap();
        assert_eq!(wrapped.node, p.inner[0]);

        p.dom.focus(p.inner[1]);
        assert_eq!(focus_solver(&p.dom, &[p.dialog], Some(p.inner[1])).unwrap(), None);
    }

    #[test]
    fn test_focus_solver_empty_scope() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let empty = dom.append_element(body, "div", &[]).unwrap();
        dom.append_element(empty, "p", &[]).unwrap();
        assert_eq!(focus_solver(&dom, &[empty], None), Err(FocusLockError::NoFocusTarget));
        assert_eq!(focus_solver(&dom, &[], None), Err(FocusLockError::NoFocusTarget));
    }

    #[test]
    fn test_focus_solver_never_returns_guard() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let dialog = dom.append_element(body, "div", &[]).unwrap();
        dom.append_element(dialog, "div", &[(FOCUS_GUARD, "true"), ("tabindex", "0"), ("autofocus", "")])
            .unwrap();
        let button = dom.append_element(dialog, "button", &[]).unwrap();

        let target = focus_solver(&dom, &[dialog], None).unwrap().unwrap();
        assert_eq!(target.node, button);
    }

    #[test]
    fn test_expand_focusable_nodes() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let outside = dom.append_element(body, "button", &[]).unwrap();
        let before = dom.append_element(body, "div", &[(FOCUS_GUARD, "true")]).unwrap();
        let dialog = dom.append_element(body, "div", &[]).unwrap();
        let inside = dom.append_element(dialog, "input", &[]).unwrap();
        let after = dom.append_element(body, "div", &[(FOCUS_GUARD, "true")]).unwrap();

        let expanded = expand_focusable_nodes(&dom, &[dialog]);
        let summary: Vec<(NodeId, bool, bool)> =
            expanded.iter().map(|e| (e.node, e.is_lock_item, e.is_guard)).collect();
        assert_eq!(
            summary,
            vec![
                (outside, false, false),
                (before, false, true),
                (inside, true, false),
                (after, false, true),
            ]
        );
    }
}
