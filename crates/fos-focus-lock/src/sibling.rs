//! Sibling navigation
//!
//! Programmatic next/previous/first/last focus moves inside an arbitrary
//! scope, independent of any active trap. Misuse is reported with
//! `tracing::error!` and leaves focus where it is.

use fos_dom::{DomTree, NodeId};

use crate::FocusLockError;
use crate::collector::{FocusableEntry, get_focusable_nodes, get_tabbable_nodes};
use crate::mover::focus_on;
use crate::predicates::VisibilityCache;

/// Options for the navigation helpers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOptions {
    /// Roots to navigate in; empty means the document body
    pub scope: Vec<NodeId>,
    /// Wrap around at the ends
    pub cycle: bool,
    /// Skip nodes with a negative tab index
    pub only_tabbable: bool,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            scope: Vec::new(),
            cycle: false,
            only_tabbable: true,
        }
    }
}

impl NavigationOptions {
    pub fn within(scope: impl Into<Vec<NodeId>>) -> Self {
        Self {
            scope: scope.into(),
            ..Self::default()
        }
    }

    pub fn cycle(mut self, cycle: bool) -> Self {
        self.cycle = cycle;
        self
    }

    pub fn only_tabbable(mut self, only_tabbable: bool) -> Self {
        self.only_tabbable = only_tabbable;
        self
    }

    fn resolved_scope(&self, dom: &DomTree) -> Vec<NodeId> {
        if self.scope.is_empty() {
            dom.document_body().into_iter().collect()
        } else {
            self.scope.clone()
        }
    }
}

/// Neighbours of an element in its scope's focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeFocusable {
    pub prev: Option<FocusableEntry>,
    pub next: Option<FocusableEntry>,
    pub first: Option<FocusableEntry>,
    pub last: Option<FocusableEntry>,
}

fn collect(dom: &DomTree, scope: &[NodeId], only_tabbable: bool) -> Vec<FocusableEntry> {
    let mut cache = VisibilityCache::new();
    if only_tabbable {
        get_tabbable_nodes(dom, scope, &mut cache, false)
    } else {
        get_focusable_nodes(dom, scope, &mut cache)
    }
}

/// Locate `element` among the focusables of `scope`.
///
/// `Ok(None)` when the element is inside the scope but not focusable itself.
pub fn get_relative_focusable(
    dom: &DomTree,
    element: Option<NodeId>,
    scope: &[NodeId],
    only_tabbable: bool,
) -> Result<Option<RelativeFocusable>, FocusLockError> {
    let Some(element) = element.filter(|_| !scope.is_empty()) else {
        return Err(FocusLockError::MissingScope);
    };
    if !scope.iter().any(|&shard| dom.composed_contains(shard, element)) {
        return Err(FocusLockError::OutsideScope);
    }
    let focusables = collect(dom, scope, only_tabbable);
    let Some(current) = focusables.iter().position(|entry| entry.node == element) else {
        return Ok(None);
    };
    Ok(Some(RelativeFocusable {
        prev: current.checked_sub(1).and_then(|i| focusables.get(i).copied()),
        next: focusables.get(current + 1).copied(),
        first: focusables.first().copied(),
        last: focusables.last().copied(),
    }))
}

fn move_focus(
    dom: &mut DomTree,
    from: Option<NodeId>,
    options: &NavigationOptions,
    pick: impl Fn(&RelativeFocusable, bool) -> Option<FocusableEntry>,
) -> Option<NodeId> {
    let from = from.or_else(|| dom.focused());
    let scope = options.resolved_scope(dom);
    let relative = match get_relative_focusable(dom, from, &scope, options.only_tabbable) {
        Ok(relative) => relative?,
        Err(err) => {
            tracing::error!("{err}");
            return None;
        }
    };
    let target = pick(&relative, options.cycle)?;
    focus_on(dom, target.node).then_some(target.node)
}

/// Focus the element after `from` (the focused element when `None`)
pub fn focus_next_element(dom: &mut DomTree, from: Option<NodeId>, options: &NavigationOptions) -> Option<NodeId> {
    move_focus(dom, from, options, |r, cycle| r.next.or(r.first.filter(|_| cycle)))
}

/// Focus the element before `from` (the focused element when `None`)
pub fn focus_prev_element(dom: &mut DomTree, from: Option<NodeId>, options: &NavigationOptions) -> Option<NodeId> {
    move_focus(dom, from, options, |r, cycle| r.prev.or(r.last.filter(|_| cycle)))
}

fn pick_boundary(dom: &mut DomTree, scope: &[NodeId], options: &NavigationOptions, last: bool) -> Option<NodeId> {
    let set = collect(dom, scope, options.only_tabbable);
    let boundary = if last { set.last() } else { set.first() }?;
    focus_on(dom, boundary.node).then_some(boundary.node)
}

/// Focus the first focusable element of `scope`
pub fn focus_first_element(dom: &mut DomTree, scope: &[NodeId], options: &NavigationOptions) -> Option<NodeId> {
    pick_boundary(dom, scope, options, false)
}

/// Focus the last focusable element of `scope`
pub fn focus_last_element(dom: &mut DomTree, scope: &[NodeId], options: &NavigationOptions) -> Option<NodeId> {
    pick_boundary(dom, scope, options, true)
}
