//! Focus commands handed to activation callbacks

use fos_dom::{DomTree, NodeId};

use crate::FocusLockError;
use crate::active;
use crate::mover::{self, FightGuard};
use crate::restore::{self, FocusLocation};
use crate::schedule::TaskQueue;
use crate::sibling::{self, NavigationOptions};

/// Borrowed view of the engine that activation callbacks may drive.
///
/// Focus moves go through the engine's fight guard, so a callback that
/// fights another focus manager is paused like the engine itself.
pub struct FocusLockApi<'a> {
    guard: &'a mut FightGuard,
    tasks: &'a mut TaskQueue,
}

impl<'a> FocusLockApi<'a> {
    pub(crate) fn new(guard: &'a mut FightGuard, tasks: &'a mut TaskQueue) -> Self {
        Self { guard, tasks }
    }

    /// Move focus into `scope`; returns the newly focused node
    pub fn move_focus_inside(
        &mut self,
        dom: &mut DomTree,
        scope: &[NodeId],
        last_node: Option<NodeId>,
    ) -> Option<NodeId> {
        match mover::move_focus_inside(dom, self.guard, self.tasks, scope, last_node) {
            Ok(moved) => moved,
            Err(FocusLockError::NoFocusTarget) => {
                tracing::warn!("{}", FocusLockError::NoFocusTarget);
                None
            }
            Err(err) => {
                tracing::debug!(error = %err, "focus not moved");
                None
            }
        }
    }

    pub fn focus_inside(&self, dom: &DomTree, scope: &[NodeId]) -> bool {
        active::focus_inside(dom, scope, None)
    }

    pub fn focus_next_element(
        &mut self,
        dom: &mut DomTree,
        from: Option<NodeId>,
        options: &NavigationOptions,
    ) -> Option<NodeId> {
        sibling::focus_next_element(dom, from, options)
    }

    pub fn focus_prev_element(
        &mut self,
        dom: &mut DomTree,
        from: Option<NodeId>,
        options: &NavigationOptions,
    ) -> Option<NodeId> {
        sibling::focus_prev_element(dom, from, options)
    }

    pub fn focus_first_element(
        &mut self,
        dom: &mut DomTree,
        scope: &[NodeId],
        options: &NavigationOptions,
    ) -> Option<NodeId> {
        sibling::focus_first_element(dom, scope, options)
    }

    pub fn focus_last_element(
        &mut self,
        dom: &mut DomTree,
        scope: &[NodeId],
        options: &NavigationOptions,
    ) -> Option<NodeId> {
        sibling::focus_last_element(dom, scope, options)
    }

    pub fn capture_focus_restore(&self, dom: &DomTree, element: NodeId) -> FocusLocation {
        restore::capture_focus_restore(dom, element)
    }
}
