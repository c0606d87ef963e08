//! Moving focus
//!
//! [`move_focus_inside`] runs the solver and focuses its answer. Two focus
//! managers that each pull focus into their own region would bounce focus
//! back and forth forever; [`FightGuard`] notices the nesting and pauses
//! this one until the next tick.

use fos_dom::{DomTree, NodeId};

use crate::FocusLockError;
use crate::constants::FOCUS_FIGHT_DEPTH;
use crate::schedule::{Deferred, TaskQueue};
use crate::solver::focus_solver;

/// Focus-fighting detector
#[derive(Debug, Default)]
pub struct FightGuard {
    disabled: bool,
    trips: u64,
}

impl FightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paused after a fight, until the queued re-enable runs
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Number of fights detected so far
    pub fn trips(&self) -> u64 {
        self.trips
    }

    pub fn enable(&mut self) {
        self.disabled = false;
    }

    /// Check the nesting depth before forcing focus
    pub fn check(&mut self, dom: &DomTree, tasks: &mut TaskQueue) -> Result<(), FocusLockError> {
        if dom.dispatch_depth() <= FOCUS_FIGHT_DEPTH {
            return Ok(());
        }
        let err = FocusLockError::FocusFighting;
        tracing::error!(depth = dom.dispatch_depth(), "{err}");
        self.disabled = true;
        self.trips += 1;
        tasks.defer(Deferred::ReEnable);
        Err(err)
    }
}

/// Focus a node; frames take focus as an element
pub fn focus_on(dom: &mut DomTree, target: NodeId) -> bool {
    let moved = dom.focus(target);
    if moved {
        tracing::trace!(node = %target, "focus moved");
    }
    moved
}

/// Move focus into `scope` unless it is already acceptable there.
///
/// Returns the node that received focus. Nothing happens while the guard
/// is paused.
pub fn move_focus_inside(
    dom: &mut DomTree,
    guard: &mut FightGuard,
    tasks: &mut TaskQueue,
    scope: &[NodeId],
    last_node: Option<NodeId>,
) -> Result<Option<NodeId>, FocusLockError> {
    let target = focus_solver(dom, scope, last_node)?;
    if guard.is_disabled() {
        return Ok(None);
    }
    let Some(target) = target else {
        return Ok(None);
    };
    guard.check(dom, tasks)?;
    Ok(focus_on(dom, target.node).then_some(target.node))
}
