//! Deferred work
//!
//! Anything the lock must do "one tick later" goes through a [`TaskQueue`]
//! drained by the engine's `on_tick`. Tasks queued while a tick runs wait
//! for the next one.

use std::collections::VecDeque;

use fos_dom::WeakNode;

use crate::registry::TrapId;

/// A unit of work postponed to the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Focus left an element; check the active trap again
    Recheck,
    /// Second activation pass after a trap became active
    Reassert { trap: TrapId },
    /// Lift the focus-fighting pause
    ReEnable,
    /// A window focus return stops counting as "just returned"
    WindowSettled,
    /// Focus the element a released trap hands focus back to
    ReturnFocus { target: WeakNode },
}

#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: VecDeque<Deferred>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a task; an identical pending task is not queued twice
    pub fn defer(&mut self, task: Deferred) {
        if !self.tasks.contains(&task) {
            self.tasks.push_back(task);
        }
    }

    /// Take every task queued so far
    pub fn take(&mut self) -> Vec<Deferred> {
        self.tasks.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, task: &Deferred) -> bool {
        self.tasks.contains(task)
    }
}
