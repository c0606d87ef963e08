//! Trap activation engine
//!
//! [`FocusLock`] owns the mounted traps and listens to the focus event
//! stream. Whenever focus drifts out of the active trap it runs the solver
//! and pulls focus back; when the active trap changes it runs the
//! deactivation/activation callbacks and hands focus back to where it was
//! before the released trap captured it.

use fos_dom::{DomError, DomTree, FocusEvent, FocusEventType, FocusListener, NodeId, WeakNode};

use crate::FocusLockError;
use crate::active::{focus_inside, focus_is_hidden, get_active_element, top_document};
use crate::api::FocusLockApi;
use crate::collector::get_tabbable_nodes;
use crate::config::{ReturnFocus, TrapOptions};
use crate::constants::FOCUS_AUTO_GUARD;
use crate::guards::update_auto_guards;
use crate::mover::{FightGuard, focus_on, move_focus_inside};
use crate::predicates::{VisibilityCache, is_frame};
use crate::registry::{TrapDescriptor, TrapId, TrapRecord, TrapRegistry, TrapState};
use crate::restore::{FocusLocation, capture_focus_restore};
use crate::schedule::{Deferred, TaskQueue};

/// Whether the window holds system focus, as seen by the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowFocus {
    #[default]
    Inside,
    /// Focus went to another window or a cross-origin frame
    Away,
    /// Focus came back during the current tick
    JustReturned,
    /// Focus came back on an earlier tick and nothing was captured since
    ReturnedEarlier,
}

/// Counters mirroring the engine's diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusLockStats {
    pub activations: u64,
    pub deactivations: u64,
    /// Focus moves into the active trap
    pub focus_moves: u64,
    /// Activations that found nothing to focus
    pub missing_targets: u64,
    pub focus_fights: u64,
    /// Focus recovered after the focused node disappeared
    pub lost_focus_restores: u64,
    /// Focus handed back by released traps
    pub focus_returns: u64,
}

/// The focus lock
#[derive(Debug, Default)]
pub struct FocusLock {
    registry: TrapRegistry,
    active_trap: Option<TrapId>,
    /// Focus as last accepted; `None` right after the active trap changed
    last_active_focus: Option<WeakNode>,
    last_focus_restore: Option<FocusLocation>,
    portaled: Option<(TrapId, WeakNode)>,
    /// The current activation already reported an empty trap
    missing_reported: bool,
    window_focus: WindowFocus,
    guard: FightGuard,
    tasks: TaskQueue,
    stats: FocusLockStats,
}

impl FocusLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a trap; it becomes active unless disabled.
    ///
    /// A group marker already on the container is kept when the options
    /// name no group.
    pub fn mount(&mut self, dom: &mut DomTree, mut descriptor: TrapDescriptor) -> Result<TrapId, FocusLockError> {
        let observed = descriptor.observed;
        if !dom.is_element(observed) {
            return Err(DomError::NotFound(observed).into());
        }
        if descriptor.options.group.is_none() {
            descriptor.options.group = TrapOptions::from_markup(dom, observed).group;
        }
        descriptor.options.apply_markup(dom, observed)?;
        let id = self.registry.register(dom, descriptor);
        tracing::debug!(trap = %id, container = %observed, "trap mounted");
        self.handle_state_change(dom, None);
        Ok(id)
    }

    /// Replace a trap's options (enable, disable, regroup)
    pub fn update(&mut self, dom: &mut DomTree, id: TrapId, options: TrapOptions) -> Result<(), FocusLockError> {
        let record = self.registry.get_mut(id).ok_or(FocusLockError::UnknownTrap(id))?;
        if let Some(observed) = record.observed(dom) {
            options.apply_markup(dom, observed)?;
        }
        record.options = options;
        tracing::debug!(trap = %id, "trap updated");
        self.handle_state_change(dom, None);
        Ok(())
    }

    /// Unmount a trap; if it was active, the previous trap takes over
    pub fn unmount(&mut self, dom: &mut DomTree, id: TrapId) -> Result<(), FocusLockError> {
        let record = self.registry.unregister(id).ok_or(FocusLockError::UnknownTrap(id))?;
        tracing::debug!(trap = %id, "trap unmounted");
        self.handle_state_change(dom, Some(record));
        Ok(())
    }

    /// Focus landed on `target`, rendered outside the trap's container but
    /// logically part of it (a portal). It counts as inside until the
    /// lock moves focus again.
    pub fn record_container_focus(&mut self, dom: &DomTree, id: TrapId, target: NodeId) -> Result<(), FocusLockError> {
        if self.registry.get(id).is_none() {
            return Err(FocusLockError::UnknownTrap(id));
        }
        if !dom.is_alive(target) {
            return Err(DomError::NotFound(target).into());
        }
        self.portaled = Some((id, dom.downgrade(target)));
        Ok(())
    }

    pub fn active_trap(&self) -> Option<TrapId> {
        self.active_trap
    }

    pub fn registry(&self) -> &TrapRegistry {
        &self.registry
    }

    pub fn stats(&self) -> FocusLockStats {
        self.stats
    }

    pub fn window_focus(&self) -> WindowFocus {
        self.window_focus
    }

    /// Paused after detecting a focus fight
    pub fn is_paused(&self) -> bool {
        self.guard.is_disabled()
    }

    /// Deferred tasks waiting for the next tick
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Focus as last accepted by the lock
    pub fn last_focused(&self, dom: &DomTree) -> Option<NodeId> {
        self.last_active_focus.and_then(|weak| dom.upgrade(weak))
    }

    fn handle_state_change(&mut self, dom: &mut DomTree, mut removed: Option<TrapRecord>) {
        let next = self.registry.active();
        let previous = self.active_trap;
        let same_trap = previous.is_some() && previous == next;
        self.active_trap = next;

        if let Some(previous) = previous.filter(|_| !same_trap) {
            let still_enabled = self.registry.is_enabled(previous);
            let record = match removed.as_mut() {
                Some(record) if record.id() == previous => Some(record),
                _ => self.registry.get_mut(previous),
            };
            if let Some(record) = record {
                record.state = TrapState::Deactivating;
                let observed = record.observed(dom);
                if let Some(callback) = record.on_deactivation.as_mut() {
                    callback(dom, observed);
                }
                record.state = TrapState::Inactive;
                self.stats.deactivations += 1;
                tracing::debug!(trap = %previous, "trap deactivated");

                if !still_enabled {
                    let location = record.return_location.take();
                    let mode = record.options.return_focus;
                    self.return_focus(dom, location, mode);
                }
            }
        }

        let Some(id) = next else {
            self.last_active_focus = None;
            return;
        };
        self.last_active_focus = None;
        if !same_trap {
            self.missing_reported = false;
            if let Some(record) = self.registry.get_mut(id) {
                record.state = TrapState::Activating;
                let observed = record.observed(dom);
                if record.return_location.is_none() {
                    let doc = observed.map_or_else(|| dom.document(), |o| top_document(dom, o));
                    record.return_location = get_active_element(dom, doc)
                        .filter(|&active| !dom.is_body(active))
                        .map(|active| capture_focus_restore(dom, active));
                }
                if let (Some(callback), Some(observed)) = (record.on_activation.as_mut(), observed) {
                    let mut api = FocusLockApi::new(&mut self.guard, &mut self.tasks);
                    callback(dom, observed, &mut api);
                }
                record.state = TrapState::Active;
            }
            self.stats.activations += 1;
            tracing::debug!(trap = %id, "trap activated");
        }
        self.activate_trap(dom);
        self.tasks.defer(Deferred::Reassert { trap: id });
    }

    fn return_focus(&mut self, dom: &mut DomTree, location: Option<FocusLocation>, mode: ReturnFocus) {
        if mode == ReturnFocus::Disabled {
            return;
        }
        let Some(location) = location else {
            return;
        };
        let target = location
            .element(dom)
            .filter(|&node| dom.is_focusable(node))
            .or_else(|| location.restore(dom));
        let Some(target) = target else {
            tracing::debug!("nothing left to return focus to");
            return;
        };
        match mode {
            ReturnFocus::Immediate => {
                if focus_on(dom, target) {
                    self.stats.focus_returns += 1;
                }
            }
            ReturnFocus::NextTick => self.tasks.defer(Deferred::ReturnFocus {
                target: dom.downgrade(target),
            }),
            ReturnFocus::Disabled => {}
        }
    }

    /// Check focus against the active trap; true when focus was moved
    fn activate_trap(&mut self, dom: &mut DomTree) -> bool {
        let Some(id) = self.active_trap else {
            return false;
        };
        let Some(record) = self.registry.get(id) else {
            return false;
        };
        let options = record.options.clone();
        let mut working_area = record.working_area(dom);
        if working_area.is_empty() {
            working_area.extend(self.portal_of(dom, id));
        }
        let Some(&working_node) = working_area.first() else {
            return false;
        };
        let doc = top_document(dom, working_node);

        self.recover_lost_focus(dom, doc, &options);

        let Some(record) = self.registry.get(id) else {
            return false;
        };
        let active = get_active_element(dom, doc);
        if active.is_some_and(|node| !record.allows(dom, node)) {
            return false;
        }
        if self.window_focus == WindowFocus::Away && !options.persistent_focus {
            let into_frame = options.cross_frame && active.is_some_and(|node| is_frame(dom, node));
            if !into_frame {
                return false;
            }
        }
        if !self.should_capture(dom, doc, &options, &working_area) {
            return false;
        }

        let mut moved = false;
        let inside = active.is_some_and(|node| {
            focus_inside(dom, &working_area, Some(node))
                || self.is_portaled(dom, id, node)
                || is_host_of(dom, node, &working_area)
        });
        if !inside {
            let focus_outside = active.is_some_and(|node| !dom.is_body(node));
            if self.last_active_focus.is_none() && !options.auto_focus && focus_outside {
                dom.blur();
            } else {
                moved = self.move_inside(dom, &working_area);
                self.portaled = None;
            }
        }

        let now = get_active_element(dom, doc);
        self.last_active_focus = now.map(|node| dom.downgrade(node));
        if let Some(node) = now.filter(|&node| !dom.is_body(node)) {
            self.last_focus_restore = Some(capture_focus_restore(dom, node));
        }
        if self.window_focus != WindowFocus::Away {
            self.window_focus = WindowFocus::Inside;
        }

        if moved && has_auto_guards(dom, doc) {
            if let Some(node) = now {
                update_auto_guards(dom, &working_area, node);
            }
        }
        moved
    }

    fn should_capture(&self, dom: &DomTree, doc: NodeId, options: &TrapOptions, working_area: &[NodeId]) -> bool {
        options.persistent_focus
            || self.focus_was_outside(options.cross_frame)
            || !self.is_free_focus(dom, doc, options)
            || (self.last_active_focus.is_none() && options.auto_focus)
            || self.guardless_return(dom, options, working_area)
    }

    /// Focus on the body, in a free region, or (without cross-frame
    /// tracking) on a frame element
    fn is_free_focus(&self, dom: &DomTree, doc: NodeId, options: &TrapOptions) -> bool {
        match get_active_element(dom, doc) {
            None => true,
            Some(active) => {
                dom.is_body(active) || focus_is_hidden(dom, doc) || (!options.cross_frame && is_frame(dom, active))
            }
        }
    }

    fn focus_was_outside(&self, cross_frame: bool) -> bool {
        match self.window_focus {
            WindowFocus::JustReturned => cross_frame,
            WindowFocus::ReturnedEarlier => true,
            WindowFocus::Inside | WindowFocus::Away => false,
        }
    }

    /// Without guards, Tab off a boundary element leaves the window; when
    /// focus comes back it is restored
    fn guardless_return(&self, dom: &DomTree, options: &TrapOptions, working_area: &[NodeId]) -> bool {
        if !options.no_focus_guards || self.window_focus != WindowFocus::JustReturned {
            return false;
        }
        let Some(last) = self.last_focused(dom) else {
            return false;
        };
        let tabbables = get_tabbable_nodes(dom, working_area, &mut VisibilityCache::new(), false);
        tabbables.first().is_some_and(|entry| entry.node == last)
            || tabbables.last().is_some_and(|entry| entry.node == last)
    }

    /// Focus fell to the body because the last focused node went away
    fn recover_lost_focus(&mut self, dom: &mut DomTree, doc: NodeId, options: &TrapOptions) {
        if !self.is_free_focus(dom, doc, options) {
            return;
        }
        let Some(last) = self.last_active_focus else {
            return;
        };
        if let Some(node) = dom.upgrade(last) {
            if dom.is_body(node) || dom.is_focusable(node) {
                return;
            }
        }
        let Some(target) = self.last_focus_restore.as_ref().and_then(|location| location.restore(dom)) else {
            return;
        };
        if focus_on(dom, target) {
            self.stats.lost_focus_restores += 1;
            tracing::debug!(node = %target, "focus restored after removal");
        }
    }

    fn move_inside(&mut self, dom: &mut DomTree, working_area: &[NodeId]) -> bool {
        let last = self.last_focused(dom);
        match move_focus_inside(dom, &mut self.guard, &mut self.tasks, working_area, last) {
            Ok(Some(node)) => {
                self.missing_reported = false;
                self.stats.focus_moves += 1;
                tracing::debug!(node = %node, "focus moved inside trap");
                true
            }
            Ok(None) => false,
            Err(FocusLockError::NoFocusTarget) if self.missing_reported => {
                tracing::debug!("{}", FocusLockError::NoFocusTarget);
                false
            }
            Err(FocusLockError::NoFocusTarget) => {
                self.missing_reported = true;
                self.stats.missing_targets += 1;
                tracing::warn!("{}", FocusLockError::NoFocusTarget);
                false
            }
            Err(FocusLockError::FocusFighting) => {
                self.stats.focus_fights += 1;
                false
            }
            Err(err) => {
                tracing::debug!(error = %err, "focus not moved");
                false
            }
        }
    }

    fn portal_of(&self, dom: &DomTree, id: TrapId) -> Option<NodeId> {
        self.portaled
            .filter(|(trap, _)| *trap == id)
            .and_then(|(_, target)| dom.upgrade(target))
    }

    fn is_portaled(&self, dom: &DomTree, id: TrapId, node: NodeId) -> bool {
        self.portal_of(dom, id).is_some_and(|portal| dom.composed_contains(portal, node))
    }

    fn run_deferred(&mut self, dom: &mut DomTree) {
        for task in self.tasks.take() {
            match task {
                Deferred::Recheck => {
                    self.activate_trap(dom);
                }
                Deferred::Reassert { trap } => {
                    if self.active_trap == Some(trap) {
                        self.activate_trap(dom);
                    }
                }
                Deferred::ReEnable => {
                    self.guard.enable();
                    tracing::debug!("focus lock resumed");
                }
                Deferred::WindowSettled => {
                    if self.window_focus == WindowFocus::JustReturned {
                        self.window_focus = WindowFocus::ReturnedEarlier;
                    }
                }
                Deferred::ReturnFocus { target } => {
                    if let Some(node) = dom.upgrade(target) {
                        if focus_on(dom, node) {
                            self.stats.focus_returns += 1;
                        }
                    }
                }
            }
        }
    }
}

/// Focus sits on a shadow host that contains the trap
fn is_host_of(dom: &DomTree, node: NodeId, working_area: &[NodeId]) -> bool {
    dom.is_shadow_host(node) && working_area.iter().any(|&area| dom.composed_contains(node, area))
}

fn has_auto_guards(dom: &DomTree, doc: NodeId) -> bool {
    dom.descendants(doc).any(|node| dom.has_attribute(node, FOCUS_AUTO_GUARD))
}

impl FocusListener for FocusLock {
    fn handle_focus_event(&mut self, dom: &mut DomTree, event: &mut FocusEvent) {
        match event.event_type {
            FocusEventType::FocusIn => {
                if self.activate_trap(dom) {
                    event.stop_propagation();
                    event.prevent_default();
                }
            }
            FocusEventType::FocusOut => {
                if self.active_trap.is_some() {
                    self.tasks.defer(Deferred::Recheck);
                }
            }
            FocusEventType::Blur => self.window_focus = WindowFocus::Away,
            FocusEventType::Focus => {
                self.window_focus = WindowFocus::JustReturned;
                self.tasks.defer(Deferred::WindowSettled);
            }
        }
    }

    fn on_tick(&mut self, dom: &mut DomTree) {
        self.run_deferred(dom);
    }
}
