//! Focus Events
//!
//! Focus event records and the loop that delivers them to listeners.

use crate::{DomTree, NodeId};

/// Events delivered in one pump before the loop gives up
pub const MAX_EVENTS_PER_PUMP: usize = 256;

/// Focus event types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEventType {
    /// Window gained system focus
    Focus,
    /// Window lost system focus
    Blur,
    /// Element gained focus (bubbles)
    FocusIn,
    /// Element lost focus (bubbles)
    FocusOut,
}

/// Focus event
#[derive(Debug, Clone)]
pub struct FocusEvent {
    pub event_type: FocusEventType,
    /// Event target (NONE for window events)
    pub target: NodeId,
    pub related_target: Option<NodeId>,
    /// Dispatch nesting depth: 0 for events raised outside any handler
    pub depth: u32,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl FocusEvent {
    fn new(event_type: FocusEventType, target: NodeId, related_target: Option<NodeId>) -> Self {
        Self {
            event_type,
            target,
            related_target,
            depth: 0,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create focusin event
    pub fn focus_in(target: NodeId, related_target: Option<NodeId>) -> Self {
        Self::new(FocusEventType::FocusIn, target, related_target)
    }

    /// Create focusout event
    pub fn focus_out(target: NodeId, related_target: Option<NodeId>) -> Self {
        Self::new(FocusEventType::FocusOut, target, related_target)
    }

    /// Create window focus event
    pub fn window_focus() -> Self {
        Self::new(FocusEventType::Focus, NodeId::NONE, None)
    }

    /// Create window blur event
    pub fn window_blur() -> Self {
        Self::new(FocusEventType::Blur, NodeId::NONE, None)
    }

    /// Whether the event bubbles through the document
    pub fn bubbles(&self) -> bool {
        matches!(self.event_type, FocusEventType::FocusIn | FocusEventType::FocusOut)
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop propagation to later listeners
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Check if propagation was stopped
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Receiver of focus events and ticks
pub trait FocusListener {
    /// Handle one event; may move focus, which queues more events
    fn handle_focus_event(&mut self, tree: &mut DomTree, event: &mut FocusEvent);

    /// Run work deferred to the next tick
    fn on_tick(&mut self, _tree: &mut DomTree) {}
}

/// Delivers queued focus events to listeners in registration order
#[derive(Debug)]
pub struct FocusEventLoop {
    max_events: usize,
    delivered: u64,
}

impl Default for FocusEventLoop {
    fn default() -> Self {
        Self {
            max_events: MAX_EVENTS_PER_PUMP,
            delivered: 0,
        }
    }
}

impl FocusEventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loop with a custom per-pump event cap
    pub fn with_max_events(max_events: usize) -> Self {
        Self {
            max_events,
            delivered: 0,
        }
    }

    /// Total events delivered so far
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Deliver events until the queue is empty; returns how many were delivered
    pub fn pump(&mut self, tree: &mut DomTree, listeners: &mut [&mut dyn FocusListener]) -> usize {
        let mut count = 0;
        while let Some(mut event) = tree.take_focus_event() {
            if count == self.max_events {
                tracing::error!(
                    limit = self.max_events,
                    dropped = tree.pending_focus_events() + 1,
                    "focus event loop did not settle, dropping remaining events"
                );
                tree.clear_focus_events();
                break;
            }
            count += 1;
            for listener in listeners.iter_mut() {
                listener.handle_focus_event(tree, &mut event);
                if event.is_propagation_stopped() {
                    break;
                }
            }
        }
        self.delivered += count as u64;
        count
    }

    /// Start a new tick: run deferred work, then deliver what it queued
    pub fn tick(&mut self, tree: &mut DomTree, listeners: &mut [&mut dyn FocusListener]) -> usize {
        self.pump(tree, listeners);
        for listener in listeners.iter_mut() {
            listener.on_tick(tree);
        }
        self.pump(tree, listeners)
    }
}
