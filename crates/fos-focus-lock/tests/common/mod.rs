//! Shared fixtures for the fos-focus-lock integration tests
//!
//! Page builders, a keyboard Tab simulation and a tracing layer that
//! records emitted events for assertions.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use fos_dom::{DomTree, FocusEventLoop, FocusListener, NodeId};
use fos_focus_lock::collector::{get_tabbable_nodes, nodes_of};
use fos_focus_lock::predicates::VisibilityCache;
use tracing::Level;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};

// ============================================================================
// LOG CAPTURE
// ============================================================================

/// One event seen by [`LogCapture`]
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: String,
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.0 = value.to_owned();
        }
    }
}

/// Layer that keeps every event in memory
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S> tracing_subscriber::Layer<S> for LogCapture
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_owned(),
            message: visitor.0,
        });
    }
}

impl LogCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Events at `level` whose message contains `needle`
    pub fn count(&self, level: Level, needle: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.level == level && event.message.contains(needle))
            .count()
    }
}

/// Run `f` with a capturing subscriber installed on this thread
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, LogCapture) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture)
}

// ============================================================================
// PAGES
// ============================================================================

/// Body with a button before a dialog, the dialog, and a button after it
pub struct Page {
    pub dom: DomTree,
    pub body: NodeId,
    pub before: NodeId,
    pub dialog: NodeId,
    pub inner: Vec<NodeId>,
    pub after: NodeId,
}

pub fn page(inner_buttons: usize) -> Page {
    let mut dom = DomTree::new();
    let body = dom.document_body().unwrap();
    let before = dom.append_element(body, "button", &[("id", "before")]).unwrap();
    let dialog = dom.append_element(body, "div", &[("role", "dialog")]).unwrap();
    let inner = buttons(&mut dom, dialog, inner_buttons);
    let after = dom.append_element(body, "button", &[("id", "after")]).unwrap();
    Page {
        dom,
        body,
        before,
        dialog,
        inner,
        after,
    }
}

pub fn buttons(dom: &mut DomTree, parent: NodeId, count: usize) -> Vec<NodeId> {
    (0..count)
        .map(|_| dom.append_element(parent, "button", &[]).unwrap())
        .collect()
}

// ============================================================================
// DRIVING
// ============================================================================

/// Deliver pending events, run deferred work, deliver what it queued
pub fn settle(dom: &mut DomTree, listener: &mut dyn FocusListener) {
    FocusEventLoop::new().tick(dom, &mut [listener]);
}

/// Browser-style sequential navigation over the whole document, then settle
pub fn press_tab(dom: &mut DomTree, listener: &mut dyn FocusListener, backwards: bool) -> Option<NodeId> {
    let body = dom.document_body()?;
    let order = nodes_of(&get_tabbable_nodes(dom, &[body], &mut VisibilityCache::new(), false));
    let current = dom.focused().and_then(|focused| order.iter().position(|&node| node == focused));
    let next = match (current, backwards) {
        (Some(i), false) => order.get(i + 1),
        (Some(i), true) => i.checked_sub(1).and_then(|i| order.get(i)),
        (None, false) => order.first(),
        (None, true) => order.last(),
    }
    .copied()?;
    dom.focus(next);
    settle(dom, listener);
    dom.focused()
}
