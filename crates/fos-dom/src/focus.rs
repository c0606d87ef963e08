//! Focus state
//!
//! One focused element per window. Documents, shadow roots and frames each
//! see a retargeted "active element". Every focus change is queued as
//! [`FocusEvent`]s for the [`crate::FocusEventLoop`] to deliver.

use std::collections::VecDeque;

use crate::{DomTree, FocusEvent, NodeData, NodeId};

#[derive(Debug)]
pub(crate) struct FocusState {
    /// Focused element; NONE means the top-level body
    focused: NodeId,
    window_focused: bool,
    queue: VecDeque<FocusEvent>,
    /// Nesting depth stamped on events queued right now
    dispatch_depth: u32,
}

impl Default for FocusState {
    fn default() -> Self {
        Self {
            focused: NodeId::NONE,
            window_focused: true,
            queue: VecDeque::new(),
            dispatch_depth: 0,
        }
    }
}

impl DomTree {
    /// Focused element, falling back to the top-level body
    pub fn focused(&self) -> Option<NodeId> {
        self.focus.focused.to_option().or_else(|| self.document_body())
    }

    /// Whether the window currently has system focus
    pub fn has_window_focus(&self) -> bool {
        self.focus.window_focused
    }

    /// Check if `id` is the `<body>` of its document
    pub fn is_body(&self, id: NodeId) -> bool {
        self.owner_document(id)
            .and_then(|doc| self.body(doc))
            .is_some_and(|body| body == id)
    }

    /// No composed ancestor is `display: none`, `visibility: hidden` or inert
    pub fn is_being_rendered(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(element) = self.element(node) {
                if element.has_attr("inert") {
                    return false;
                }
                if self.computed_style(node).is_some_and(|s| s.hides_element()) {
                    return false;
                }
            }
            current = self.composed_parent(node);
        }
        true
    }

    /// Whether `focus()` on this node would succeed
    pub fn is_focusable(&self, id: NodeId) -> bool {
        if self.is_body(id) {
            return self.is_connected(id);
        }
        self.element(id).is_some_and(|e| e.is_focusable_kind())
            && self.is_connected(id)
            && self.is_being_rendered(id)
    }

    /// Move focus to `id`, queueing `focusout`/`focusin`
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.is_focusable(id) {
            tracing::trace!(node = %id, "focus() ignored on non-focusable node");
            return false;
        }
        let old = self.focus.focused;
        if old == id || (!old.is_valid() && self.document_body() == Some(id)) {
            return true;
        }
        self.focus.focused = id;
        let related = id.to_option();
        if old.is_valid() && !self.is_body(old) {
            self.enqueue(FocusEvent::focus_out(old, related));
        }
        if !self.is_body(id) {
            self.enqueue(FocusEvent::focus_in(id, old.to_option()));
        }
        true
    }

    /// Drop focus back to the top-level body
    pub fn blur(&mut self) {
        let old = std::mem::replace(&mut self.focus.focused, NodeId::NONE);
        if old.is_valid() && !self.is_body(old) {
            self.enqueue(FocusEvent::focus_out(old, None));
        }
    }

    /// System focus left the window (alt-tab, devtools, cross-origin frame)
    pub fn blur_window(&mut self) {
        if !self.focus.window_focused {
            return;
        }
        self.focus.window_focused = false;
        if let Some(focused) = self.focus.focused.to_option().filter(|&f| !self.is_body(f)) {
            self.enqueue(FocusEvent::focus_out(focused, None));
        }
        self.enqueue(FocusEvent::window_blur());
    }

    /// System focus came back to the window
    pub fn focus_window(&mut self) {
        if self.focus.window_focused {
            return;
        }
        self.focus.window_focused = true;
        self.enqueue(FocusEvent::window_focus());
        if let Some(focused) = self.focus.focused.to_option().filter(|&f| !self.is_body(f)) {
            self.enqueue(FocusEvent::focus_in(focused, None));
        }
    }

    /// `document.activeElement`: focused element retargeted into `doc`
    pub fn active_element(&self, doc: NodeId) -> Option<NodeId> {
        self.retarget_focus(doc).or_else(|| self.body(doc))
    }

    /// `shadowRoot.activeElement`: `None` when focus is outside the root
    pub fn shadow_active_element(&self, shadow_root: NodeId) -> Option<NodeId> {
        self.retarget_focus(shadow_root)
    }

    fn retarget_focus(&self, scope: NodeId) -> Option<NodeId> {
        let mut current = self.focus.focused.to_option()?;
        loop {
            let root = self.root(current);
            if root == scope {
                return Some(current);
            }
            current = match self.get(root).map(|n| &n.data) {
                Some(NodeData::ShadowRoot(shadow)) => shadow.host,
                Some(NodeData::Document(doc)) => doc.frame_owner()?,
                _ => return None,
            };
        }
    }

    /// Focus falls back to the body when its subtree leaves the document
    pub(crate) fn drop_focus_within(&mut self, removed: NodeId) {
        let focused = self.focus.focused;
        if focused.is_valid() && self.composed_contains(removed, focused) {
            self.focus.focused = NodeId::NONE;
            self.enqueue(FocusEvent::focus_out(focused, None));
        }
    }

    fn enqueue(&mut self, mut event: FocusEvent) {
        event.depth = self.focus.dispatch_depth;
        self.focus.queue.push_back(event);
    }

    /// Pop the next queued event; events queued while it is handled nest one level deeper
    pub fn take_focus_event(&mut self) -> Option<FocusEvent> {
        match self.focus.queue.pop_front() {
            Some(event) => {
                self.focus.dispatch_depth = event.depth + 1;
                Some(event)
            }
            None => {
                self.focus.dispatch_depth = 0;
                None
            }
        }
    }

    /// Number of undelivered focus events
    pub fn pending_focus_events(&self) -> usize {
        self.focus.queue.len()
    }

    /// Discard undelivered focus events
    pub fn clear_focus_events(&mut self) {
        self.focus.queue.clear();
        self.focus.dispatch_depth = 0;
    }

    /// Depth of the event currently being handled (0 outside dispatch)
    pub fn dispatch_depth(&self) -> u32 {
        self.focus.dispatch_depth
    }

    /// Whether `id` hosts a closed or open shadow root
    pub fn is_shadow_host(&self, id: NodeId) -> bool {
        self.any_shadow_root(id).is_some()
    }
}
