//! Shadow DOM
//!
//! Shadow root data and slot assignment.

use crate::NodeId;

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

/// Options for `attachShadow`
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowRootInit {
    pub mode: ShadowRootMode,
    pub delegates_focus: bool,
}

impl ShadowRootInit {
    pub fn open() -> Self {
        Self::default()
    }

    pub fn closed() -> Self {
        Self {
            mode: ShadowRootMode::Closed,
            delegates_focus: false,
        }
    }
}

/// Data stored on a shadow root node
#[derive(Debug, Clone)]
pub struct ShadowRootData {
    pub host: NodeId,
    pub mode: ShadowRootMode,
    pub delegates_focus: bool,
}

impl ShadowRootData {
    pub fn new(host: NodeId, init: ShadowRootInit) -> Self {
        Self {
            host,
            mode: init.mode,
            delegates_focus: init.delegates_focus,
        }
    }

    /// Visible through `element.shadowRoot`
    pub fn is_open(&self) -> bool {
        self.mode == ShadowRootMode::Open
    }
}

/// Slot a light child is assigned to (named slot assignment)
pub(crate) fn slot_name_of(slot_attr: Option<&str>) -> &str {
    slot_attr.unwrap_or("")
}
