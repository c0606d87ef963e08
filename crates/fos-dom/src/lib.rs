//! fOS DOM - Document Object Model
//!
//! Arena-based DOM tree with the surface a focus manager needs:
//! shadow roots and slots, same- and cross-origin frames, computed
//! display/visibility, focus state and a queue of focus events.

mod attributes;
mod document;
mod focus;
mod focus_events;
mod generation;
mod node;
mod position;
mod shadow;
mod style;
mod tree;

pub use attributes::{Attr, NamedNodeMap};
pub use document::DocumentData;
pub use focus_events::{FocusEvent, FocusEventLoop, FocusEventType, FocusListener, MAX_EVENTS_PER_PUMP};
pub use generation::{Generation, WeakNode};
pub use node::{ElementData, FrameContent, FrameOrigin, Node, NodeData, NodeType};
pub use position::DocumentPosition;
pub use shadow::{ShadowRootData, ShadowRootInit, ShadowRootMode};
pub use style::{ComputedStyle, Display, Visibility};
pub use tree::{Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Null node
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this id points at a node slot
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Convert a link field into an option
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        if self.is_valid() { Some(self) } else { None }
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// DOM error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node {0} does not exist")]
    NotFound(NodeId),

    #[error("Hierarchy request error: cannot insert {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Node {reference} is not a child of {parent}")]
    NotAChild { parent: NodeId, reference: NodeId },

    #[error("Element {0} already hosts a shadow root")]
    ShadowRootExists(NodeId),
}
