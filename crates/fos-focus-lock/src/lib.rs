//! fOS Focus Lock
//!
//! Keeps keyboard focus inside a trap container (a modal, drawer or other
//! overlay) of an `fos-dom` tree.
//!
//! Features:
//! - Tab order collection across shadow roots, slots and same-origin frames
//! - Focus groups and shards spanning several containers
//! - Tab/Shift+Tab wrapping with boundary guards and auto guards
//! - Nested traps with activation order and focus return
//! - Structural focus restore after the focused node is unmounted
//! - Focus-fighting detection between competing focus managers
//! - Programmatic next/previous/first/last navigation

pub mod active;
pub mod affected;
pub mod api;
pub mod auto_focus;
pub mod collector;
pub mod config;
pub mod constants;
pub mod correct;
pub mod engine;
pub mod guards;
pub mod mover;
pub mod parenting;
pub mod predicates;
pub mod registry;
pub mod restore;
pub mod schedule;
pub mod sibling;
pub mod solver;
pub mod tabbables;

pub use api::FocusLockApi;
pub use collector::{FocusableEntry, get_focusable_nodes, get_tabbable_nodes};
pub use config::{ReturnFocus, TrapOptions};
pub use engine::{FocusLock, FocusLockStats, WindowFocus};
pub use guards::{FocusGuards, install_auto_guards, install_focus_guards, remove_focus_guards};
pub use mover::move_focus_inside;
pub use registry::{TrapDescriptor, TrapId, TrapRegistry, TrapState};
pub use restore::{FocusLocation, capture_focus_restore};
pub use sibling::{
    NavigationOptions, RelativeFocusable, focus_first_element, focus_last_element, focus_next_element,
    focus_prev_element, get_relative_focusable,
};
pub use solver::{FocusDecision, expand_focusable_nodes, focus_solver, new_focus};

use fos_dom::{DomError, NodeId};

/// Focus lock error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FocusLockError {
    #[error("focus-lock: cannot find any node to move focus into")]
    NoFocusTarget,

    #[error("focus-lock: focus-fighting detected. Only one focus management system could be active")]
    FocusFighting,

    #[error("no element or scope given")]
    MissingScope,

    #[error("active element is not contained in the scope")]
    OutsideScope,

    #[error("unknown trap {0}")]
    UnknownTrap(TrapId),

    #[error("node {0} is not attached to a parent")]
    Detached(NodeId),

    #[error(transparent)]
    Dom(#[from] DomError),
}
