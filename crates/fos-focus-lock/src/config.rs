//! Trap options
//!
//! Typed configuration of a trap. Options come from serialized settings
//! (serde) or are read once from container markup; the engine writes the
//! group and disabled markers back so other traps can see them.

use fos_dom::{DomError, DomTree, NodeId};
use serde::{Deserialize, Serialize};

use crate::constants::{DISABLED_VALUE, FOCUS_DISABLED, FOCUS_GROUP};

/// When a released trap hands focus back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnFocus {
    /// Focus stays wherever it is
    #[default]
    Disabled,
    /// Synchronously, while the trap is released
    Immediate,
    /// On the tick after the release
    NextTick,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrapOptions {
    /// Mounted but not competing for focus
    pub disabled: bool,
    /// Recapture even when focus is free (on the body, in a free region,
    /// or outside the window)
    pub persistent_focus: bool,
    /// Move focus in on first activation
    pub auto_focus: bool,
    /// Treat focus moving into a frame outside the trap as leaving it
    pub cross_frame: bool,
    /// The host renders no boundary guards
    pub no_focus_guards: bool,
    pub return_focus: ReturnFocus,
    /// Focus group shared with other containers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Default for TrapOptions {
    fn default() -> Self {
        Self {
            disabled: false,
            persistent_focus: false,
            auto_focus: true,
            cross_frame: true,
            no_focus_guards: false,
            return_focus: ReturnFocus::Disabled,
            group: None,
        }
    }
}

impl TrapOptions {
    /// Defaults overlaid with the markers found on `container`
    pub fn from_markup(dom: &DomTree, container: NodeId) -> Self {
        Self {
            disabled: dom.get_attribute(container, FOCUS_DISABLED) == Some(DISABLED_VALUE),
            group: dom
                .get_attribute(container, FOCUS_GROUP)
                .filter(|group| !group.is_empty())
                .map(str::to_owned),
            ..Self::default()
        }
    }

    /// Write the group and disabled markers onto `container`
    pub fn apply_markup(&self, dom: &mut DomTree, container: NodeId) -> Result<(), DomError> {
        match &self.group {
            Some(group) => dom.set_attribute(container, FOCUS_GROUP, group)?,
            None => {
                dom.remove_attribute(container, FOCUS_GROUP);
            }
        }
        if self.disabled {
            dom.set_attribute(container, FOCUS_DISABLED, DISABLED_VALUE)?;
        } else {
            dom.remove_attribute(container, FOCUS_DISABLED);
        }
        Ok(())
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_return_focus(mut self, return_focus: ReturnFocus) -> Self {
        self.return_focus = return_focus;
        self
    }
}
