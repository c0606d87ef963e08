//! Marker attributes and tunables

/// Container of a trap; value is the focus group name
pub const FOCUS_GROUP: &str = "data-focus-lock";

/// Set to `"disabled"` on a trap container that is mounted but inactive
pub const FOCUS_DISABLED: &str = "data-focus-lock-disabled";

/// Region where focus may roam without being captured
pub const FOCUS_ALLOW: &str = "data-no-focus-lock";

/// Everything focusable inside is an autofocus candidate
pub const FOCUS_AUTO: &str = "data-autofocus-inside";

/// Opt a subtree out of autofocus
pub const FOCUS_NO_AUTOFOCUS: &str = "data-no-autofocus";

/// Boundary sentinel placed before and after a trap container
pub const FOCUS_GUARD: &str = "data-focus-guard";

/// Guard that is tabbable only while focus is next to it
pub const FOCUS_AUTO_GUARD: &str = "data-focus-auto-guard";

/// Explicit autofocus marker for elements without the `autofocus` attribute
pub const FOCUS_AUTOFOCUS: &str = "data-autofocus";

/// Forced focus moves allowed inside nested dispatch before the engine
/// treats it as fighting another focus manager
pub const FOCUS_FIGHT_DEPTH: u32 = 2;

/// Value of [`FOCUS_DISABLED`] marking a disabled trap
pub const DISABLED_VALUE: &str = "disabled";
