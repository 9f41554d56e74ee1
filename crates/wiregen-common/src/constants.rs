//! Workspace-wide constants.

/// Default comment tag that introduces a wiring command.
pub const DEFAULT_TAG: &str = "wiring:";
