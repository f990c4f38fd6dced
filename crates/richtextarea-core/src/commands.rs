//! Pass-through to the sandbox document's native editing commands.
//!
//! These are unguarded delegations: no readiness check is made, and a
//! missing or uncooperative document yields `None` ("not applicable right
//! now") instead of an error.

use crate::surface::Surface;

/// Run a named editing command (`bold`, `insertHTML`, ...).
pub fn exec_command<S: Surface + ?Sized>(
    surface: &S,
    name: &str,
    show_ui: bool,
    value: &str,
) -> Option<bool> {
    surface
        .exec_command(name, show_ui, value)
        .inspect_err(|err| tracing::debug!(command = name, error = %err, "exec_command skipped"))
        .ok()
}

pub fn query_command_state<S: Surface + ?Sized>(surface: &S, name: &str) -> Option<bool> {
    surface
        .query_command_state(name)
        .inspect_err(|err| tracing::debug!(command = name, error = %err, "query_command_state skipped"))
        .ok()
}

pub fn query_command_value<S: Surface + ?Sized>(surface: &S, name: &str) -> Option<String> {
    surface
        .query_command_value(name)
        .inspect_err(|err| tracing::debug!(command = name, error = %err, "query_command_value skipped"))
        .ok()
}
