//! Platform abstraction traits for the sync engine.
//!
//! These traits define the interface between the sync logic and the
//! platform that actually hosts the sandboxed document (browser iframe,
//! in-memory fake for tests). The engine only ever talks to the document
//! through them, so it never holds on to platform objects that may be torn
//! down by a host re-render.

use std::time::Duration;

use crate::error::SurfaceError;
use crate::lifecycle::Readiness;
use crate::types::Timer;

/// The sandboxed editable document, as seen from outside.
///
/// Implementations locate the sandbox lazily on every call: a surface may
/// disappear and reappear between two calls, and every method must tolerate
/// that. Queries return `None` while detached; mutations return
/// [`SurfaceError::Detached`].
pub trait Surface {
    /// Where the sandbox document currently stands on the way to editable.
    fn readiness(&self) -> Readiness;

    /// Write a minimal empty document whose body is content-editable.
    ///
    /// Only called when the document has no body.
    fn bootstrap(&mut self) -> Result<(), SurfaceError>;

    /// Turn the document into an editing surface and set the one-time
    /// initialization marker on its body.
    fn configure(&mut self) -> Result<(), SurfaceError>;

    /// Attach focus, blur, input, change, scroll and load listeners to the
    /// sandbox. Called once per configured document.
    fn bind_listeners(&mut self) -> Result<(), SurfaceError>;

    /// Markup of the editable root.
    fn content(&self) -> Option<String>;

    fn set_content(&mut self, html: &str) -> Result<(), SurfaceError>;

    /// Remove the element with the given id from the sandbox document.
    /// Returns whether an element was removed.
    fn remove_element(&mut self, id: &str) -> bool;

    /// Make sure the document has a head, inserting one before the body if
    /// it is missing.
    fn ensure_head(&mut self) -> Result<(), SurfaceError>;

    /// Append a style element with the given id and text to the head.
    fn append_style(&mut self, id: &str, text: &str) -> Result<(), SurfaceError>;

    /// Currently rendered height of the frame, in pixels.
    fn frame_height(&self) -> Option<i32>;

    fn set_frame_height(&mut self, px: i32) -> Result<(), SurfaceError>;

    /// Toggle the host-visible `is-placeholder` flag on the outer wrapper.
    fn set_placeholder_flag(&mut self, showing: bool) -> Result<(), SurfaceError>;

    /// Move input focus to the editable root. Returns whether a root was
    /// there to focus.
    fn focus_editable(&self) -> bool;

    /// Whether the user is in the middle of an IME composition.
    fn is_composing(&self) -> bool {
        false
    }

    /// Run a native editing command against the sandbox document.
    fn exec_command(&self, name: &str, show_ui: bool, value: &str) -> Result<bool, SurfaceError>;

    fn query_command_state(&self, name: &str) -> Result<bool, SurfaceError>;

    fn query_command_value(&self, name: &str) -> Result<String, SurfaceError>;
}

/// Cancellable timers, keyed by [`Timer`].
///
/// Scheduling a kind that is already pending replaces it. When a timer
/// fires, the platform routes it to [`SyncSession::on_timer`](crate::SyncSession::on_timer).
pub trait Scheduler {
    /// Fire `timer` once after `delay`.
    fn set_timeout(&mut self, timer: Timer, delay: Duration);

    /// Fire `timer` every `period` until cleared.
    fn set_interval(&mut self, timer: Timer, period: Duration);

    /// Cancel `timer` if it is pending. Clearing an idle timer is a no-op.
    fn clear(&mut self, timer: Timer);
}
