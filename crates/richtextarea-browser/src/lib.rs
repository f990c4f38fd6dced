//! Browser DOM layer for the richtextarea editor.
//!
//! This crate implements the platform traits of `richtextarea-core` over a
//! real `<iframe>`. It assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `surface`: `IframeSurface`, the sandbox document located through its wrapper
//! - `probe`: sentinel-based content height measurement
//! - `scheduler`: `gloo-timers` backed `Scheduler`
//! - `shell`: wrapper and iframe markup for hosts without their own renderer
//! - `editor`: `FrameEditor`, the mounted controller tying it all together
//!
//! # Re-exports
//!
//! This crate re-exports `richtextarea-core` for convenience, so consumers
//! only need to depend on `richtextarea-browser`.

// Re-export core crate
pub use richtextarea_core;
pub use richtextarea_core::*;

pub mod editor;
pub mod probe;
pub mod scheduler;
pub mod shell;
pub mod surface;

pub use editor::{FrameEditor, FrameEvent, HostHandler};
pub use probe::SentinelProbe;
pub use scheduler::TimerScheduler;
pub use shell::{SHELL_CLASS, SHELL_TAG, apply_attributes, render_shell, render_shell_in_page};
pub use surface::{FrameSignal, INIT_MARKER, IframeSurface, PLACEHOLDER_ATTR};
