//! richtextarea-core: Pure Rust synchronization engine for an iframe-hosted
//! rich-text editor, without DOM or framework dependencies.
//!
//! This crate provides:
//! - `Surface`, `Scheduler` and `HeightProbe` traits for platform abstraction
//! - `DocumentLifecycle` - readiness detection, one-time bootstrap, retry backoff
//! - `StyleInjector` - the single identified stylesheet inside the sandbox
//! - `PlaceholderMachine` - placeholder emulation as an explicit state machine
//! - `HeightEngine` - content height measurement and frame sizing
//! - `SyncSession` - the orchestrator tying the above to host state and events

pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod height;
pub mod lifecycle;
pub mod placeholder;
pub mod props;
pub mod session;
pub mod style;
pub mod surface;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use commands::{exec_command, query_command_state, query_command_value};
pub use config::SyncConfig;
pub use error::SurfaceError;
pub use events::{Dispatch, EventOutcome, HandlerSet};
pub use height::{HeightEngine, HeightProbe, HeightUpdate};
pub use lifecycle::{DocumentLifecycle, Readiness, ReadyCheck, RetryPolicy};
pub use placeholder::{PlaceholderMachine, PlaceholderState, Transition, normalize_empty};
pub use props::{HostProps, PropKind, classify_prop};
pub use session::{Phase, ReconcileOutcome, SyncSession, TimerOutcome};
pub use smol_str::SmolStr;
pub use style::{StyleId, StyleInjector};
pub use surface::{Scheduler, Surface};
pub use types::{EMPTY_VALUE, ExternalState, FrameEventKind, PendingTimers, Timer};
