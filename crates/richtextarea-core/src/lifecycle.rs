//! Document lifecycle: readiness detection, one-time bootstrap, and retry
//! backoff.
//!
//! The sandbox document gives no reliable "ready" signal, and the host may
//! tear the frame down and recreate it at any time. Every reconciliation
//! therefore starts with [`DocumentLifecycle::ensure_ready`], which either
//! brings the document to an editable state or tells the caller how long to
//! wait before trying again.

use std::time::Duration;

use crate::config::SyncConfig;
use crate::error::SurfaceError;
use crate::surface::Surface;

/// How far the sandbox document is on the way to being editable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// No frame, or the frame has no document yet.
    Detached,
    /// A document exists but has no body.
    Blank,
    /// A body exists but has not been configured for editing.
    Unconfigured,
    /// The body carries the initialization marker.
    Ready,
}

/// Backoff schedule for failed readiness checks.
///
/// Fast retries cover the usual case of a host that is a tick away from
/// mounting the frame; after that the delay escalates and stays there. There
/// is no upper bound on attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub fast: Duration,
    pub fast_attempts: u32,
    pub slow: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            fast: Duration::from_millis(config.retry_fast_ms.into()),
            fast_attempts: config.retry_fast_attempts,
            slow: Duration::from_millis(config.retry_slow_ms.into()),
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt > self.fast_attempts {
            self.slow
        } else {
            self.fast
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}

/// Result of a readiness check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadyCheck {
    /// The document is editable. `fresh` is set when this check configured
    /// a new document, so per-document state from before is gone.
    Ready { fresh: bool },
    /// The document is not usable yet; check again after `delay`.
    Retry { attempt: u32, delay: Duration },
}

impl ReadyCheck {
    pub fn is_ready(&self) -> bool {
        matches!(self, ReadyCheck::Ready { .. })
    }
}

/// Tracks consecutive failed readiness checks for one session.
#[derive(Clone, Debug, Default)]
pub struct DocumentLifecycle {
    policy: RetryPolicy,
    retries: u32,
}

impl DocumentLifecycle {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy, retries: 0 }
    }

    /// Consecutive failed checks since the last success.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Bring the surface to an editable state, or compute the next retry.
    pub fn ensure_ready<S: Surface + ?Sized>(&mut self, surface: &mut S) -> ReadyCheck {
        match prepare(surface) {
            Ok(fresh) => {
                if self.retries > 0 {
                    tracing::debug!(
                        retries = self.retries,
                        fresh,
                        "sandbox document became ready"
                    );
                }
                self.retries = 0;
                ReadyCheck::Ready { fresh }
            }
            Err(err) => {
                self.retries = self.retries.saturating_add(1);
                let delay = self.policy.delay(self.retries);
                if err != SurfaceError::Detached {
                    tracing::warn!(error = %err, "failed to prepare sandbox document");
                }
                tracing::trace!(
                    attempt = self.retries,
                    delay_ms = delay.as_millis() as u64,
                    "sandbox document not ready, retrying"
                );
                ReadyCheck::Retry {
                    attempt: self.retries,
                    delay,
                }
            }
        }
    }
}

/// Returns whether a new document was configured.
fn prepare<S: Surface + ?Sized>(surface: &mut S) -> Result<bool, SurfaceError> {
    match surface.readiness() {
        Readiness::Ready => Ok(false),
        Readiness::Detached => Err(SurfaceError::Detached),
        Readiness::Blank => {
            tracing::debug!("bootstrapping empty sandbox document");
            surface.bootstrap()?;
            configure(surface)
        }
        Readiness::Unconfigured => configure(surface),
    }
}

fn configure<S: Surface + ?Sized>(surface: &mut S) -> Result<bool, SurfaceError> {
    // The marker goes on last, so a failed bind is retried on the next check.
    surface.bind_listeners()?;
    surface.configure()?;
    Ok(true)
}
