//! The sync session: one per editor instance.
//!
//! A `SyncSession` ties the lifecycle manager, style injector, placeholder
//! machine and height engine to the host's declarative state. It owns no
//! platform objects; the surface and scheduler are passed into every call,
//! which keeps it usable from timer and listener callbacks that may run
//! after the host has swapped the frame out.
//!
//! # Ordering
//!
//! Every reconciliation runs readiness → style → content → placeholder →
//! height, and re-reads all current state, so overlapping updates resolve to
//! the latest one.

use std::time::Duration;

use crate::config::SyncConfig;
use crate::events::{Dispatch, EventOutcome};
use crate::height::{HeightEngine, HeightProbe, HeightUpdate};
use crate::lifecycle::{DocumentLifecycle, Readiness, ReadyCheck, RetryPolicy};
use crate::placeholder::{PlaceholderMachine, Transition};
use crate::props::HostProps;
use crate::style::{StyleId, StyleInjector};
use crate::surface::{Scheduler, Surface};
use crate::types::{ExternalState, FrameEventKind, PendingTimers, Timer};

#[cfg(test)]
mod tests;

/// Where a session is in its own lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, heartbeat not started.
    #[default]
    Idle,
    Mounted,
    /// All timers cancelled. Every entry point is a no-op from here on.
    TornDown,
}

/// What one reconciliation did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// The surface passed its readiness check.
    pub ready: bool,
    /// Delay of the retry scheduled because the surface was not ready, or
    /// because an overwrite was deferred.
    pub retry: Option<Duration>,
    /// A new document was configured during this run.
    pub fresh_document: bool,
    pub style_replaced: bool,
    pub content_written: bool,
    /// The overwrite was skipped because an IME composition was active.
    pub deferred_for_composition: bool,
    pub placeholder: Option<Transition>,
    pub height: Option<HeightUpdate>,
}

impl ReconcileOutcome {
    /// Whether anything in the document or frame was written.
    pub fn mutated(&self) -> bool {
        self.fresh_document
            || self.style_replaced
            || self.content_written
            || self.placeholder.is_some()
            || matches!(self.height, Some(HeightUpdate::Applied(_)))
    }
}

/// What a fired timer did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerOutcome {
    /// The session is torn down; nothing was touched.
    Ignored,
    Reconciled(ReconcileOutcome),
    Height(HeightUpdate),
}

/// Per-instance synchronization state.
#[derive(Debug)]
pub struct SyncSession<P> {
    config: SyncConfig,
    phase: Phase,
    focused: bool,
    lifecycle: DocumentLifecycle,
    style: StyleInjector,
    placeholder: PlaceholderMachine,
    height: HeightEngine<P>,
    pending: PendingTimers,
}

impl<P> SyncSession<P> {
    /// Create a session. `style_token` must be unique per instance; the
    /// platform layer usually derives it from a random number.
    pub fn new(config: SyncConfig, style_token: &str, probe: P) -> Self {
        let style = StyleInjector::new(StyleId::new(&config.style_id_prefix, style_token));
        let lifecycle = DocumentLifecycle::new(RetryPolicy::from_config(&config));
        Self {
            config,
            phase: Phase::Idle,
            focused: false,
            lifecycle,
            style,
            placeholder: PlaceholderMachine::default(),
            height: HeightEngine::new(probe),
            pending: PendingTimers::default(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_torn_down(&self) -> bool {
        self.phase == Phase::TornDown
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_placeholder_showing(&self) -> bool {
        self.placeholder.is_showing()
    }

    /// Consecutive failed readiness checks.
    pub fn retries(&self) -> u32 {
        self.lifecycle.retries()
    }

    pub fn style_id(&self) -> &StyleId {
        self.style.id()
    }

    pub fn stylesheet_applied(&self) -> Option<&str> {
        self.style.applied()
    }

    pub fn pending(&self) -> PendingTimers {
        self.pending
    }

    pub fn height_engine(&self) -> &HeightEngine<P> {
        &self.height
    }

    /// Start the height heartbeat. Only the first call has an effect.
    pub fn mount<Sch: Scheduler + ?Sized>(&mut self, scheduler: &mut Sch) {
        if self.phase != Phase::Idle {
            return;
        }
        self.phase = Phase::Mounted;
        scheduler.set_interval(Timer::Heartbeat, self.config.heartbeat());
        self.pending.heartbeat = true;
        tracing::debug!(style_id = %self.style.id(), "sync session mounted");
    }

    /// Cancel every timer and refuse all further work.
    pub fn teardown<Sch: Scheduler + ?Sized>(&mut self, scheduler: &mut Sch) {
        for timer in Timer::ALL {
            scheduler.clear(timer);
        }
        self.pending = PendingTimers::default();
        self.phase = Phase::TornDown;
        tracing::debug!(style_id = %self.style.id(), "sync session torn down");
    }

    /// Content as the host should see it, with a placeholder substitution
    /// reported as the empty value. `None` while the surface is detached.
    pub fn value<S: Surface + ?Sized>(&self, surface: &S) -> Option<String> {
        let live = surface.content()?;
        Some(self.placeholder.logical_content(&live).to_owned())
    }

    /// Bring the surface in line with `state`.
    pub fn reconcile<S, Sch>(
        &mut self,
        surface: &mut S,
        state: &ExternalState,
        scheduler: &mut Sch,
    ) -> ReconcileOutcome
    where
        S: Surface + ?Sized,
        Sch: Scheduler + ?Sized,
        P: HeightProbe<S>,
    {
        let mut outcome = ReconcileOutcome::default();
        if self.is_torn_down() {
            tracing::trace!("reconcile after teardown ignored");
            return outcome;
        }

        self.cancel(scheduler, Timer::Retry);
        match self.lifecycle.ensure_ready(surface) {
            ReadyCheck::Retry { delay, .. } => {
                self.schedule(scheduler, Timer::Retry, delay);
                outcome.retry = Some(delay);
                return outcome;
            }
            ReadyCheck::Ready { fresh } => {
                if fresh {
                    // Style element and placeholder text died with the old document.
                    self.style.forget();
                    self.placeholder.reset();
                    outcome.fresh_document = true;
                }
            }
        }
        outcome.ready = true;

        match self.style.apply(surface, state.stylesheet()) {
            Ok(replaced) => outcome.style_replaced = replaced,
            Err(err) => tracing::warn!(error = %err, "failed to inject stylesheet"),
        }

        let desired = state.desired_content();
        if let Some(live) = surface.content() {
            let current = self.placeholder.logical_content(&live);
            if current != desired {
                if self.config.defer_while_composing && surface.is_composing() {
                    let delay = self.lifecycle.policy().slow;
                    tracing::debug!("content overwrite deferred during composition");
                    self.schedule(scheduler, Timer::Retry, delay);
                    outcome.deferred_for_composition = true;
                    outcome.retry = Some(delay);
                } else {
                    match surface.set_content(desired) {
                        Ok(()) => {
                            tracing::trace!(len = desired.len(), "overwrote editable content");
                            outcome.content_written = true;
                        }
                        Err(err) => tracing::warn!(error = %err, "failed to write content"),
                    }
                }
            }
        }

        match self
            .placeholder
            .sync(surface, state.placeholder(), self.focused)
        {
            Ok(transition) => outcome.placeholder = transition,
            Err(err) => tracing::warn!(error = %err, "failed to update placeholder"),
        }

        outcome.height = Some(self.update_height(surface, scheduler));
        outcome
    }

    /// Route a fired timer.
    pub fn on_timer<S, Sch>(
        &mut self,
        timer: Timer,
        surface: &mut S,
        state: &ExternalState,
        scheduler: &mut Sch,
    ) -> TimerOutcome
    where
        S: Surface + ?Sized,
        Sch: Scheduler + ?Sized,
        P: HeightProbe<S>,
    {
        if self.is_torn_down() {
            return TimerOutcome::Ignored;
        }
        if timer != Timer::Heartbeat {
            self.pending.set(timer, false);
        }
        match timer {
            Timer::Retry => TimerOutcome::Reconciled(self.reconcile(surface, state, scheduler)),
            // A document replaced behind our back (frame navigated) lost its
            // configuration and listeners; nothing else would notice.
            Timer::Heartbeat
                if matches!(
                    surface.readiness(),
                    Readiness::Blank | Readiness::Unconfigured
                ) =>
            {
                tracing::debug!("heartbeat found an unconfigured document");
                TimerOutcome::Reconciled(self.reconcile(surface, state, scheduler))
            }
            Timer::HeightDebounce | Timer::Heartbeat => {
                TimerOutcome::Height(self.update_height(surface, scheduler))
            }
        }
    }

    /// Handle an interaction event from inside the sandbox.
    ///
    /// Focus and placeholder state are updated before this returns; the
    /// caller performs the returned outcome.
    pub fn handle_event<'h, S, Sch, H>(
        &mut self,
        kind: FrameEventKind,
        surface: &mut S,
        props: &'h HostProps<H>,
        scheduler: &mut Sch,
    ) -> EventOutcome<'h, H>
    where
        S: Surface + ?Sized,
        Sch: Scheduler + ?Sized,
    {
        if self.is_torn_down() {
            return EventOutcome::none();
        }

        if kind.is_focus_change() {
            self.focused = kind == FrameEventKind::Focus;
            if let Err(err) =
                self.placeholder
                    .sync(surface, props.state.placeholder(), self.focused)
            {
                tracing::warn!(error = %err, %kind, "failed to update placeholder");
            }
        }

        let dispatch = props.handlers.find(kind).map(|handler| Dispatch {
            handler,
            kind,
            value: self.value(surface).unwrap_or_default(),
        });

        if !self.pending.height_debounce {
            self.schedule(scheduler, Timer::HeightDebounce, self.config.height_debounce());
        }

        EventOutcome {
            refocus: kind == FrameEventKind::Focus,
            dispatch,
        }
    }

    /// Ask for a debounced height recompute, replacing a pending one. Used
    /// for load and scroll inside the sandbox.
    pub fn request_height_check<Sch: Scheduler + ?Sized>(&mut self, scheduler: &mut Sch) {
        if self.is_torn_down() {
            return;
        }
        self.schedule(scheduler, Timer::HeightDebounce, self.config.height_debounce());
    }

    /// Measure now and apply the frame height. Cancels a pending debounce,
    /// since this run covers it.
    pub fn update_height<S, Sch>(&mut self, surface: &mut S, scheduler: &mut Sch) -> HeightUpdate
    where
        S: Surface + ?Sized,
        Sch: Scheduler + ?Sized,
        P: HeightProbe<S>,
    {
        self.cancel(scheduler, Timer::HeightDebounce);
        self.height.update(surface)
    }

    fn schedule<Sch: Scheduler + ?Sized>(&mut self, scheduler: &mut Sch, timer: Timer, delay: Duration) {
        scheduler.set_timeout(timer, delay);
        self.pending.set(timer, true);
    }

    fn cancel<Sch: Scheduler + ?Sized>(&mut self, scheduler: &mut Sch, timer: Timer) {
        if self.pending.is_pending(timer) {
            scheduler.clear(timer);
            self.pending.set(timer, false);
        }
    }
}
