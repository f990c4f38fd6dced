//! `FrameEditor`: a mounted editor instance in the browser.
//!
//! Owns the sync session, the iframe surface and the timers behind an
//! `Rc<RefCell<_>>`. Timer and listener callbacks hold `Weak` references and
//! do nothing once the editor is gone. Host handlers and focus calls always
//! run after the borrow is released, since both can re-enter the editor
//! through events fired synchronously inside the frame. Props that arrive
//! while the state is borrowed anyway are parked and picked up by the next
//! callback that gets the borrow.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsValue;
use web_sys::{Element, EventTarget};

use richtextarea_core::{
    FrameEventKind, HostProps, ReconcileOutcome, SyncConfig, SyncSession, Timer, TimerOutcome,
    commands,
};

use crate::probe::SentinelProbe;
use crate::scheduler::TimerScheduler;
use crate::shell::apply_attributes;
use crate::surface::{FrameSignal, IframeSurface};

/// Payload delivered to host handlers.
#[derive(Debug, Clone)]
pub struct FrameEvent {
    /// Editable content, with a placeholder substitution reported as `<br>`.
    pub value: String,
    pub kind: FrameEventKind,
    /// The editable root, or the raw event target when it is gone.
    pub target: Option<EventTarget>,
    /// The wrapper element, which stands in for the editor instance since
    /// it is the node the host rendered and holds.
    pub current_target: Option<EventTarget>,
}

/// A host-side event callback.
pub trait HostHandler: Clone + PartialEq + 'static {
    fn handle(&self, event: FrameEvent);
}

struct Inner<H> {
    session: SyncSession<SentinelProbe>,
    surface: IframeSurface,
    scheduler: TimerScheduler,
    props: HostProps<H>,
    wrapper_focus: Option<EventListener>,
}

struct Shared<H> {
    state: RefCell<Inner<H>>,
    /// Props handed to `update` while `state` was borrowed.
    pending: RefCell<Option<HostProps<H>>>,
}

/// A mounted editor. Handles are cheap to clone; dropping the last one
/// cancels all timers and listeners.
#[derive(Clone)]
pub struct FrameEditor<H: HostHandler> {
    shared: Rc<Shared<H>>,
    base: Element,
}

impl<H: HostHandler> FrameEditor<H> {
    /// Take over `base` (a wrapper holding one iframe), start the heartbeat
    /// and run the first reconciliation.
    pub fn mount(base: Element, props: HostProps<H>, config: SyncConfig) -> Self {
        // Distinguishes this instance's style element from other editors'.
        let token = format!("{:x}", (js_sys::Math::random() * f64::from(u32::MAX)) as u64);
        let shared = Rc::new_cyclic(|weak: &Weak<Shared<H>>| {
            let on_signal = {
                let weak = weak.clone();
                Rc::new(move |signal| on_signal(&weak, signal)) as Rc<dyn Fn(FrameSignal)>
            };
            let on_fire = {
                let weak = weak.clone();
                Rc::new(move |timer| on_timer(&weak, timer)) as Rc<dyn Fn(Timer)>
            };
            Shared {
                state: RefCell::new(Inner {
                    session: SyncSession::new(config, &token, SentinelProbe::new()),
                    surface: IframeSurface::new(base.clone(), on_signal),
                    scheduler: TimerScheduler::new(on_fire),
                    props,
                    wrapper_focus: None,
                }),
                pending: RefCell::new(None),
            }
        });

        let wrapper_focus = {
            let weak = Rc::downgrade(&shared);
            EventListener::new_with_options(
                &base,
                "focus",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    if let Some(shared) = weak.upgrade() {
                        focus_root(&shared);
                    }
                },
            )
        };

        {
            let mut guard = shared.state.borrow_mut();
            let state = &mut *guard;
            state.wrapper_focus = Some(wrapper_focus);
            state.session.mount(&mut state.scheduler);
            tracing::debug!(style_id = %state.session.style_id(), "frame editor mounted");
        }

        let editor = Self { shared, base };
        editor.reconcile();
        editor
    }

    pub fn base(&self) -> &Element {
        &self.base
    }

    pub fn is_mounted(&self) -> bool {
        self.shared
            .state
            .try_borrow()
            .is_ok_and(|inner| !inner.session.is_torn_down())
    }

    /// Apply new host props. Returns whether wrapper attributes or handlers
    /// changed, i.e. whether a host that renders its own markup has to
    /// re-render it. Passthrough attributes on the wrapper are updated here
    /// either way.
    ///
    /// When the editor is busy the props are parked until the callback
    /// holding it finishes, and the result is `true` since the comparison
    /// cannot be made yet.
    pub fn update(&self, props: HostProps<H>) -> Result<bool, JsValue> {
        let rerender = {
            let Ok(mut inner) = self.shared.state.try_borrow_mut() else {
                tracing::debug!("update while the editor is busy, deferred");
                *self.shared.pending.borrow_mut() = Some(props);
                return Ok(true);
            };
            // Newer props supersede anything parked earlier.
            self.shared.pending.borrow_mut().take();
            swap_props(&mut inner, props)?
        };
        self.reconcile();
        Ok(rerender)
    }

    /// Reconcile the frame with the current props.
    pub fn reconcile(&self) -> ReconcileOutcome {
        reconcile_shared(&self.shared)
    }

    /// Stop all timers and listeners. The editor does nothing afterwards.
    pub fn unmount(&self) {
        let Ok(mut guard) = self.shared.state.try_borrow_mut() else {
            tracing::warn!("unmount while the editor is busy, skipped");
            return;
        };
        let state = &mut *guard;
        state.session.teardown(&mut state.scheduler);
        state.scheduler.clear_all();
        state.surface.unbind();
        state.wrapper_focus = None;
        self.shared.pending.borrow_mut().take();
    }

    /// Move focus into the editable root.
    pub fn focus(&self) -> bool {
        focus_root(&self.shared)
    }

    /// Current value, with a placeholder substitution reported as `<br>`.
    pub fn value(&self) -> Option<String> {
        let inner = self.shared.state.try_borrow().ok()?;
        inner.session.value(&inner.surface)
    }

    /// Whether props are parked waiting for the editor to become free.
    pub fn has_pending_update(&self) -> bool {
        self.shared.pending.borrow().is_some()
    }

    pub fn exec_command(&self, name: &str, show_ui: bool, value: &str) -> Option<bool> {
        let surface = self.shared_surface()?;
        commands::exec_command(&surface, name, show_ui, value)
    }

    pub fn query_command_state(&self, name: &str) -> Option<bool> {
        let surface = self.shared_surface()?;
        commands::query_command_state(&surface, name)
    }

    pub fn query_command_value(&self, name: &str) -> Option<String> {
        let surface = self.shared_surface()?;
        commands::query_command_value(&surface, name)
    }

    /// A listener-free handle on the frame, used outside the borrow so that
    /// input events fired by a command reach the bridge.
    fn shared_surface(&self) -> Option<IframeSurface> {
        self.shared
            .state
            .try_borrow()
            .ok()
            .map(|inner| inner.surface.share())
    }
}

/// Swap in `props`, updating wrapper attributes when they changed.
fn swap_props<H: HostHandler>(inner: &mut Inner<H>, props: HostProps<H>) -> Result<bool, JsValue> {
    let rerender = props.requires_rerender(&inner.props);
    if rerender {
        apply_attributes(
            inner.surface.base(),
            &inner.props.attributes,
            &props.attributes,
        )?;
    }
    inner.props = props;
    Ok(rerender)
}

/// Take over props parked by a busy `update`. Returns whether there were any.
fn adopt_pending<H: HostHandler>(
    pending: &RefCell<Option<HostProps<H>>>,
    inner: &mut Inner<H>,
) -> bool {
    let Some(props) = pending.borrow_mut().take() else {
        return false;
    };
    if let Err(err) = swap_props(inner, props) {
        tracing::warn!(error = ?err, "failed to apply deferred wrapper attributes");
    }
    true
}

fn reconcile_shared<H: HostHandler>(shared: &Shared<H>) -> ReconcileOutcome {
    let Ok(mut guard) = shared.state.try_borrow_mut() else {
        tracing::debug!("re-entrant reconcile skipped");
        return ReconcileOutcome::default();
    };
    let state = &mut *guard;
    adopt_pending(&shared.pending, state);
    state
        .session
        .reconcile(&mut state.surface, &state.props.state, &mut state.scheduler)
}

fn focus_root<H>(shared: &Shared<H>) -> bool {
    let surface = match shared.state.try_borrow() {
        Ok(inner) => inner.surface.share(),
        Err(_) => return false,
    };
    richtextarea_core::Surface::focus_editable(&surface)
}

fn on_timer<H: HostHandler>(weak: &Weak<Shared<H>>, timer: Timer) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let Ok(mut guard) = shared.state.try_borrow_mut() else {
        tracing::debug!(?timer, "timer fired while the editor is busy, skipped");
        return;
    };
    let state = &mut *guard;
    let adopted = adopt_pending(&shared.pending, state);
    let outcome = state.session.on_timer(
        timer,
        &mut state.surface,
        &state.props.state,
        &mut state.scheduler,
    );
    if adopted && !matches!(outcome, TimerOutcome::Reconciled(_)) {
        state
            .session
            .reconcile(&mut state.surface, &state.props.state, &mut state.scheduler);
    }
}

fn on_signal<H: HostHandler>(weak: &Weak<Shared<H>>, signal: FrameSignal) {
    let Some(shared) = weak.upgrade() else {
        return;
    };

    let (refocus, call) = {
        let Ok(mut guard) = shared.state.try_borrow_mut() else {
            tracing::debug!(?signal, "frame signal while the editor is busy, dropped");
            return;
        };
        let state = &mut *guard;
        match signal {
            FrameSignal::Layout => {
                state.session.request_height_check(&mut state.scheduler);
                return;
            }
            FrameSignal::Event { kind, target } => {
                let outcome = state.session.handle_event(
                    kind,
                    &mut state.surface,
                    &state.props,
                    &mut state.scheduler,
                );
                let call = outcome.dispatch.map(|dispatch| {
                    let root: Option<EventTarget> = state.surface.body().map(Into::into);
                    let event = FrameEvent {
                        value: dispatch.value,
                        kind: dispatch.kind,
                        target: root.or(target),
                        current_target: Some(state.surface.base().clone().into()),
                    };
                    (dispatch.handler.clone(), event)
                });
                let refocus = outcome.refocus.then(|| state.surface.share());
                (refocus, call)
            }
        }
    };

    if let Some(surface) = refocus {
        richtextarea_core::Surface::focus_editable(&surface);
    }
    if let Some((handler, event)) = call {
        handler.handle(event);
    }
    if shared.pending.borrow().is_some() {
        reconcile_shared(&shared);
    }
}
