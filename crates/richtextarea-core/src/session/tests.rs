use std::time::Duration;

use super::*;
use crate::testing::{LINE_HEIGHT, LineProbe, ManualScheduler, MemorySurface};
use crate::types::EMPTY_VALUE;

struct Harness {
    session: SyncSession<LineProbe>,
    surface: MemorySurface,
    sched: ManualScheduler,
    props: HostProps<&'static str>,
}

impl Harness {
    fn new(surface: MemorySurface, state: ExternalState) -> Self {
        Self::with_config(SyncConfig::default(), surface, state)
    }

    fn with_config(config: SyncConfig, surface: MemorySurface, state: ExternalState) -> Self {
        let mut sched = ManualScheduler::default();
        let mut session = SyncSession::new(config, "t1", LineProbe);
        session.mount(&mut sched);
        Self {
            session,
            surface,
            sched,
            props: HostProps::new(state),
        }
    }

    fn reconcile(&mut self) -> ReconcileOutcome {
        self.session
            .reconcile(&mut self.surface, &self.props.state, &mut self.sched)
    }

    fn fire(&mut self) -> (Timer, TimerOutcome) {
        let timer = self.sched.fire_next().expect("a timer is pending");
        let outcome =
            self.session
                .on_timer(timer, &mut self.surface, &self.props.state, &mut self.sched);
        (timer, outcome)
    }

    fn event(&mut self, kind: FrameEventKind) -> (bool, Option<(&'static str, String)>) {
        let outcome =
            self.session
                .handle_event(kind, &mut self.surface, &self.props, &mut self.sched);
        (
            outcome.refocus,
            outcome.dispatch.map(|d| (*d.handler, d.value)),
        )
    }

    fn ops(&mut self) -> String {
        self.surface.take_ops().join(" | ")
    }

    fn content(&self) -> Option<String> {
        self.surface.content()
    }
}

fn placeholder_state() -> ExternalState {
    ExternalState::default()
        .with_placeholder("Write here")
        .with_stylesheet("body{margin:0}")
}

#[test]
fn test_mount_starts_heartbeat_once() {
    let mut h = Harness::new(MemorySurface::blank(), ExternalState::default());
    assert_eq!(h.session.phase(), Phase::Mounted);
    h.session.mount(&mut h.sched);

    assert_eq!(h.sched.history, vec![(Timer::Heartbeat, Duration::from_secs(1))]);
    assert!(h.session.pending().heartbeat);
}

#[test]
fn test_first_reconcile_bootstraps_and_fills() {
    let mut h = Harness::new(MemorySurface::blank(), placeholder_state());

    let outcome = h.reconcile();
    assert!(outcome.ready);
    assert!(outcome.fresh_document);
    assert_eq!(outcome.placeholder, Some(Transition::Show));
    insta::assert_snapshot!(
        h.ops(),
        @"bootstrap | configure | head | style=body{margin:0} | content=<br> | content=Write here | flag=true | height=20"
    );
    assert_eq!(h.surface.listener_binds, 1);
    assert_eq!(h.session.value(&h.surface).as_deref(), Some(EMPTY_VALUE));
}

#[test]
fn test_reconcile_is_idempotent() {
    let state = ExternalState::new("<p>hi</p>")
        .with_placeholder("Write here")
        .with_stylesheet("p{color:red}");
    let mut h = Harness::new(MemorySurface::blank(), state);

    h.reconcile();
    insta::assert_snapshot!(
        h.ops(),
        @"bootstrap | configure | head | style=p{color:red} | content=<p>hi</p> | height=20"
    );

    let outcome = h.reconcile();
    assert!(outcome.ready);
    assert!(!outcome.mutated());
    assert_eq!(outcome.height, Some(HeightUpdate::Unchanged(LINE_HEIGHT)));
    assert!(h.surface.ops.is_empty());
    assert_eq!(h.surface.bootstraps, 1);
}

#[test]
fn test_placeholder_is_idempotent_across_reconciles() {
    let mut h = Harness::new(MemorySurface::blank(), placeholder_state());
    h.reconcile();
    h.ops();

    for _ in 0..3 {
        let outcome = h.reconcile();
        assert!(!outcome.mutated());
    }
    assert!(h.surface.ops.is_empty());
    assert_eq!(h.content().as_deref(), Some("Write here"));
}

#[test]
fn test_placeholder_focus_round_trip() {
    let mut h = Harness::new(MemorySurface::blank(), placeholder_state());
    h.reconcile();
    h.ops();

    let (refocus, _) = h.event(FrameEventKind::Focus);
    assert!(refocus);
    assert!(h.session.is_focused());
    insta::assert_snapshot!(h.ops(), @"content=<br> | flag=false");

    // A host update while focused must not bring the placeholder back.
    let outcome = h.reconcile();
    assert_eq!(outcome.placeholder, None);
    assert!(!h.surface.placeholder_flag);

    let (refocus, _) = h.event(FrameEventKind::Blur);
    assert!(!refocus);
    insta::assert_snapshot!(h.ops(), @"content=Write here | flag=true");
}

#[test]
fn test_typed_content_suppresses_placeholder_on_blur() {
    let mut h = Harness::new(MemorySurface::blank(), placeholder_state());
    h.reconcile();
    h.event(FrameEventKind::Focus);
    h.surface.type_content("<p>typed</p>");
    h.ops();

    h.event(FrameEventKind::Blur);
    assert!(h.surface.ops.is_empty());
    assert_eq!(h.content().as_deref(), Some("<p>typed</p>"));
}

#[test]
fn test_retry_backoff_until_surface_appears() {
    let mut h = Harness::new(MemorySurface::detached(), ExternalState::new("<p>late</p>"));

    let outcome = h.reconcile();
    assert!(!outcome.ready);
    assert_eq!(outcome.retry, Some(Duration::from_millis(1)));

    for _ in 0..11 {
        let (timer, outcome) = h.fire();
        assert_eq!(timer, Timer::Retry);
        assert!(matches!(outcome, TimerOutcome::Reconciled(o) if !o.ready));
    }
    let delays = h
        .sched
        .history
        .iter()
        .filter(|(timer, _)| *timer == Timer::Retry)
        .map(|(_, delay)| delay.as_millis().to_string())
        .collect::<Vec<_>>()
        .join(",");
    insta::assert_snapshot!(delays, @"1,1,1,1,1,1,1,1,1,1,100,100");
    assert_eq!(h.session.retries(), 12);

    h.surface.attach_blank();
    let (timer, outcome) = h.fire();
    assert_eq!(timer, Timer::Retry);
    assert!(matches!(outcome, TimerOutcome::Reconciled(o) if o.ready && o.content_written));
    assert_eq!(h.session.retries(), 0);
    assert!(!h.sched.is_scheduled(Timer::Retry));
    assert_eq!(h.content().as_deref(), Some("<p>late</p>"));

    h.reconcile();
    assert_eq!(h.surface.bootstraps, 1);
}

#[test]
fn test_host_update_supersedes_pending_retry() {
    let mut h = Harness::new(MemorySurface::detached(), ExternalState::new("<p>a</p>"));
    h.reconcile();
    h.reconcile();

    let retries = h.sched.history.iter().filter(|(t, _)| *t == Timer::Retry).count();
    assert_eq!(retries, 2);
    assert!(h.session.pending().retry);

    h.surface.attach_blank();
    h.props.state = ExternalState::new("<p>b</p>");
    h.fire();
    assert_eq!(h.content().as_deref(), Some("<p>b</p>"));
}

#[test]
fn test_heartbeat_writes_height_once_for_stable_content() {
    let mut h = Harness::new(MemorySurface::blank(), ExternalState::new("<p>a</p>"));
    h.reconcile();
    h.ops();

    for _ in 0..5 {
        let (timer, outcome) = h.fire();
        assert_eq!(timer, Timer::Heartbeat);
        assert_eq!(outcome, TimerOutcome::Height(HeightUpdate::Unchanged(LINE_HEIGHT)));
    }
    assert!(h.surface.ops.is_empty());

    h.surface.type_content("<p>a</p><p>b</p><p>c</p>");
    assert_eq!(
        h.fire().1,
        TimerOutcome::Height(HeightUpdate::Applied(3 * LINE_HEIGHT))
    );
    assert_eq!(h.surface.frame_height, 3 * LINE_HEIGHT);
}

#[test]
fn test_stylesheet_replacement_keeps_one_element() {
    let mut h = Harness::new(
        MemorySurface::blank(),
        ExternalState::default().with_stylesheet("A"),
    );
    h.reconcile();
    h.ops();

    h.props.state.stylesheet = Some("B".into());
    let outcome = h.reconcile();
    assert!(outcome.style_replaced);
    insta::assert_snapshot!(h.ops(), @"remove=prtcsst1 | style=B");
    assert_eq!(h.surface.styles, vec![("prtcsst1".to_string(), "B".to_string())]);

    h.props.state.stylesheet = None;
    h.reconcile();
    assert!(h.surface.styles.is_empty());
    assert_eq!(h.session.stylesheet_applied(), None);
}

#[test]
fn test_events_forward_logical_value() {
    let mut h = Harness::new(MemorySurface::blank(), placeholder_state());
    h.props.handlers.insert("onFocus", "focus-handler");
    h.props.handlers.insert("onchange", "change-handler");
    h.reconcile();

    let (_, dispatch) = h.event(FrameEventKind::Focus);
    assert_eq!(dispatch, Some(("focus-handler", EMPTY_VALUE.to_string())));

    h.surface.type_content("<p>typed</p>");
    let (refocus, dispatch) = h.event(FrameEventKind::Change);
    assert!(!refocus);
    assert_eq!(dispatch, Some(("change-handler", "<p>typed</p>".to_string())));

    let (_, dispatch) = h.event(FrameEventKind::Input);
    assert_eq!(dispatch, None);
}

#[test]
fn test_event_debounce_is_not_extended() {
    let mut h = Harness::new(MemorySurface::blank(), ExternalState::new("<p>a</p>"));
    h.reconcile();
    h.sched.history.clear();

    for _ in 0..3 {
        h.event(FrameEventKind::Input);
    }
    assert_eq!(
        h.sched.history,
        vec![(Timer::HeightDebounce, Duration::from_millis(20))]
    );

    // Load and scroll replace the pending debounce instead.
    h.session.request_height_check(&mut h.sched);
    assert_eq!(h.sched.history.len(), 2);

    let (timer, _) = h.fire();
    assert_eq!(timer, Timer::HeightDebounce);
    assert!(!h.session.pending().height_debounce);

    h.event(FrameEventKind::Input);
    assert!(h.sched.is_scheduled(Timer::HeightDebounce));
}

#[test]
fn test_height_update_cancels_pending_debounce() {
    let mut h = Harness::new(MemorySurface::blank(), ExternalState::new("<p>a</p>"));
    h.reconcile();
    h.event(FrameEventKind::Input);
    assert!(h.sched.is_scheduled(Timer::HeightDebounce));

    h.reconcile();
    assert!(!h.sched.is_scheduled(Timer::HeightDebounce));
    assert!(!h.session.pending().height_debounce);
}

#[test]
fn test_teardown_cancels_everything() {
    let mut h = Harness::new(MemorySurface::detached(), placeholder_state());
    h.props.handlers.insert("onInput", "input-handler");
    h.reconcile();
    h.event(FrameEventKind::Input);
    assert_eq!(h.sched.pending_count(), 3);

    h.session.teardown(&mut h.sched);
    assert_eq!(h.session.phase(), Phase::TornDown);
    assert_eq!(h.sched.pending_count(), 0);
    assert!(!h.session.pending().any());

    h.surface.attach_blank();
    let outcome = h.reconcile();
    assert!(!outcome.ready);
    assert_eq!(h.event(FrameEventKind::Input), (false, None));
    assert_eq!(
        h.session
            .on_timer(Timer::Heartbeat, &mut h.surface, &h.props.state, &mut h.sched),
        TimerOutcome::Ignored
    );
    h.session.request_height_check(&mut h.sched);
    assert_eq!(h.sched.pending_count(), 0);
    assert!(h.surface.ops.is_empty());
}

#[test]
fn test_recreated_surface_is_reconfigured() {
    let state = ExternalState::new("<p>x</p>").with_stylesheet("A");
    let mut h = Harness::new(MemorySurface::blank(), state);
    h.reconcile();
    h.ops();

    h.surface.detach();
    let outcome = h.reconcile();
    assert_eq!(outcome.retry, Some(Duration::from_millis(1)));

    h.surface.attach_blank();
    let (timer, outcome) = h.fire();
    assert_eq!(timer, Timer::Retry);
    let TimerOutcome::Reconciled(outcome) = outcome else {
        panic!("expected a reconcile, got {outcome:?}");
    };
    assert!(outcome.fresh_document);
    assert!(outcome.style_replaced);
    assert!(outcome.content_written);
    insta::assert_snapshot!(h.ops(), @"bootstrap | configure | head | style=A | content=<p>x</p>");
    assert_eq!(h.surface.styles.len(), 1);
    assert_eq!(h.surface.listener_binds, 2);
}

#[test]
fn test_recreated_surface_restores_placeholder() {
    let mut h = Harness::new(MemorySurface::blank(), placeholder_state());
    h.reconcile();
    assert!(h.session.is_placeholder_showing());

    h.surface.detach();
    h.reconcile();
    h.surface.attach_blank();
    h.fire();

    assert!(h.session.is_placeholder_showing());
    assert_eq!(h.content().as_deref(), Some("Write here"));
}

#[test]
fn test_host_value_overrides_typed_content() {
    let mut h = Harness::new(MemorySurface::unconfigured("<p>a</p>"), ExternalState::new("<p>a</p>"));
    h.reconcile();
    h.surface.type_content("<p>user</p>");
    h.ops();

    h.props.state = ExternalState::new("<p>host</p>");
    assert!(h.reconcile().content_written);
    assert_eq!(h.content().as_deref(), Some("<p>host</p>"));
}

#[test]
fn test_echoed_value_is_not_rewritten() {
    let mut h = Harness::new(MemorySurface::unconfigured("<br>"), ExternalState::default());
    h.reconcile();
    h.surface.type_content("<p>typed</p>");
    h.ops();

    h.props.state = ExternalState::new("<p>typed</p>");
    let outcome = h.reconcile();
    assert!(!outcome.content_written);
    assert!(h.surface.ops.iter().all(|op| !op.starts_with("content=")));
}

#[test]
fn test_composition_overwrites_by_default() {
    let mut h = Harness::new(MemorySurface::unconfigured("<p>a</p>"), ExternalState::new("<p>a</p>"));
    h.reconcile();
    h.surface.type_content("<p>a</p><p>ka</p>");
    h.surface.composing = true;

    let outcome = h.reconcile();
    assert!(outcome.content_written);
    assert!(!outcome.deferred_for_composition);
}

#[test]
fn test_composition_defers_overwrite_when_enabled() {
    let config = SyncConfig {
        defer_while_composing: true,
        ..SyncConfig::default()
    };
    let mut h = Harness::with_config(
        config,
        MemorySurface::unconfigured("<p>a</p>"),
        ExternalState::new("<p>a</p>"),
    );
    h.reconcile();
    h.surface.type_content("<p>a</p><p>ka</p>");
    h.surface.composing = true;
    h.ops();

    let outcome = h.reconcile();
    assert!(outcome.deferred_for_composition);
    assert!(!outcome.content_written);
    assert_eq!(outcome.retry, Some(Duration::from_millis(100)));
    assert_eq!(h.content().as_deref(), Some("<p>a</p><p>ka</p>"));

    // The host catches up before the retry fires.
    h.surface.composing = false;
    h.props.state = ExternalState::new("<p>a</p><p>ka</p>");
    let (timer, outcome) = h.fire();
    assert_eq!(timer, Timer::Retry);
    assert!(matches!(outcome, TimerOutcome::Reconciled(o) if !o.content_written));
    assert_eq!(h.content().as_deref(), Some("<p>a</p><p>ka</p>"));
}

#[test]
fn test_failed_listener_bind_retries() {
    let mut surface = MemorySurface::blank();
    surface.fail_bind = true;
    let mut h = Harness::new(surface, ExternalState::default());

    let outcome = h.reconcile();
    assert!(!outcome.ready);
    assert!(h.sched.is_scheduled(Timer::Retry));

    h.surface.fail_bind = false;
    let (_, outcome) = h.fire();
    assert!(matches!(outcome, TimerOutcome::Reconciled(o) if o.ready && o.fresh_document));
    assert_eq!(h.surface.bootstraps, 1);
}

#[test]
fn test_heartbeat_reconfigures_replaced_document() {
    let mut h = Harness::new(MemorySurface::blank(), ExternalState::new("<p>x</p>"));
    h.reconcile();

    // Frame navigated: the document is new and unconfigured.
    h.surface.attach_blank();
    let (timer, outcome) = h.fire();
    assert_eq!(timer, Timer::Heartbeat);
    assert!(matches!(outcome, TimerOutcome::Reconciled(o) if o.fresh_document && o.content_written));
    assert_eq!(h.content().as_deref(), Some("<p>x</p>"));
}
