//! In-memory platform fakes for exercising the sync engine without a DOM.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::SurfaceError;
use crate::height::HeightProbe;
use crate::lifecycle::Readiness;
use crate::surface::{Scheduler, Surface};
use crate::types::Timer;

#[derive(Debug, Clone)]
struct Body {
    html: String,
    initialized: bool,
}

/// Fake sandbox that journals every mutation in `ops`.
#[derive(Debug, Clone)]
pub(crate) struct MemorySurface {
    attached: bool,
    body: Option<Body>,
    head: bool,
    /// `(id, text)` of style elements in the head, in document order.
    pub styles: Vec<(String, String)>,
    pub frame_height: i32,
    pub placeholder_flag: bool,
    pub composing: bool,
    pub fail_bind: bool,
    pub bootstraps: u32,
    pub listener_binds: u32,
    pub ops: Vec<String>,
}

impl MemorySurface {
    fn with_body(attached: bool, body: Option<Body>) -> Self {
        Self {
            attached,
            body,
            head: false,
            styles: Vec::new(),
            frame_height: 0,
            placeholder_flag: false,
            composing: false,
            fail_bind: false,
            bootstraps: 0,
            listener_binds: 0,
            ops: Vec::new(),
        }
    }

    /// Host has not mounted the frame yet.
    pub fn detached() -> Self {
        Self::with_body(false, None)
    }

    /// Frame mounted, document has no body.
    pub fn blank() -> Self {
        Self::with_body(true, None)
    }

    /// Frame mounted with an unconfigured body holding `html`.
    pub fn unconfigured(html: &str) -> Self {
        Self::with_body(
            true,
            Some(Body {
                html: html.to_string(),
                initialized: false,
            }),
        )
    }

    /// Mount a fresh frame with a blank document, as a host re-render would.
    pub fn attach_blank(&mut self) {
        self.attached = true;
        self.body = None;
        self.head = false;
        self.styles.clear();
    }

    /// Tear the frame down.
    pub fn detach(&mut self) {
        self.attached = false;
        self.body = None;
        self.head = false;
        self.styles.clear();
    }

    /// Simulate the user typing into the editable root.
    pub fn type_content(&mut self, html: &str) {
        if let Some(body) = self.body.as_mut() {
            body.html = html.to_string();
        }
    }

    pub fn take_ops(&mut self) -> Vec<String> {
        std::mem::take(&mut self.ops)
    }

    fn body_mut(&mut self) -> Result<&mut Body, SurfaceError> {
        if !self.attached {
            return Err(SurfaceError::Detached);
        }
        self.body.as_mut().ok_or(SurfaceError::Detached)
    }
}

impl Surface for MemorySurface {
    fn readiness(&self) -> Readiness {
        match (self.attached, &self.body) {
            (false, _) => Readiness::Detached,
            (true, None) => Readiness::Blank,
            (true, Some(body)) if !body.initialized => Readiness::Unconfigured,
            (true, Some(_)) => Readiness::Ready,
        }
    }

    fn bootstrap(&mut self) -> Result<(), SurfaceError> {
        if !self.attached {
            return Err(SurfaceError::Detached);
        }
        self.body = Some(Body {
            html: String::new(),
            initialized: false,
        });
        self.bootstraps += 1;
        self.ops.push("bootstrap".into());
        Ok(())
    }

    fn configure(&mut self) -> Result<(), SurfaceError> {
        self.body_mut()?.initialized = true;
        self.ops.push("configure".into());
        Ok(())
    }

    fn bind_listeners(&mut self) -> Result<(), SurfaceError> {
        if self.fail_bind {
            return Err(SurfaceError::Dom("listener rejected".into()));
        }
        self.body_mut()?;
        self.listener_binds += 1;
        Ok(())
    }

    fn content(&self) -> Option<String> {
        if !self.attached {
            return None;
        }
        self.body.as_ref().map(|b| b.html.clone())
    }

    fn set_content(&mut self, html: &str) -> Result<(), SurfaceError> {
        self.body_mut()?.html = html.to_string();
        self.ops.push(format!("content={html}"));
        Ok(())
    }

    fn remove_element(&mut self, id: &str) -> bool {
        let before = self.styles.len();
        self.styles.retain(|(style_id, _)| style_id != id);
        let removed = self.styles.len() != before;
        if removed {
            self.ops.push(format!("remove={id}"));
        }
        removed
    }

    fn ensure_head(&mut self) -> Result<(), SurfaceError> {
        self.body_mut()?;
        if !self.head {
            self.head = true;
            self.ops.push("head".into());
        }
        Ok(())
    }

    fn append_style(&mut self, id: &str, text: &str) -> Result<(), SurfaceError> {
        self.body_mut()?;
        self.styles.push((id.to_string(), text.to_string()));
        self.ops.push(format!("style={text}"));
        Ok(())
    }

    fn frame_height(&self) -> Option<i32> {
        self.attached.then_some(self.frame_height)
    }

    fn set_frame_height(&mut self, px: i32) -> Result<(), SurfaceError> {
        if !self.attached {
            return Err(SurfaceError::Detached);
        }
        self.frame_height = px;
        self.ops.push(format!("height={px}"));
        Ok(())
    }

    fn set_placeholder_flag(&mut self, showing: bool) -> Result<(), SurfaceError> {
        self.placeholder_flag = showing;
        self.ops.push(format!("flag={showing}"));
        Ok(())
    }

    fn focus_editable(&self) -> bool {
        self.attached && self.body.is_some()
    }

    fn is_composing(&self) -> bool {
        self.composing
    }

    fn exec_command(&self, name: &str, _show_ui: bool, value: &str) -> Result<bool, SurfaceError> {
        if !self.attached || self.body.is_none() {
            return Err(SurfaceError::Detached);
        }
        Ok(name == "bold" && value.is_empty())
    }

    fn query_command_state(&self, name: &str) -> Result<bool, SurfaceError> {
        if !self.attached {
            return Err(SurfaceError::Detached);
        }
        Ok(name == "bold")
    }

    fn query_command_value(&self, name: &str) -> Result<String, SurfaceError> {
        if !self.attached {
            return Err(SurfaceError::Detached);
        }
        Ok(format!("{name}-value"))
    }
}

/// Measures 20px per line-producing tag, with a one-line minimum.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineProbe;

pub(crate) const LINE_HEIGHT: i32 = 20;

impl HeightProbe<MemorySurface> for LineProbe {
    fn measure(&self, surface: &MemorySurface) -> Option<i32> {
        let html = surface.content()?;
        let lines = ["<br", "<p", "<div"]
            .iter()
            .map(|tag| html.matches(tag).count())
            .sum::<usize>()
            .max(1);
        Some(lines as i32 * LINE_HEIGHT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scheduled {
    due: Duration,
    period: Option<Duration>,
}

/// Virtual-clock scheduler. Timers only fire when a test asks.
#[derive(Debug, Default)]
pub(crate) struct ManualScheduler {
    now: Duration,
    timers: HashMap<Timer, Scheduled>,
    /// Every `(timer, delay)` ever scheduled, in order.
    pub history: Vec<(Timer, Duration)>,
}

impl ManualScheduler {
    pub fn is_scheduled(&self, timer: Timer) -> bool {
        self.timers.contains_key(&timer)
    }

    pub fn delay_of(&self, timer: Timer) -> Option<Duration> {
        self.timers.get(&timer).map(|s| s.due - self.now)
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    /// Advance the clock to the earliest pending timer and return it.
    /// Interval timers are re-armed; one-shot timers are dropped.
    pub fn fire_next(&mut self) -> Option<Timer> {
        let (&timer, &scheduled) = self
            .timers
            .iter()
            .min_by_key(|(timer, s)| (s.due, Timer::ALL.iter().position(|t| t == *timer)))?;
        self.now = scheduled.due;
        match scheduled.period {
            Some(period) => {
                self.timers.insert(
                    timer,
                    Scheduled {
                        due: scheduled.due + period,
                        period: Some(period),
                    },
                );
            }
            None => {
                self.timers.remove(&timer);
            }
        }
        Some(timer)
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&mut self, timer: Timer, delay: Duration) {
        self.history.push((timer, delay));
        self.timers.insert(
            timer,
            Scheduled {
                due: self.now + delay,
                period: None,
            },
        );
    }

    fn set_interval(&mut self, timer: Timer, period: Duration) {
        self.history.push((timer, period));
        self.timers.insert(
            timer,
            Scheduled {
                due: self.now + period,
                period: Some(period),
            },
        );
    }

    fn clear(&mut self, timer: Timer) {
        self.timers.remove(&timer);
    }
}
