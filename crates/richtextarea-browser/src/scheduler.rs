//! [`Scheduler`] over browser timers.

use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::{Interval, Timeout};

use richtextarea_core::{Scheduler, Timer};

enum Handle {
    // Held only so that dropping cancels them.
    Once(#[allow(dead_code)] Timeout),
    Every(#[allow(dead_code)] Interval),
}

/// Browser timers keyed by [`Timer`]. Dropping the scheduler, or replacing
/// or clearing a timer, cancels the underlying browser timer.
pub struct TimerScheduler {
    on_fire: Rc<dyn Fn(Timer)>,
    handles: HashMap<Timer, Handle>,
}

impl TimerScheduler {
    pub fn new(on_fire: Rc<dyn Fn(Timer)>) -> Self {
        Self {
            on_fire,
            handles: HashMap::new(),
        }
    }

    pub fn is_scheduled(&self, timer: Timer) -> bool {
        self.handles.contains_key(&timer)
    }

    /// Cancel everything.
    pub fn clear_all(&mut self) {
        self.handles.clear();
    }
}

fn millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)
}

impl Scheduler for TimerScheduler {
    fn set_timeout(&mut self, timer: Timer, delay: Duration) {
        let on_fire = self.on_fire.clone();
        let handle = Timeout::new(millis(delay), move || on_fire(timer));
        self.handles.insert(timer, Handle::Once(handle));
    }

    fn set_interval(&mut self, timer: Timer, period: Duration) {
        let on_fire = self.on_fire.clone();
        let handle = Interval::new(millis(period), move || on_fire(timer));
        self.handles.insert(timer, Handle::Every(handle));
    }

    fn clear(&mut self, timer: Timer) {
        self.handles.remove(&timer);
    }
}
