//! Frame auto-sizing.
//!
//! The host page cannot see inside the sandbox, so the frame's height has to
//! be pushed from inside: measure the natural height of the content and
//! write it onto the frame whenever it differs from what is rendered.
//!
//! Measurement is a pluggable [`HeightProbe`] because it depends on the
//! rendering engine's box model. Scheduling (heartbeat, debounce) lives in
//! the session and never needs to know how a probe works.

use crate::surface::Surface;

/// Strategy for measuring the natural content height of a surface.
pub trait HeightProbe<S: ?Sized> {
    /// Height in pixels the frame needs to show all content, or `None` when
    /// the surface cannot be measured right now.
    fn measure(&self, surface: &S) -> Option<i32>;
}

/// Outcome of one [`HeightEngine::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeightUpdate {
    /// The frame height was written.
    Applied(i32),
    /// The frame already has the measured height.
    Unchanged(i32),
    /// Nothing to measure.
    Unmeasurable,
}

#[derive(Clone, Debug)]
pub struct HeightEngine<P> {
    probe: P,
    last_measured: Option<i32>,
}

impl<P> HeightEngine<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            last_measured: None,
        }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn last_measured(&self) -> Option<i32> {
        self.last_measured
    }

    /// Measure the content and write the frame height if it changed.
    pub fn update<S>(&mut self, surface: &mut S) -> HeightUpdate
    where
        S: Surface + ?Sized,
        P: HeightProbe<S>,
    {
        let Some(measured) = self.probe.measure(surface) else {
            return HeightUpdate::Unmeasurable;
        };
        self.last_measured = Some(measured);

        if surface.frame_height() == Some(measured) {
            return HeightUpdate::Unchanged(measured);
        }

        match surface.set_frame_height(measured) {
            Ok(()) => {
                tracing::trace!(height = measured, "applied frame height");
                HeightUpdate::Applied(measured)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to apply frame height");
                HeightUpdate::Unmeasurable
            }
        }
    }
}
