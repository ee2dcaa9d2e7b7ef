#![forbid(unsafe_code)]

//! Programmatic smooth scrolling.
//!
//! A [`SmoothScroll`] interpolates the document scroll position from `start`
//! to `target` with an ease-out cubic curve, one step per frame. The host
//! keeps the frame handle of the pending step; a user wheel or touch gesture
//! cancels the animation and the host drops that handle.
//!
//! # Invariants
//!
//! 1. Positions move monotonically from `start` toward `target`.
//! 2. The final step lands exactly on `target`.
//! 3. A cancelled or finished animation produces no further steps.
//!
//! # Failure Modes
//!
//! - Zero duration: the first step completes immediately.
//! - Non-finite endpoints: [`SmoothScroll::new`] returns `None`.

use std::time::Duration;

use tracing::trace;

/// `1 - (1 - t)^3` for `t` clamped to `[0, 1]`.
#[inline]
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 };
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollAnimationState {
    Running,
    Finished,
    Cancelled,
}

/// One animation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollStep {
    /// Position to write this frame.
    pub position: f64,
    /// Whether this was the last step.
    pub done: bool,
}

/// Eased scroll from `start` to `target`.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    start: f64,
    target: f64,
    duration: Duration,
    elapsed: Duration,
    state: ScrollAnimationState,
}

impl SmoothScroll {
    /// Create a running animation. Returns `None` for non-finite endpoints.
    #[must_use]
    pub fn new(start: f64, target: f64, duration: Duration) -> Option<Self> {
        if !start.is_finite() || !target.is_finite() {
            return None;
        }
        Some(Self {
            start,
            target,
            duration,
            elapsed: Duration::ZERO,
            state: ScrollAnimationState::Running,
        })
    }

    /// Advance by `delta` and return the position to write.
    ///
    /// Returns `None` once the animation is no longer running.
    pub fn step(&mut self, delta: Duration) -> Option<ScrollStep> {
        if self.state != ScrollAnimationState::Running {
            return None;
        }
        self.elapsed = self.elapsed.saturating_add(delta);
        if self.duration.is_zero() || self.elapsed >= self.duration {
            self.state = ScrollAnimationState::Finished;
            return Some(ScrollStep {
                position: self.target,
                done: true,
            });
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let position = self.start + (self.target - self.start) * ease_out_cubic(t);
        Some(ScrollStep {
            position,
            done: false,
        })
    }

    /// Move both endpoints by `delta`.
    ///
    /// Used when a loop correction jumps the document under a running
    /// animation, so the remaining steps continue from the jumped position.
    pub fn shift(&mut self, delta: f64) {
        if delta.is_finite() {
            self.start += delta;
            self.target += delta;
        }
    }

    /// Stop the animation where it is.
    pub fn cancel(&mut self) {
        if self.state == ScrollAnimationState::Running {
            trace!(target: "drift.scroll", target = self.target, "smooth scroll cancelled");
            self.state = ScrollAnimationState::Cancelled;
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == ScrollAnimationState::Running
    }

    #[must_use]
    pub const fn state(&self) -> ScrollAnimationState {
        self.state
    }

    #[must_use]
    pub const fn target(&self) -> f64 {
        self.target
    }
}
