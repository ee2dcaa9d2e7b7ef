#![forbid(unsafe_code)]

//! `drift-web` drives the Drift engine from a host page.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment pushes notifications,
//!   pointer and key input, and frame timestamps.
//! - **Deterministic time**: tests advance a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate does not bind to `wasm-bindgen`. A thin browser shim implements
//! [`ScrollSurface`] over the window, forwards DOM callbacks to [`FeedHost`]
//! and applies the returned [`HostOutputs`].

pub mod edge_zone;
pub mod hold_control;
pub mod host;
pub mod scroll_surface;

use core::time::Duration;

use drift_core::config::{FeedConfigError, LoopStrategy};
use drift_runtime::TrackId;

pub use edge_zone::{EdgeZone, EdgeZoneInputController};
pub use hold_control::{
    CaptureCommand, HoldButton, HoldControl, HoldDispatch, HoldIgnoredReason, HoldInput,
    HoldLogEntry, HoldLogOutcome, HoldPhase, HoldTransition,
};
pub use host::{FeedHost, FrameTask, HostOutputs, ModeChange, ScrollWrite};
pub use scroll_surface::{FakeScrollSurface, ScrollSurface};

/// Host error type.
#[derive(Debug)]
pub enum HostError {
    /// The configuration failed validation.
    Config(FeedConfigError),
    /// No live track has this id.
    UnknownTrack(TrackId),
    /// The operation belongs to the other loop strategy.
    StrategyMismatch {
        required: LoopStrategy,
        active: LoopStrategy,
    },
}

impl core::fmt::Display for HostError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid feed config: {e}"),
            Self::UnknownTrack(id) => write!(f, "unknown track {}", id.get()),
            Self::StrategyMismatch { required, active } => write!(
                f,
                "operation requires the {} loop strategy, host runs {}",
                required.as_str(),
                active.as_str()
            ),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::UnknownTrack(_) | Self::StrategyMismatch { .. } => None,
        }
    }
}

impl From<FeedConfigError> for HostError {
    fn from(e: FeedConfigError) -> Self {
        Self::Config(e)
    }
}

/// Monotonic time source for frame timestamps.
///
/// [`FeedHost::advance_frame_from`] reads it once per frame.
pub trait HostClock {
    /// Time since an arbitrary fixed origin.
    fn now_mono(&self) -> Duration;
}

/// Nominal 60 Hz frame period.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Scripted clock for tests and replays.
///
/// Time moves only when told to: by whole frames with
/// [`next_frame`](Self::next_frame) or by arbitrary gaps (a backgrounded
/// tab) with [`advance`](Self::advance).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeterministicClock {
    now: Duration,
    frame_interval: Duration,
}

impl Default for DeterministicClock {
    fn default() -> Self {
        Self::with_frame_interval(DEFAULT_FRAME_INTERVAL)
    }
}

impl DeterministicClock {
    /// Clock at `0` stepping by [`DEFAULT_FRAME_INTERVAL`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_frame_interval(frame_interval: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            frame_interval,
        }
    }

    #[must_use]
    pub const fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Jump to an absolute time; earlier values are allowed.
    pub fn jump_to(&mut self, now: Duration) {
        self.now = now;
    }

    /// Let `gap` pass without delivering frames.
    pub fn advance(&mut self, gap: Duration) {
        self.now = self.now.saturating_add(gap);
    }

    /// Step one frame interval and return the new time.
    pub fn next_frame(&mut self) -> Duration {
        self.advance(self.frame_interval);
        self.now
    }
}

impl HostClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Wall clock: `performance.now()` on `wasm32`, `Instant` elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: web_time::Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock for SystemClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }
}
