#![forbid(unsafe_code)]

//! Drift public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports common types from the internal crates and offers a lightweight
//! prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use drift_core::config::{
    Direction, DirectionPolicy, EdgeZoneConfig, FeedConfig, FeedConfigError, LoopStrategy,
    MarqueeConfig, MasonryConfig, RecycleConfig, ScrollConfig,
};
pub use drift_core::event::{
    ActionKeys, HostNotification, KeyCode, KeyEvent, KeyEventKind, PointerButton, PointerEvent,
    PointerKind,
};
pub use drift_core::event_coalescer::NotificationCoalescer;
pub use drift_core::frame_clock::{FrameClock, FrameHandle, FrameTick, SubscriberId};
pub use drift_core::geometry::{Rect, Size};

// --- Layout re-exports -----------------------------------------------------

pub use drift_layout::{MasonryItem, MasonryLayout, MasonryPacker};

// --- Runtime re-exports ----------------------------------------------------

pub use drift_runtime::{
    CorrectionGuard, GuardState, ItemId, LoopAction, MarqueeTrack, PageLoopController,
    RecycleEffect, RecycleEntry, RecycleItem, RecyclePass, RecyclingLoopController, SmoothScroll,
    TrackArena, TrackId, TrackMode, TrackTranslation,
};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use drift_web::{
    CaptureCommand, DeterministicClock, EdgeZoneInputController, FakeScrollSurface, FeedHost,
    HoldButton, HoldControl, HoldInput, HostClock, HostError, HostOutputs, ScrollSurface,
    ScrollWrite, SystemClock,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Drift hosts.
#[derive(Debug)]
pub enum Error {
    /// Configuration failed to load or validate.
    Config(FeedConfigError),
    /// Host-level misuse (unknown track, wrong loop strategy).
    #[cfg(feature = "web")]
    Host(HostError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            #[cfg(feature = "web")]
            Self::Host(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            #[cfg(feature = "web")]
            Self::Host(err) => Some(err),
        }
    }
}

impl From<FeedConfigError> for Error {
    fn from(err: FeedConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "web")]
impl From<HostError> for Error {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Config(inner) => Self::Config(inner),
            other => Self::Host(other),
        }
    }
}

/// Standard result type for Drift APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, FeedConfig, HostNotification, KeyCode, KeyEvent, LoopStrategy, MasonryPacker,
        PointerEvent, Result, Size, TrackId, TrackMode,
    };

    #[cfg(feature = "web")]
    pub use crate::{FeedHost, HoldButton, HoldInput, HostOutputs, ScrollSurface};

    pub use crate::{core, layout, runtime};

    #[cfg(feature = "web")]
    pub use crate::web;
}

pub use drift_core as core;
pub use drift_layout as layout;
pub use drift_runtime as runtime;
#[cfg(feature = "web")]
pub use drift_web as web;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_passes_through() {
        let err: Error = FeedConfigError::Validation(vec!["masonry.gap must be >= 0".into()]).into();
        assert!(err.to_string().contains("masonry.gap"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[cfg(feature = "web")]
    #[test]
    fn host_config_error_is_flattened() {
        let mut config = FeedConfig::default();
        config.masonry.min_column_width = 0.0;
        let err: Error = FeedHost::new(config, FakeScrollSurface::default())
            .map(|_| ())
            .map_err(Error::from)
            .expect_err("zero column width is invalid");
        assert!(matches!(err, Error::Config(FeedConfigError::Validation(_))));
    }

    #[cfg(feature = "web")]
    #[test]
    fn prelude_builds_a_host() {
        use crate::prelude::*;
        let host = FeedHost::new(
            FeedConfig::default(),
            web::FakeScrollSurface::new(Size::new(800.0, 600.0), 1200.0),
        );
        assert!(host.is_ok_and(|h| h.loop_strategy() == LoopStrategy::Wraparound));
    }
}
