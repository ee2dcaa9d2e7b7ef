#![forbid(unsafe_code)]

//! Hover edge zones over a media strip.
//!
//! Resting the pointer near the left edge plays the strip fast to the right
//! (revealing earlier content); near the right edge, fast to the left. The
//! centre band leaves the strip at its base speed. A press-and-hold button
//! overrides hover for as long as it is held.
//!
//! # Invariants
//!
//! 1. The effective mode is the held mode if a hold is active, otherwise the
//!    hover mode.
//! 2. Ending a hold leaves the strip at `Base`; hover applies again from the
//!    next pointer move.
//! 3. Touch pointers never change the hover mode.
//! 4. Every method returns `Some(mode)` only when the effective mode changed.
//!
//! # Failure Modes
//!
//! - Strip width not measured (zero or non-finite): hover is ignored until
//!   [`EdgeZoneInputController::set_strip_width`] succeeds.

use drift_core::config::EdgeZoneConfig;
use drift_core::event::{PointerEvent, PointerKind};
use drift_core::geometry::ready_extent;
use drift_runtime::TrackMode;

/// Horizontal band of a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeZone {
    Left,
    Center,
    Right,
}

impl EdgeZone {
    /// Hover mode for this zone.
    #[must_use]
    pub const fn mode(self) -> TrackMode {
        match self {
            Self::Left => TrackMode::FastRight,
            Self::Center => TrackMode::Base,
            Self::Right => TrackMode::FastLeft,
        }
    }
}

/// Maps pointer position and holds over one strip to a track mode.
#[derive(Debug, Clone)]
pub struct EdgeZoneInputController {
    config: EdgeZoneConfig,
    strip_width: Option<f64>,
    hover: TrackMode,
    held: Option<TrackMode>,
}

impl EdgeZoneInputController {
    #[must_use]
    pub const fn new(config: EdgeZoneConfig) -> Self {
        Self {
            config,
            strip_width: None,
            hover: TrackMode::Base,
            held: None,
        }
    }

    /// Record the strip's measured width. Returns `false` if not ready.
    pub fn set_strip_width(&mut self, width: f64) -> bool {
        self.strip_width = ready_extent(width);
        self.strip_width.is_some()
    }

    #[must_use]
    pub const fn strip_width(&self) -> Option<f64> {
        self.strip_width
    }

    /// Width of each edge zone for the current strip.
    #[must_use]
    pub fn edge_width(&self) -> Option<f64> {
        self.strip_width.map(|w| self.config.edge_width(w))
    }

    /// Zone under strip-local `x`, or `None` if unmeasured or off-strip.
    #[must_use]
    pub fn zone_at(&self, x: f64) -> Option<EdgeZone> {
        let width = self.strip_width?;
        if !x.is_finite() || !(0.0..=width).contains(&x) {
            return None;
        }
        let edge = self.config.edge_width(width);
        Some(if x < edge {
            EdgeZone::Left
        } else if x > width - edge {
            EdgeZone::Right
        } else {
            EdgeZone::Center
        })
    }

    /// Pointer moved over the strip.
    pub fn pointer_move(&mut self, event: &PointerEvent) -> Option<TrackMode> {
        if event.kind == PointerKind::Touch || self.strip_width.is_none() {
            return None;
        }
        let hover = self.zone_at(event.x).map_or(TrackMode::Base, EdgeZone::mode);
        self.set_hover(hover)
    }

    /// Pointer left the strip.
    pub fn pointer_leave(&mut self) -> Option<TrackMode> {
        self.set_hover(TrackMode::Base)
    }

    /// A hold button was pressed.
    pub fn begin_hold(&mut self, mode: TrackMode) -> Option<TrackMode> {
        let before = self.effective_mode();
        self.held = Some(mode);
        (self.effective_mode() != before).then_some(mode)
    }

    /// The hold ended; the strip returns to `Base`.
    pub fn end_hold(&mut self) -> Option<TrackMode> {
        let before = self.effective_mode();
        self.held = None;
        self.hover = TrackMode::Base;
        (before != TrackMode::Base).then_some(TrackMode::Base)
    }

    fn set_hover(&mut self, hover: TrackMode) -> Option<TrackMode> {
        let before = self.effective_mode();
        self.hover = hover;
        let after = self.effective_mode();
        (after != before).then_some(after)
    }

    #[must_use]
    pub fn effective_mode(&self) -> TrackMode {
        self.held.unwrap_or(self.hover)
    }

    #[must_use]
    pub const fn hover_mode(&self) -> TrackMode {
        self.hover
    }

    #[must_use]
    pub const fn is_holding(&self) -> bool {
        self.held.is_some()
    }

    #[must_use]
    pub const fn config(&self) -> &EdgeZoneConfig {
        &self.config
    }
}
