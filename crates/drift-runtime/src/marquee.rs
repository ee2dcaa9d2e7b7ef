#![forbid(unsafe_code)]

//! Per-strip horizontal marquee.
//!
//! Each media strip renders its content twice side by side, so translating
//! the strip by exactly one content width is invisible. A [`MarqueeTrack`]
//! owns the continuous translation for one strip and advances it once per
//! frame at a speed chosen by its [`TrackMode`].
//!
//! # Speeds
//!
//! ```text
//! content_width  = rendered_width / 2
//! base_speed     = content_width / base_duration
//! fast_duration  = max(base_duration × fast_multiplier, min_fast_duration)
//! fast_speed     = content_width / fast_duration
//! ```
//!
//! | Mode        | Speed (px/s)                     |
//! |-------------|----------------------------------|
//! | `Base`      | `base_speed × base_direction`    |
//! | `FastLeft`  | `-fast_speed`                    |
//! | `FastRight` | `+fast_speed`                    |
//! | `Manual`    | `0`                              |
//!
//! With reduce-motion on, every mode has speed 0. The mode itself is kept,
//! so clearing the preference resumes whatever the input controllers set.
//!
//! # Invariants
//!
//! 1. `content_width > 0` ⇒ `-content_width < offset <= 0` after every tick.
//! 2. `content_width == 0` ⇒ `offset == 0` after every tick.
//! 3. `FastRight` speed `>= 0`, `FastLeft` speed `<= 0`, `Manual` speed `== 0`.
//! 4. Reduce-motion on ⇒ speed `== 0` in every mode.
//! 5. The offset is only written by [`MarqueeTrack::tick`] (and by
//!    [`MarqueeTrack::set_manual_offset`] while in `Manual`).
//!
//! # Failure Modes
//!
//! - A rendered width that is zero or non-finite leaves the prior metrics in
//!   place and reports not-ready.
//! - A negative or non-finite frame delta is ignored.

use drift_core::config::{Direction, MarqueeConfig};
use drift_core::geometry::ready_extent;
use drift_core::wrap::wrap_offset;
use tracing::{debug, trace};

/// Speed mode of a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrackMode {
    /// Continuous drift in the strip's base direction.
    #[default]
    Base,
    /// Fast travel toward the left (negative offset change).
    FastLeft,
    /// Fast travel toward the right (positive offset change).
    FastRight,
    /// Frozen; a navigation transition positions the strip.
    Manual,
}

impl TrackMode {
    /// Stable lowercase name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::FastLeft => "fast_left",
            Self::FastRight => "fast_right",
            Self::Manual => "manual",
        }
    }

    /// Whether this is one of the two fast modes.
    #[must_use]
    pub const fn is_fast(self) -> bool {
        matches!(self, Self::FastLeft | Self::FastRight)
    }
}

/// Snapshot of a strip's motion state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackState {
    /// Width of one un-duplicated content cycle (0 until measured).
    pub content_width: f64,
    /// Current translation.
    pub offset: f64,
    pub base_duration_seconds: f64,
    pub fast_duration_seconds: f64,
    pub base_speed_abs: f64,
    pub fast_speed_abs: f64,
    pub mode: TrackMode,
    pub base_direction: Direction,
}

/// Motion state machine for one media strip.
#[derive(Debug, Clone)]
pub struct MarqueeTrack {
    state: TrackState,
    reduce_motion: bool,
}

impl MarqueeTrack {
    /// Track for the zero-based `row`, with the row's base duration and
    /// direction taken from `config`.
    #[must_use]
    pub fn for_row(config: &MarqueeConfig, row: usize) -> Self {
        Self::new(
            config,
            config.row_duration(row),
            config.direction.direction_for_row(row),
        )
    }

    /// Track with an explicit base duration and direction.
    ///
    /// A base duration that is not finite and positive falls back to the
    /// configured default.
    #[must_use]
    pub fn new(config: &MarqueeConfig, base_duration_seconds: f64, direction: Direction) -> Self {
        let base = ready_extent(base_duration_seconds)
            .or_else(|| ready_extent(config.base_duration_seconds))
            .unwrap_or(MarqueeConfig::default().base_duration_seconds);
        Self {
            state: TrackState {
                content_width: 0.0,
                offset: 0.0,
                base_duration_seconds: base,
                fast_duration_seconds: config.fast_duration(base),
                base_speed_abs: 0.0,
                fast_speed_abs: 0.0,
                mode: TrackMode::Base,
                base_direction: direction,
            },
            reduce_motion: false,
        }
    }

    /// Start with reduce-motion already set.
    #[must_use]
    pub fn with_reduce_motion(mut self, reduce_motion: bool) -> Self {
        self.reduce_motion = reduce_motion;
        self
    }

    /// Re-derive the content width and speeds from the measured width of
    /// the duplicated content.
    ///
    /// Returns `false` (and keeps the previous metrics) if the measurement
    /// is not ready.
    pub fn compute_metrics(&mut self, rendered_width: f64) -> bool {
        let Some(content_width) = ready_extent(rendered_width / 2.0) else {
            trace!(
                target: "drift.marquee",
                rendered_width,
                "marquee metrics not ready"
            );
            return false;
        };
        let s = &mut self.state;
        s.content_width = content_width;
        s.base_speed_abs = content_width / s.base_duration_seconds;
        s.fast_speed_abs = content_width / s.fast_duration_seconds;
        s.offset = wrap_offset(s.offset, content_width);
        debug!(
            target: "drift.marquee",
            content_width,
            base_speed = s.base_speed_abs,
            fast_speed = s.fast_speed_abs,
            "marquee metrics computed"
        );
        true
    }

    /// Signed speed in px/s for the current mode.
    #[must_use]
    pub fn speed(&self) -> f64 {
        if self.reduce_motion {
            return 0.0;
        }
        let s = &self.state;
        match s.mode {
            TrackMode::Base => s.base_speed_abs * s.base_direction.sign(),
            TrackMode::FastLeft => -s.fast_speed_abs,
            TrackMode::FastRight => s.fast_speed_abs,
            TrackMode::Manual => 0.0,
        }
    }

    /// Advance by `delta_seconds` and return the new offset.
    pub fn tick(&mut self, delta_seconds: f64) -> f64 {
        let content_width = self.state.content_width;
        if ready_extent(content_width).is_none() {
            self.state.offset = 0.0;
            return 0.0;
        }
        if delta_seconds.is_finite() && delta_seconds > 0.0 {
            let advanced = self.state.offset + self.speed() * delta_seconds;
            self.state.offset = wrap_offset(advanced, content_width);
        }
        self.state.offset
    }

    /// Switch mode. Returns `true` if the mode changed.
    pub fn set_mode(&mut self, mode: TrackMode) -> bool {
        if self.state.mode == mode {
            return false;
        }
        debug!(
            target: "drift.marquee",
            from = self.state.mode.as_str(),
            to = mode.as_str(),
            "marquee mode changed"
        );
        self.state.mode = mode;
        true
    }

    /// Place the strip while it is in `Manual` mode.
    ///
    /// The value is wrapped into range. Returns `false` in any other mode.
    pub fn set_manual_offset(&mut self, offset: f64) -> bool {
        if self.state.mode != TrackMode::Manual {
            return false;
        }
        self.state.offset = wrap_offset(offset, self.state.content_width);
        true
    }

    /// Apply the reduce-motion preference.
    pub fn set_reduce_motion(&mut self, reduce_motion: bool) {
        self.reduce_motion = reduce_motion;
    }

    #[must_use]
    pub const fn reduce_motion(&self) -> bool {
        self.reduce_motion
    }

    #[must_use]
    pub const fn mode(&self) -> TrackMode {
        self.state.mode
    }

    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.state.offset
    }

    /// Whether a content width has been measured.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        ready_extent(self.state.content_width).is_some()
    }

    /// Full state snapshot.
    #[must_use]
    pub const fn state(&self) -> &TrackState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(direction: Direction) -> MarqueeTrack {
        let mut t = MarqueeTrack::new(&MarqueeConfig::default(), 12.0, direction);
        assert!(t.compute_metrics(600.0));
        t
    }

    #[test]
    fn base_speed_from_content_width() {
        let mut t = track(Direction::Left);
        assert_eq!(t.state().content_width, 300.0);
        assert_eq!(t.state().base_speed_abs, 25.0);
        assert_eq!(t.tick(1.0), -25.0);
    }

    #[test]
    fn rightward_base_wraps_into_range() {
        let mut t = track(Direction::Right);
        // 0 + 25 > 0 ⇒ one cycle subtracted.
        assert_eq!(t.tick(1.0), -275.0);
        assert_eq!(t.tick(1.0), -250.0);
    }

    #[test]
    fn fast_duration_is_clamped() {
        let config = MarqueeConfig {
            fast_multiplier: 0.01,
            min_fast_duration: 0.65,
            ..MarqueeConfig::default()
        };
        let t = MarqueeTrack::new(&config, 12.0, Direction::Left);
        assert_eq!(t.state().fast_duration_seconds, 0.65);
    }

    #[test]
    fn fast_mode_signs() {
        let mut t = track(Direction::Right);
        t.set_mode(TrackMode::FastLeft);
        assert!(t.speed() < 0.0);
        t.set_mode(TrackMode::FastRight);
        assert!(t.speed() > 0.0);
        assert_eq!(t.speed(), t.state().fast_speed_abs);
        t.set_mode(TrackMode::Manual);
        assert_eq!(t.speed(), 0.0);
    }

    #[test]
    fn reduce_motion_stops_every_mode() {
        let mut t = track(Direction::Left).with_reduce_motion(true);
        assert_eq!(t.speed(), 0.0);
        assert_eq!(t.tick(3.0), 0.0);
        for mode in [TrackMode::FastLeft, TrackMode::FastRight, TrackMode::Manual] {
            t.set_mode(mode);
            assert_eq!(t.speed(), 0.0);
            assert_eq!(t.tick(1.0), 0.0);
        }
        t.set_mode(TrackMode::FastLeft);
        t.set_reduce_motion(false);
        assert_eq!(t.speed(), -t.state().fast_speed_abs);
        t.set_mode(TrackMode::Base);
        assert_eq!(t.speed(), -25.0);
    }

    #[test]
    fn unmeasured_track_forces_zero_offset() {
        let mut t = MarqueeTrack::new(&MarqueeConfig::default(), 12.0, Direction::Left);
        assert!(!t.is_ready());
        assert_eq!(t.tick(5.0), 0.0);
        assert!(!t.compute_metrics(0.0));
        assert!(!t.compute_metrics(f64::NAN));
        assert_eq!(t.tick(5.0), 0.0);
    }

    #[test]
    fn not_ready_measurement_keeps_prior_metrics() {
        let mut t = track(Direction::Left);
        assert!(!t.compute_metrics(f64::INFINITY));
        assert_eq!(t.state().content_width, 300.0);
    }

    #[test]
    fn bad_deltas_are_ignored() {
        let mut t = track(Direction::Left);
        t.tick(1.0);
        assert_eq!(t.tick(-1.0), -25.0);
        assert_eq!(t.tick(f64::NAN), -25.0);
        assert_eq!(t.tick(0.0), -25.0);
    }

    #[test]
    fn long_background_delta_stays_in_range() {
        let mut t = track(Direction::Left);
        t.set_mode(TrackMode::FastLeft);
        let offset = t.tick(3_600.0);
        assert!(offset > -300.0 && offset <= 0.0, "got {offset}");
    }

    #[test]
    fn same_mode_twice_is_noop() {
        let mut t = track(Direction::Left);
        assert!(!t.set_mode(TrackMode::Base));
        assert!(t.set_mode(TrackMode::FastRight));
        assert!(!t.set_mode(TrackMode::FastRight));
    }

    #[test]
    fn manual_offset_only_in_manual_mode() {
        let mut t = track(Direction::Left);
        assert!(!t.set_manual_offset(-40.0));
        t.set_mode(TrackMode::Manual);
        assert!(t.set_manual_offset(-340.0));
        assert_eq!(t.offset(), -40.0);
        assert_eq!(t.tick(10.0), -40.0);
    }

    #[test]
    fn remeasure_rewraps_offset() {
        let mut t = track(Direction::Left);
        t.tick(10.0); // -250
        assert!(t.compute_metrics(400.0));
        let offset = t.offset();
        assert!(offset > -200.0 && offset <= 0.0, "got {offset}");
    }

    #[test]
    fn row_defaults_follow_config() {
        let config = MarqueeConfig::default();
        let t0 = MarqueeTrack::for_row(&config, 0);
        let t3 = MarqueeTrack::for_row(&config, 3);
        assert_eq!(t0.state().base_direction, Direction::Left);
        assert_eq!(t3.state().base_direction, Direction::Right);
        assert_eq!(t3.state().base_duration_seconds, 16.5);
    }

    #[test]
    fn invalid_base_duration_falls_back() {
        let t = MarqueeTrack::new(&MarqueeConfig::default(), 0.0, Direction::Left);
        assert_eq!(t.state().base_duration_seconds, 12.0);
    }
}
