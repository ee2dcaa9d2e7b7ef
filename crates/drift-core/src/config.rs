#![forbid(unsafe_code)]

//! Feed configuration as data.
//!
//! Every tunable of the marquee, edge zones, loop controllers and masonry
//! packer lives in a single [`FeedConfig`] value that is passed into each
//! controller's constructor. Nothing reads module-level mutable state.
//!
//! # Loading
//!
//! ```toml
//! # drift.toml
//! reduce_motion = false
//! loop_strategy = "recycling"
//!
//! [marquee]
//! base_duration_seconds = 14.0
//! fast_multiplier = 0.33
//!
//! [edge]
//! edge_ratio = 0.22
//! edge_min = 120.0
//! edge_max = 320.0
//! ```
//!
//! ```rust,ignore
//! let config = FeedConfig::from_toml_file("drift.toml")?.into_validated()?;
//! ```
//!
//! # Defaults
//!
//! `FeedConfig::default()` reproduces the production page: 12 s base
//! duration stepping by 1.5 s over a five-row period, compact edge zones,
//! 220 px minimum masonry columns with a 5 px gap, and the wraparound loop.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level FeedConfig
// ---------------------------------------------------------------------------

/// Top-level configuration for one feed page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FeedConfig {
    /// Marquee speed parameters.
    pub marquee: MarqueeConfig,
    /// Edge-zone hover parameters.
    pub edge: EdgeZoneConfig,
    /// Masonry gallery parameters.
    pub masonry: MasonryConfig,
    /// Recycling loop parameters.
    pub recycle: RecycleConfig,
    /// Programmatic scroll parameters.
    pub scroll: ScrollConfig,
    /// Which vertical loop strategy the page uses.
    pub loop_strategy: LoopStrategy,
    /// Initial reduce-motion preference.
    pub reduce_motion: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            marquee: MarqueeConfig::default(),
            edge: EdgeZoneConfig::COMPACT,
            masonry: MasonryConfig::default(),
            recycle: RecycleConfig::default(),
            scroll: ScrollConfig::default(),
            loop_strategy: LoopStrategy::default(),
            reduce_motion: false,
        }
    }
}

impl FeedConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, FeedConfigError> {
        toml::from_str(s).map_err(FeedConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, FeedConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FeedConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, FeedConfigError> {
        serde_json::from_str(s).map_err(FeedConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, FeedConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FeedConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of messages; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let m = &self.marquee;
        if !(m.base_duration_seconds.is_finite() && m.base_duration_seconds > 0.0) {
            errors.push(format!(
                "marquee.base_duration_seconds must be > 0, got {}",
                m.base_duration_seconds
            ));
        }
        if !(m.row_duration_step.is_finite() && m.row_duration_step >= 0.0) {
            errors.push(format!(
                "marquee.row_duration_step must be >= 0, got {}",
                m.row_duration_step
            ));
        }
        if m.row_duration_period == 0 {
            errors.push("marquee.row_duration_period must be > 0".into());
        }
        if !(m.fast_multiplier.is_finite() && m.fast_multiplier > 0.0 && m.fast_multiplier <= 1.0)
        {
            errors.push(format!(
                "marquee.fast_multiplier must be in (0, 1], got {}",
                m.fast_multiplier
            ));
        }
        if !(m.min_fast_duration.is_finite() && m.min_fast_duration > 0.0) {
            errors.push(format!(
                "marquee.min_fast_duration must be > 0, got {}",
                m.min_fast_duration
            ));
        }

        let e = &self.edge;
        if !(e.edge_ratio.is_finite() && e.edge_ratio > 0.0 && e.edge_ratio < 0.5) {
            errors.push(format!(
                "edge.edge_ratio must be in (0, 0.5), got {}",
                e.edge_ratio
            ));
        }
        if !(e.edge_min.is_finite() && e.edge_min >= 0.0) {
            errors.push(format!("edge.edge_min must be >= 0, got {}", e.edge_min));
        }
        if !(e.edge_max.is_finite() && e.edge_max >= e.edge_min) {
            errors.push(format!(
                "edge.edge_max must be >= edge.edge_min, got {} < {}",
                e.edge_max, e.edge_min
            ));
        }

        let g = &self.masonry;
        if !(g.gap.is_finite() && g.gap >= 0.0) {
            errors.push(format!("masonry.gap must be >= 0, got {}", g.gap));
        }
        if !(g.min_column_width.is_finite() && g.min_column_width > 0.0) {
            errors.push(format!(
                "masonry.min_column_width must be > 0, got {}",
                g.min_column_width
            ));
        }
        if !(g.max_column_width.is_finite() && g.max_column_width >= g.min_column_width) {
            errors.push(format!(
                "masonry.max_column_width must be >= masonry.min_column_width, got {} < {}",
                g.max_column_width, g.min_column_width
            ));
        }

        let r = &self.recycle;
        if !(r.buffer.is_finite() && r.buffer >= 0.0) {
            errors.push(format!("recycle.buffer must be >= 0, got {}", r.buffer));
        }
        if !r.top_offset.is_finite() {
            errors.push(format!(
                "recycle.top_offset must be finite, got {}",
                r.top_offset
            ));
        }
        if !(r.item_gap.is_finite() && r.item_gap >= 0.0) {
            errors.push(format!("recycle.item_gap must be >= 0, got {}", r.item_gap));
        }

        if self.scroll.smooth_duration_ms == 0 {
            errors.push("scroll.smooth_duration_ms must be > 0".into());
        }

        errors
    }

    /// Return `self` if [`validate`](Self::validate) finds nothing.
    pub fn into_validated(self) -> Result<Self, FeedConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            crate::logging::warn!(count = errors.len(), "feed config rejected");
            Err(FeedConfigError::Validation(errors))
        }
    }

    /// Format as a JSONL line for structured logging.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        format!(
            r#"{{"schema":"drift-config-v1","base_duration_seconds":{},"fast_multiplier":{},"min_fast_duration":{},"edge_ratio":{},"edge_min":{},"edge_max":{},"gap":{},"min_column_width":{},"max_column_width":{},"loop_strategy":"{}","reduce_motion":{}}}"#,
            self.marquee.base_duration_seconds,
            self.marquee.fast_multiplier,
            self.marquee.min_fast_duration,
            self.edge.edge_ratio,
            self.edge.edge_min,
            self.edge.edge_max,
            self.masonry.gap,
            self.masonry.min_column_width,
            self.masonry.max_column_width,
            self.loop_strategy.as_str(),
            self.reduce_motion,
        )
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Horizontal travel direction of a strip in `Base` mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum Direction {
    /// Content travels right to left (offset decreases).
    #[default]
    Left,
    /// Content travels left to right (offset increases).
    Right,
}

impl Direction {
    /// `-1.0` for [`Left`](Self::Left), `+1.0` for [`Right`](Self::Right).
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// How base directions are assigned to rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum DirectionPolicy {
    /// Every row travels the same way.
    Uniform(Direction),
    /// Even rows travel left, odd rows travel right.
    #[default]
    AlternateByRow,
}

impl DirectionPolicy {
    /// Direction for the zero-based `row`.
    #[must_use]
    pub const fn direction_for_row(self, row: usize) -> Direction {
        match self {
            Self::Uniform(direction) => direction,
            Self::AlternateByRow => {
                if row % 2 == 0 {
                    Direction::Left
                } else {
                    Direction::Right
                }
            }
        }
    }
}

/// Marquee speed parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct MarqueeConfig {
    /// Seconds for one content cycle in `Base` mode on row 0. Default: 12.
    pub base_duration_seconds: f64,
    /// Extra seconds added per row within a period. Default: 1.5.
    pub row_duration_step: f64,
    /// Number of rows before the duration step repeats. Default: 5.
    pub row_duration_period: usize,
    /// Fast duration as a fraction of the base duration. Default: 0.4.
    pub fast_multiplier: f64,
    /// Floor for the fast duration in seconds. Default: 0.65.
    pub min_fast_duration: f64,
    /// Row direction assignment. Default: alternate by row.
    pub direction: DirectionPolicy,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            base_duration_seconds: 12.0,
            row_duration_step: 1.5,
            row_duration_period: 5,
            fast_multiplier: 0.4,
            min_fast_duration: 0.65,
            direction: DirectionPolicy::default(),
        }
    }
}

impl MarqueeConfig {
    /// Base duration for the zero-based `row`:
    /// `base + (row mod period) × step`.
    #[must_use]
    pub fn row_duration(&self, row: usize) -> f64 {
        let period = self.row_duration_period.max(1);
        self.base_duration_seconds + (row % period) as f64 * self.row_duration_step
    }

    /// `max(base × fast_multiplier, min_fast_duration)`.
    #[must_use]
    pub fn fast_duration(&self, base_duration_seconds: f64) -> f64 {
        (base_duration_seconds * self.fast_multiplier).max(self.min_fast_duration)
    }
}

/// Edge-zone width parameters: `clamp(strip × ratio, min, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct EdgeZoneConfig {
    pub edge_ratio: f64,
    pub edge_min: f64,
    pub edge_max: f64,
}

impl EdgeZoneConfig {
    /// Narrow zones (0.16 / 80 / 240).
    pub const COMPACT: Self = Self {
        edge_ratio: 0.16,
        edge_min: 80.0,
        edge_max: 240.0,
    };

    /// Wide zones (0.22 / 120 / 320).
    pub const WIDE: Self = Self {
        edge_ratio: 0.22,
        edge_min: 120.0,
        edge_max: 320.0,
    };

    /// Edge width for a strip of `strip_width` pixels.
    #[must_use]
    pub fn edge_width(&self, strip_width: f64) -> f64 {
        (strip_width * self.edge_ratio).clamp(self.edge_min, self.edge_max.max(self.edge_min))
    }
}

impl Default for EdgeZoneConfig {
    fn default() -> Self {
        Self::COMPACT
    }
}

/// Masonry gallery parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct MasonryConfig {
    /// Gap between columns and between stacked items. Default: 5.
    pub gap: f64,
    /// Minimum column width. Default: 220.
    pub min_column_width: f64,
    /// Maximum column width before adding columns. Default: 360.
    pub max_column_width: f64,
}

impl Default for MasonryConfig {
    fn default() -> Self {
        Self {
            gap: 5.0,
            min_column_width: 220.0,
            max_column_width: 360.0,
        }
    }
}

/// Recycling loop parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RecycleConfig {
    /// Slack beyond the visible band before an item is relocated. Default: 24.
    pub buffer: f64,
    /// Top of the visible band in viewport pixels (fixed header height). Default: 0.
    pub top_offset: f64,
    /// Vertical gap between list items. Default: 0.
    pub item_gap: f64,
}

impl Default for RecycleConfig {
    fn default() -> Self {
        Self {
            buffer: 24.0,
            top_offset: 0.0,
            item_gap: 0.0,
        }
    }
}

/// Programmatic scroll parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ScrollConfig {
    /// Duration of a programmatic smooth scroll. Default: 600 ms.
    pub smooth_duration_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_duration_ms: 600,
        }
    }
}

/// Vertical loop strategy. The two are alternatives, never combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum LoopStrategy {
    /// Content doubled once; scroll folded modulo one cycle.
    #[default]
    Wraparound,
    /// Boundary items relocated between head and tail.
    Recycling,
}

impl LoopStrategy {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wraparound => "wraparound",
            Self::Recycling => "recycling",
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading or validating a feed configuration.
#[derive(Debug)]
pub enum FeedConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for FeedConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for FeedConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
