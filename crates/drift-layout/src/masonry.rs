#![forbid(unsafe_code)]

//! Greedy shortest-column masonry packing.
//!
//! Given the gallery width and the aspect ratio (width / height) of every
//! photo in display order, [`MasonryPacker::pack`] chooses a column count,
//! then drops each photo into whichever column is currently shortest.
//!
//! # Column count
//!
//! ```text
//! c  = clamp(floor((width + gap) / (min_column_width + gap)), 1, items)
//! cw = (width - gap × (c - 1)) / c
//! ```
//!
//! If `cw` still exceeds `max_column_width` and there are more items than
//! columns, `c` is raised to the smallest count whose columns fit under the
//! maximum (bounded by the item count) and `cw` is recomputed.
//!
//! # Invariants
//!
//! 1. `1 <= column_count <= items.len()` for any non-empty ready layout.
//! 2. Items appear in input order; each is placed in the first shortest
//!    column at the moment it is placed.
//! 3. The tallest column minus the shortest column is at most one item
//!    height plus one gap.
//! 4. `height == max(column_heights) - gap`, clamped at 0.
//! 5. The same input always yields the same layout.
//!
//! # Failure Modes
//!
//! - No items, or a width that is zero, negative or non-finite: an empty
//!   layout of height 0. The caller keeps whatever it rendered before.
//! - Aspect ratio `<= 0` or non-finite: treated as 1 (square).

use std::hash::{Hash, Hasher};

use drift_core::config::MasonryConfig;
use drift_core::geometry::{Rect, ready_extent};
use rustc_hash::FxHasher;
use serde::Serialize;

/// Aspect ratio used when the real one is unknown or unusable.
pub const FALLBACK_ASPECT_RATIO: f64 = 1.0;

/// Returns `ratio` if it is finite and positive, else [`FALLBACK_ASPECT_RATIO`].
#[inline]
#[must_use]
pub fn effective_aspect_ratio(ratio: f64) -> f64 {
    ready_extent(ratio).unwrap_or(FALLBACK_ASPECT_RATIO)
}

/// Column count and column width for `item_count` items in `width` pixels.
///
/// Returns `None` when there is nothing to lay out or the width is not ready.
#[must_use]
pub fn column_count(config: &MasonryConfig, width: f64, item_count: usize) -> Option<(usize, f64)> {
    let width = ready_extent(width)?;
    if item_count == 0 {
        return None;
    }
    let gap = config.gap.max(0.0);

    let mut columns = fit_count(width + gap, config.min_column_width + gap).clamp(1, item_count);
    let mut column_width = column_width_for(width, gap, columns);

    if column_width > config.max_column_width && item_count > columns {
        // Smallest count whose columns are no wider than the maximum.
        let raised = fit_count(width + gap, config.max_column_width + gap).saturating_add(1);
        columns = raised.clamp(columns, item_count);
        column_width = column_width_for(width, gap, columns);
    }

    Some((columns, column_width))
}

fn fit_count(span: f64, step: f64) -> usize {
    match ready_extent(step) {
        // Float-to-int `as` saturates, so an enormous ratio cannot wrap.
        Some(step) => (span / step).floor().max(0.0) as usize,
        None => 1,
    }
}

fn column_width_for(width: f64, gap: f64, columns: usize) -> f64 {
    let c = columns as f64;
    ((width - gap * (c - 1.0)) / c).max(0.0)
}

/// One placed gallery item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MasonryItem {
    /// Position in the input order.
    pub index: usize,
    /// Aspect ratio actually used (after fallback).
    pub aspect_ratio: f64,
    /// Zero-based column the item was assigned to.
    pub column: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl MasonryItem {
    /// Placement as a rectangle relative to the gallery's top-left corner.
    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Result of one packing pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MasonryLayout {
    /// Number of columns (0 for an empty layout).
    pub column_count: usize,
    /// Width of every column.
    pub column_width: f64,
    /// Running height of each column, including its trailing gap.
    pub column_heights: Vec<f64>,
    /// Placements in input order.
    pub items: Vec<MasonryItem>,
    /// Container height: tallest column minus one trailing gap, `>= 0`.
    pub height: f64,
}

impl MasonryLayout {
    /// Whether nothing was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Tallest minus shortest column height.
    #[must_use]
    pub fn column_spread(&self) -> f64 {
        let max = self.column_heights.iter().copied().fold(0.0, f64::max);
        let min = self
            .column_heights
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        if min.is_finite() { max - min } else { 0.0 }
    }
}

/// Masonry packer configured once per gallery.
#[derive(Debug, Clone, Default)]
pub struct MasonryPacker {
    config: MasonryConfig,
    memo: Option<(u64, MasonryLayout)>,
}

impl MasonryPacker {
    /// Create a packer with the given configuration.
    #[must_use]
    pub const fn new(config: MasonryConfig) -> Self {
        Self { config, memo: None }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &MasonryConfig {
        &self.config
    }

    /// Replace the configuration and drop the memoized layout.
    pub fn set_config(&mut self, config: MasonryConfig) {
        self.config = config;
        self.memo = None;
    }

    /// Pack `aspect_ratios` (in display order) into a gallery `width` wide.
    #[must_use]
    pub fn pack(&self, width: f64, aspect_ratios: &[f64]) -> MasonryLayout {
        let Some((columns, column_width)) =
            column_count(&self.config, width, aspect_ratios.len())
        else {
            return MasonryLayout::default();
        };
        let gap = self.config.gap.max(0.0);

        let mut column_heights = vec![0.0_f64; columns];
        let mut items = Vec::with_capacity(aspect_ratios.len());

        for (index, &raw) in aspect_ratios.iter().enumerate() {
            let aspect_ratio = effective_aspect_ratio(raw);
            let height = column_width / aspect_ratio;
            let column = shortest_column(&column_heights);
            let y = column_heights[column];
            items.push(MasonryItem {
                index,
                aspect_ratio,
                column,
                x: column as f64 * (column_width + gap),
                y,
                width: column_width,
                height,
            });
            column_heights[column] = y + height + gap;
        }

        let height = container_height(&column_heights, gap);
        MasonryLayout {
            column_count: columns,
            column_width,
            column_heights,
            items,
            height,
        }
    }

    /// Like [`pack`](Self::pack), but reuses the previous result when the
    /// width, ratios and configuration are unchanged.
    ///
    /// Content-resize notifications fire for every image that finishes
    /// loading; most of them do not change any input.
    pub fn pack_cached(&mut self, width: f64, aspect_ratios: &[f64]) -> &MasonryLayout {
        let key = self.fingerprint(width, aspect_ratios);
        if !matches!(&self.memo, Some((k, _)) if *k == key) {
            let layout = self.pack(width, aspect_ratios);
            self.memo = Some((key, layout));
        }
        &self.memo.get_or_insert_with(|| (key, MasonryLayout::default())).1
    }

    /// Drop the memoized layout.
    pub fn invalidate(&mut self) {
        self.memo = None;
    }

    fn fingerprint(&self, width: f64, aspect_ratios: &[f64]) -> u64 {
        let mut hasher = FxHasher::default();
        width.to_bits().hash(&mut hasher);
        self.config.gap.to_bits().hash(&mut hasher);
        self.config.min_column_width.to_bits().hash(&mut hasher);
        self.config.max_column_width.to_bits().hash(&mut hasher);
        aspect_ratios.len().hash(&mut hasher);
        for ratio in aspect_ratios {
            effective_aspect_ratio(*ratio).to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// Index of the shortest column; the first one wins ties.
fn shortest_column(heights: &[f64]) -> usize {
    let mut index = 0;
    let mut best = heights.first().copied().unwrap_or(0.0);
    for (i, h) in heights.iter().enumerate().skip(1) {
        if *h < best {
            best = *h;
            index = i;
        }
    }
    index
}

fn container_height(heights: &[f64], gap: f64) -> f64 {
    let tallest = heights.iter().copied().fold(0.0, f64::max);
    if tallest == 0.0 {
        0.0
    } else {
        (tallest - gap).max(0.0)
    }
}
