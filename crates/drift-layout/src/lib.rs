#![forbid(unsafe_code)]

//! Layout solvers for Drift galleries.
//!
//! The only solver is the [`MasonryPacker`]: a greedy shortest-column packer
//! for variable-aspect-ratio photo grids. It is pure (no clock, no host) and
//! runs whenever the gallery width or its content changes.

pub mod masonry;

pub use drift_core::config::MasonryConfig;
pub use drift_core::geometry::Rect;
pub use masonry::{MasonryItem, MasonryLayout, MasonryPacker, column_count, effective_aspect_ratio};
