#![forbid(unsafe_code)]

//! Shared wraparound math for seamless loops.
//!
//! Two shapes of "keep a value inside one cycle" are needed:
//!
//! - [`wrap_offset`]: a horizontal translation kept in `(-cycle, 0]`. Used by
//!   marquee tracks whose content is duplicated once, so translating by any
//!   multiple of one cycle is visually a no-op.
//! - [`fold_into_cycle`]: a scroll position kept in `[0, cycle)`. Used by the
//!   vertical wraparound loop and when folding an injected return target.
//!
//! Both step by whole cycles in either direction rather than taking a single
//! remainder, so the result always lands on the correct side of the
//! half-open interval even after floating point rounding. A value more than
//! [`MAX_WRAP_STEPS`] cycles away (a tab that was backgrounded for an hour)
//! is first reduced with a remainder so the stepping stays bounded.
//!
//! # Invariants
//!
//! 1. `cycle` ready ⇒ `-cycle < wrap_offset(x, cycle) <= 0` for finite `x`.
//! 2. `cycle` ready ⇒ `0 <= fold_into_cycle(x, cycle) < cycle` for finite `x`.
//! 3. Values already in range are returned unchanged.
//!
//! # Failure Modes
//!
//! - Zero, negative or non-finite cycle: `wrap_offset` returns 0 (the track
//!   is not measured yet), `fold_into_cycle` returns `None`.
//! - Non-finite input: treated as 0 / `None`.

use crate::geometry::ready_extent;

/// Upper bound on single-cycle steps before falling back to a remainder.
pub const MAX_WRAP_STEPS: u32 = 64;

/// Wrap a translation into `(-cycle, 0]`.
#[must_use]
pub fn wrap_offset(offset: f64, cycle: f64) -> f64 {
    let Some(cycle) = ready_extent(cycle) else {
        return 0.0;
    };
    if !offset.is_finite() {
        return 0.0;
    }

    let mut value = offset;
    if value.abs() > cycle * f64::from(MAX_WRAP_STEPS) {
        value %= cycle;
    }

    // Step until stable. Each arm moves strictly toward the target interval;
    // the bound only matters for pathological rounding.
    for _ in 0..=MAX_WRAP_STEPS * 2 {
        if value <= -cycle {
            value += cycle;
        } else if value > 0.0 {
            value -= cycle;
        } else {
            return value;
        }
    }
    0.0
}

/// Fold a position into `[0, cycle)`.
///
/// Returns `None` when `cycle` is not a usable extent or `position` is not
/// finite.
#[must_use]
pub fn fold_into_cycle(position: f64, cycle: f64) -> Option<f64> {
    let cycle = ready_extent(cycle)?;
    if !position.is_finite() {
        return None;
    }

    let mut value = position;
    if value.abs() > cycle * f64::from(MAX_WRAP_STEPS) {
        value %= cycle;
    }

    for _ in 0..=MAX_WRAP_STEPS * 2 {
        if value >= cycle {
            value -= cycle;
        } else if value < 0.0 {
            value += cycle;
        } else {
            return Some(value);
        }
    }
    Some(0.0)
}
