#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixels.
//!
//! All measurements that arrive from the host are `f64` and may be zero,
//! negative or non-finite while the page is still laying out. The helpers
//! here turn those into an explicit "ready / not ready" decision so the
//! controllers never divide by a bogus width.
//!
//! # Invariants
//!
//! 1. [`ready_extent`] returns `Some` only for finite values `> 0`.
//! 2. [`Size::is_ready`] holds iff both extents pass [`ready_extent`].
//! 3. [`Rect::bottom`] and [`Rect::right`] never produce NaN from finite input.

/// Returns `Some(value)` if `value` is a usable extent (finite and positive).
#[inline]
#[must_use]
pub fn ready_extent(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Returns `value` if finite, else `fallback`.
#[inline]
#[must_use]
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both extents are finite and positive.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        ready_extent(self.width).is_some() && ready_extent(self.height).is_some()
    }
}

/// An axis-aligned rectangle in pixels.
///
/// Origin is the top-left corner of whatever coordinate space the caller
/// uses (document space for list items, strip-local space for pointers).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Size of the rectangle.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if the point lies inside the rectangle (right/bottom exclusive).
    #[inline]
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Rectangle shifted vertically by `dy`.
    #[inline]
    #[must_use]
    pub fn translate_y(&self, dy: f64) -> Self {
        Self {
            y: self.y + dy,
            ..*self
        }
    }
}
