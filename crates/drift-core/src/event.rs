#![forbid(unsafe_code)]

//! Canonical input and host notification types.
//!
//! The host (a browser shim or a test) translates platform callbacks into
//! these values. All types are plain data so they can be recorded, replayed
//! and compared in tests.
//!
//! # Design Notes
//!
//! - Pointer coordinates are strip-local pixels (0 = left edge of the strip).
//! - Only the activation keys in [`ActionKeys`] reach the hold controls; other
//!   keys map to [`KeyCode::Other`] and are ignored.
//! - Scroll positions are document pixels as reported by the platform.

use bitflags::bitflags;

use crate::geometry::Size;

/// Kind of device behind a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    /// Touch input has no hover; edge-zone detection ignores it.
    Touch,
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Auxiliary,
}

/// A pointer sample over a strip or control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Platform pointer identifier. `0` is reserved as invalid.
    pub pointer_id: u32,
    /// Device kind.
    pub kind: PointerKind,
    /// Button involved in a down/up transition.
    pub button: PointerButton,
    /// Strip-local x coordinate in pixels.
    pub x: f64,
    /// Strip-local y coordinate in pixels.
    pub y: f64,
}

impl PointerEvent {
    /// Create a primary-button mouse pointer sample.
    #[must_use]
    pub const fn mouse(pointer_id: u32, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Mouse,
            button: PointerButton::Primary,
            x,
            y,
        }
    }

    /// Set the device kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: PointerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the button.
    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }
}

bitflags! {
    /// Set of keys that activate a momentary hold control.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ActionKeys: u8 {
        const ENTER = 0b01;
        const SPACE = 0b10;
    }
}

/// Key codes relevant to the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Enter,
    Space,
    Escape,
    /// Any key the feed does not react to.
    Other,
}

impl KeyCode {
    /// The activation key flag for this code, if it is one.
    #[must_use]
    pub const fn action_key(self) -> Option<ActionKeys> {
        match self {
            Self::Enter => Some(ActionKeys::ENTER),
            Self::Space => Some(ActionKeys::SPACE),
            Self::Escape | Self::Other => None,
        }
    }
}

/// Press/repeat/release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    /// Auto-repeat while held.
    Repeat,
    Release,
}

/// A keyboard event targeted at a hold control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a key press.
    #[must_use]
    pub const fn press(code: KeyCode) -> Self {
        Self {
            code,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key release.
    #[must_use]
    pub const fn release(code: KeyCode) -> Self {
        Self {
            code,
            kind: KeyEventKind::Release,
        }
    }

    /// Create an auto-repeat press.
    #[must_use]
    pub const fn repeat(code: KeyCode) -> Self {
        Self {
            code,
            kind: KeyEventKind::Repeat,
        }
    }
}

/// Asynchronous notifications delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostNotification {
    /// The document scrolled; `position` is the current vertical offset.
    Scroll { position: f64 },
    /// The viewport changed size.
    Resize { viewport: Size },
    /// The observed list or gallery changed size (images finished loading).
    ContentResized,
    /// The user's reduce-motion preference changed.
    ReduceMotionChanged(bool),
    /// The user started a wheel/touch scroll gesture.
    UserScrollStarted,
    /// The window lost focus.
    Blur,
    /// The page became hidden.
    VisibilityHidden,
}

impl HostNotification {
    /// Whether this notification invalidates measured geometry.
    #[must_use]
    pub const fn is_resize_like(&self) -> bool {
        matches!(self, Self::Resize { .. } | Self::ContentResized)
    }
}
