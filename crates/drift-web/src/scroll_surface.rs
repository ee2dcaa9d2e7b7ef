#![forbid(unsafe_code)]

//! The document scroll surface the host exposes to the engine.
//!
//! [`ScrollSurface`] is the only way the engine reads or writes scroll
//! geometry. A browser shim implements it over the window; tests use
//! [`FakeScrollSurface`], which clamps like a real document and queues the
//! asynchronous scroll notification a real platform would deliver later.
//!
//! # Design Notes
//!
//! - Writes that do not move the position queue nothing, matching platforms
//!   that suppress no-op scroll events.
//! - Notifications are only delivered when the test drains them, so a test
//!   controls exactly when "the platform" answers.

use std::collections::VecDeque;

use drift_core::event::HostNotification;
use drift_core::geometry::Size;

/// Scroll geometry read/write access.
pub trait ScrollSurface {
    /// Current vertical scroll offset.
    fn scroll_position(&self) -> f64;

    /// Jump to `position` without animation.
    fn scroll_to(&mut self, position: f64);

    /// Jump by `delta` without animation.
    fn scroll_by(&mut self, delta: f64) {
        let position = self.scroll_position() + delta;
        self.scroll_to(position);
    }

    /// Total scrollable content height.
    fn content_height(&self) -> f64;

    /// Visible viewport size.
    fn viewport(&self) -> Size;
}

/// In-memory document with a deferred notification queue.
#[derive(Debug, Clone, Default)]
pub struct FakeScrollSurface {
    position: f64,
    content_height: f64,
    viewport: Size,
    queue: VecDeque<HostNotification>,
    writes: u32,
}

impl FakeScrollSurface {
    #[must_use]
    pub fn new(viewport: Size, content_height: f64) -> Self {
        Self {
            viewport,
            content_height,
            ..Self::default()
        }
    }

    fn max_position(&self) -> f64 {
        (self.content_height - self.viewport.height).max(0.0)
    }

    fn move_to(&mut self, position: f64) {
        if !position.is_finite() {
            return;
        }
        let clamped = position.clamp(0.0, self.max_position());
        if clamped != self.position {
            self.position = clamped;
            self.queue.push_back(HostNotification::Scroll { position: clamped });
        }
    }

    /// Simulate a user wheel/touch scroll to `position`.
    pub fn user_scroll_to(&mut self, position: f64) {
        self.queue.push_back(HostNotification::UserScrollStarted);
        self.move_to(position);
    }

    /// Change the content height and queue a content-resize notification.
    pub fn set_content_height(&mut self, height: f64) {
        self.content_height = height.max(0.0);
        self.queue.push_back(HostNotification::ContentResized);
        let clamped = self.position.min(self.max_position());
        self.move_to(clamped);
    }

    /// Change the viewport and queue a resize notification.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.queue.push_back(HostNotification::Resize { viewport });
    }

    /// Queue an arbitrary notification.
    pub fn push_notification(&mut self, notification: HostNotification) {
        self.queue.push_back(notification);
    }

    /// Take every queued notification in delivery order.
    pub fn drain_notifications(&mut self) -> Vec<HostNotification> {
        self.queue.drain(..).collect()
    }

    #[must_use]
    pub fn pending_notifications(&self) -> usize {
        self.queue.len()
    }

    /// Number of programmatic writes received.
    #[must_use]
    pub const fn write_count(&self) -> u32 {
        self.writes
    }
}

impl ScrollSurface for FakeScrollSurface {
    fn scroll_position(&self) -> f64 {
        self.position
    }

    fn scroll_to(&mut self, position: f64) {
        self.writes = self.writes.saturating_add(1);
        self.move_to(position);
    }

    fn content_height(&self) -> f64 {
        self.content_height
    }

    fn viewport(&self) -> Size {
        self.viewport
    }
}
