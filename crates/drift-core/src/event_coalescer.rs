#![forbid(unsafe_code)]

//! Coalescing for high-frequency host notifications.
//!
//! Browsers can deliver dozens of scroll and resize notifications per frame
//! during a fast wheel flick or a continuous window drag. Each one would
//! otherwise trigger a loop correction or a full masonry pass.
//!
//! [`NotificationCoalescer`] keeps:
//! - the latest scroll position (latest wins),
//! - a single pending resize (the latest viewport, or a bare content resize),
//!
//! and passes every other notification through immediately. The caller
//! flushes once per frame, which is what bounds the work to one correction
//! per controller per frame.
//!
//! # Usage
//!
//! ```
//! use drift_core::event::HostNotification;
//! use drift_core::event_coalescer::NotificationCoalescer;
//!
//! let mut coalescer = NotificationCoalescer::new();
//! assert!(coalescer.push(HostNotification::Scroll { position: 10.0 }).is_none());
//! assert!(coalescer.push(HostNotification::Scroll { position: 40.0 }).is_none());
//!
//! let pending = coalescer.flush();
//! assert_eq!(pending, vec![HostNotification::Scroll { position: 40.0 }]);
//! ```

use crate::event::HostNotification;
use crate::geometry::Size;

/// Coalesces scroll and resize notification storms.
///
/// Not thread-safe; intended for the single event-processing turn.
///
/// All operations are O(1). At most one resize and one scroll are pending.
#[derive(Debug, Clone, Default)]
pub struct NotificationCoalescer {
    /// Latest scroll position.
    pending_scroll: Option<f64>,
    /// Number of scroll notifications folded into `pending_scroll`.
    scroll_count: u32,
    /// Pending resize, if any.
    pending_resize: Option<PendingResize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PendingResize {
    /// Only content changed size.
    Content,
    /// The viewport changed (implies content may have reflowed too).
    Viewport(Size),
}

impl NotificationCoalescer {
    /// Create an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a notification.
    ///
    /// Returns `Some(notification)` if it should be processed now, or `None`
    /// if it was folded into pending state.
    ///
    /// # Coalescing Rules
    ///
    /// - **Scroll**: replaces any pending scroll.
    /// - **Resize**: replaces any pending resize; a viewport resize wins over
    ///   a pending content resize.
    /// - **ContentResized**: pending unless a viewport resize is already
    ///   pending (which subsumes it).
    /// - **Everything else**: returned immediately; flush is NOT automatic.
    pub fn push(&mut self, notification: HostNotification) -> Option<HostNotification> {
        match notification {
            HostNotification::Scroll { position } => {
                self.pending_scroll = Some(position);
                self.scroll_count = self.scroll_count.saturating_add(1);
                None
            }
            HostNotification::Resize { viewport } => {
                self.pending_resize = Some(PendingResize::Viewport(viewport));
                None
            }
            HostNotification::ContentResized => {
                if self.pending_resize.is_none() {
                    self.pending_resize = Some(PendingResize::Content);
                }
                None
            }
            other => Some(other),
        }
    }

    /// Flush pending notifications.
    ///
    /// Order: resize first (geometry must be current before a scroll is
    /// judged against it), then scroll.
    #[must_use]
    pub fn flush(&mut self) -> Vec<HostNotification> {
        let mut out = Vec::with_capacity(2);
        self.flush_each(|n| out.push(n));
        out
    }

    /// Flush pending notifications, calling `f` for each in order.
    pub fn flush_each<F>(&mut self, mut f: F)
    where
        F: FnMut(HostNotification),
    {
        match self.pending_resize.take() {
            Some(PendingResize::Viewport(viewport)) => f(HostNotification::Resize { viewport }),
            Some(PendingResize::Content) => f(HostNotification::ContentResized),
            None => {}
        }
        if let Some(position) = self.pending_scroll.take() {
            f(HostNotification::Scroll { position });
        }
        self.scroll_count = 0;
    }

    /// Whether anything is pending.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending_scroll.is_some() || self.pending_resize.is_some()
    }

    /// Number of scroll notifications folded since the last flush.
    #[must_use]
    pub fn pending_scroll_count(&self) -> u32 {
        self.scroll_count
    }

    /// Discard pending state.
    pub fn clear(&mut self) {
        self.pending_scroll = None;
        self.pending_resize = None;
        self.scroll_count = 0;
    }
}
