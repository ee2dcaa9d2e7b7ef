#![forbid(unsafe_code)]

//! Shared per-frame driver.
//!
//! A [`FrameClock`] is the single source of animation frames for a page. It
//! does not own a platform callback; the host calls [`FrameClock::advance`]
//! from its `requestAnimationFrame` handler (or a test calls it directly)
//! with a monotonic timestamp.
//!
//! Two kinds of work hang off the clock:
//!
//! - **Subscribers** run every frame while registered (marquee tracks).
//! - **One-shot tasks** are scheduled with [`FrameClock::request_frame`] and
//!   delivered exactly once on the next frame unless cancelled first with
//!   their [`FrameHandle`] (scroll corrections, smooth-scroll steps).
//!
//! Tasks are plain data (`T`), so the caller decides how to dispatch them and
//! no closure captures controller state.
//!
//! # Invariants
//!
//! 1. The first frame after construction or [`FrameClock::reset`] has a zero
//!    delta.
//! 2. Deltas are never negative: a timestamp earlier than the previous one
//!    yields a zero delta.
//! 3. A cancelled handle is never delivered.
//! 4. Tasks are delivered in request order.
//! 5. [`FrameClock::wants_frame`] is true iff a subscriber or a task exists.

use std::time::Duration;

/// Identifier of a continuous subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Handle to a scheduled one-shot frame task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Raw handle value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// One delivered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTick<T> {
    /// Monotonic frame counter, starting at 1.
    pub index: u64,
    /// Host timestamp for this frame.
    pub now: Duration,
    /// Time since the previous frame.
    pub delta: Duration,
    /// One-shot tasks due on this frame, in request order.
    pub tasks: Vec<(FrameHandle, T)>,
}

impl<T> FrameTick<T> {
    /// Delta in seconds as `f64`.
    #[must_use]
    pub fn delta_seconds(&self) -> f64 {
        self.delta.as_secs_f64()
    }
}

/// Shared animation frame driver.
#[derive(Debug, Clone)]
pub struct FrameClock<T> {
    last: Option<Duration>,
    frame_index: u64,
    next_id: u64,
    subscribers: Vec<SubscriberId>,
    tasks: Vec<(FrameHandle, T)>,
}

impl<T> Default for FrameClock<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameClock<T> {
    /// Create an idle clock.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: None,
            frame_index: 0,
            next_id: 1,
            subscribers: Vec::new(),
            tasks: Vec::new(),
        }
    }

    /// Register a continuous subscriber.
    pub fn subscribe(&mut self) -> SubscriberId {
        let id = SubscriberId(self.next_raw_id());
        self.subscribers.push(id);
        id
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| *s != id);
        before != self.subscribers.len()
    }

    /// Currently registered subscribers, in registration order.
    #[must_use]
    pub fn subscribers(&self) -> &[SubscriberId] {
        &self.subscribers
    }

    /// Schedule `task` for the next frame.
    pub fn request_frame(&mut self, task: T) -> FrameHandle {
        let handle = FrameHandle(self.next_raw_id());
        self.tasks.push((handle, task));
        handle
    }

    /// Cancel a scheduled task. Returns `true` if it was still pending.
    pub fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|(h, _)| *h != handle);
        before != self.tasks.len()
    }

    /// Whether `handle` is still scheduled.
    #[must_use]
    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.tasks.iter().any(|(h, _)| *h == handle)
    }

    /// Whether the host should request another platform frame.
    #[must_use]
    pub fn wants_frame(&self) -> bool {
        !self.subscribers.is_empty() || !self.tasks.is_empty()
    }

    /// Deliver one frame at host time `now`.
    pub fn advance(&mut self, now: Duration) -> FrameTick<T> {
        let delta = match self.last {
            Some(prev) => now.saturating_sub(prev),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        self.frame_index = self.frame_index.saturating_add(1);
        FrameTick {
            index: self.frame_index,
            now,
            delta,
            tasks: std::mem::take(&mut self.tasks),
        }
    }

    /// Forget the previous timestamp so the next frame has a zero delta.
    ///
    /// Hosts call this when the page becomes visible again if they prefer
    /// not to fast-forward animations across the hidden period.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Number of frames delivered so far.
    #[must_use]
    pub const fn frame_index(&self) -> u64 {
        self.frame_index
    }

    fn next_raw_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    #[test]
    fn first_frame_has_zero_delta() {
        let mut clock: FrameClock<()> = FrameClock::new();
        let tick = clock.advance(Duration::from_secs(5));
        assert_eq!(tick.index, 1);
        assert_eq!(tick.delta, Duration::ZERO);
        let tick = clock.advance(Duration::from_secs(5) + MS_16);
        assert_eq!(tick.delta, MS_16);
        assert_eq!(tick.index, 2);
    }

    #[test]
    fn backwards_time_yields_zero_delta() {
        let mut clock: FrameClock<()> = FrameClock::new();
        clock.advance(Duration::from_secs(2));
        let tick = clock.advance(Duration::from_secs(1));
        assert_eq!(tick.delta, Duration::ZERO);
    }

    #[test]
    fn tasks_delivered_once_in_order() {
        let mut clock = FrameClock::new();
        let a = clock.request_frame("a");
        let b = clock.request_frame("b");
        assert!(clock.is_pending(a));
        let tick = clock.advance(Duration::ZERO);
        assert_eq!(tick.tasks, vec![(a, "a"), (b, "b")]);
        assert!(!clock.is_pending(a));
        assert!(clock.advance(MS_16).tasks.is_empty());
    }

    #[test]
    fn cancelled_task_is_not_delivered() {
        let mut clock = FrameClock::new();
        let a = clock.request_frame(1u8);
        let b = clock.request_frame(2u8);
        assert!(clock.cancel_frame(a));
        assert!(!clock.cancel_frame(a));
        let tick = clock.advance(Duration::ZERO);
        assert_eq!(tick.tasks, vec![(b, 2u8)]);
    }

    #[test]
    fn wants_frame_tracks_subscribers_and_tasks() {
        let mut clock: FrameClock<()> = FrameClock::new();
        assert!(!clock.wants_frame());
        let sub = clock.subscribe();
        assert!(clock.wants_frame());
        assert!(clock.unsubscribe(sub));
        assert!(!clock.unsubscribe(sub));
        assert!(!clock.wants_frame());
        clock.request_frame(());
        assert!(clock.wants_frame());
        let _ = clock.advance(Duration::ZERO);
        assert!(!clock.wants_frame());
    }

    #[test]
    fn reset_zeroes_next_delta() {
        let mut clock: FrameClock<()> = FrameClock::new();
        clock.advance(Duration::from_secs(1));
        clock.reset();
        let tick = clock.advance(Duration::from_secs(100));
        assert_eq!(tick.delta, Duration::ZERO);
    }
}
