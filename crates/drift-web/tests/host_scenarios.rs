#![forbid(unsafe_code)]

//! End-to-end scenarios driving [`FeedHost`] through a [`FakeScrollSurface`].
//!
//! The fake surface queues the asynchronous scroll notification a browser
//! would deliver after each programmatic write; `Page::pump` hands them to the
//! host and closes a frame, exactly like one turn of a real page.

use std::time::Duration;

use drift_core::config::{FeedConfig, LoopStrategy};
use drift_core::event::{HostNotification, KeyCode, KeyEvent, PointerEvent};
use drift_core::geometry::Size;
use drift_runtime::{GuardState, ItemId, RecycleEffect, RecycleItem, TrackMode};
use drift_web::{
    CaptureCommand, DeterministicClock, FakeScrollSurface, FeedHost, HoldButton, HoldInput,
    HoldLogOutcome, HostOutputs, ScrollSurface, ScrollWrite,
};
use pretty_assertions::assert_eq;

const FRAME: Duration = Duration::from_millis(16);

struct Page {
    host: FeedHost<FakeScrollSurface>,
    clock: DeterministicClock,
}

impl Page {
    fn new(strategy: LoopStrategy, viewport: Size, content_height: f64) -> Self {
        let config = FeedConfig {
            loop_strategy: strategy,
            ..FeedConfig::default()
        };
        let surface = FakeScrollSurface::new(viewport, content_height);
        Self {
            host: FeedHost::new(config, surface).expect("default config is valid"),
            clock: DeterministicClock::with_frame_interval(FRAME),
        }
    }

    /// Deliver queued platform notifications and close one frame.
    fn pump(&mut self) -> HostOutputs {
        for n in self.host.surface_mut().drain_notifications() {
            self.host.push_notification(n);
        }
        let out = self.host.advance_frame_from(&self.clock);
        self.clock.next_frame();
        out
    }

    fn user_scroll(&mut self, position: f64) -> HostOutputs {
        self.host.surface_mut().user_scroll_to(position);
        self.pump()
    }

    fn position(&self) -> f64 {
        self.host.surface().scroll_position()
    }

    fn guard(&self) -> GuardState {
        self.host
            .page_loop()
            .map_or(GuardState::Idle, |c| c.guard_state())
    }
}

fn wraparound_page() -> Page {
    // Two copies of a 1000px list in a 600px viewport.
    let mut page = Page::new(
        LoopStrategy::Wraparound,
        Size::new(800.0, 600.0),
        2000.0,
    );
    page.host.push_notification(HostNotification::ContentResized);
    page.pump();
    page
}

// ── Wraparound ──────────────────────────────────────────────────────────

#[test]
fn crossing_the_cycle_is_corrected_once_and_guard_clears() {
    let mut page = wraparound_page();

    assert!(page.user_scroll(980.0).scroll_writes.is_empty());
    assert!(page.user_scroll(1020.0).scroll_writes.is_empty());
    let out = page.pump();
    assert_eq!(out.scroll_writes, vec![ScrollWrite::JumpTo(20.0)]);
    assert_eq!(page.position(), 20.0);
    assert_eq!(page.guard(), GuardState::AwaitingOwnNotification);

    // The platform echoes our jump; it is swallowed and nothing else runs.
    let echo = page.pump();
    assert!(echo.scroll_writes.is_empty());
    assert_eq!(page.guard(), GuardState::Idle);

    // The next real crossing is judged normally.
    page.user_scroll(1100.0);
    assert_eq!(page.pump().scroll_writes, vec![ScrollWrite::JumpTo(100.0)]);
}

#[test]
fn burst_of_scrolls_schedules_a_single_correction() {
    let mut page = wraparound_page();
    for position in [1005.0, 1010.0, 1030.0, 1060.0] {
        page.host.surface_mut().user_scroll_to(position);
    }
    page.pump();
    let out = page.pump();
    assert_eq!(out.scroll_writes, vec![ScrollWrite::JumpTo(60.0)]);
    assert!(page.pump().scroll_writes.is_empty());
}

#[test]
fn return_target_is_folded_and_restored_on_first_measure() {
    let mut page = Page::new(
        LoopStrategy::Wraparound,
        Size::new(800.0, 600.0),
        2000.0,
    );
    assert!(page.host.wants_manual_scroll_restoration());
    page.host.set_return_scroll(2350.0).expect("wraparound host");
    page.host.push_notification(HostNotification::ContentResized);
    let out = page.pump();
    assert_eq!(out.scroll_writes, vec![ScrollWrite::JumpTo(350.0)]);
    assert!(page.pump().scroll_writes.is_empty());
    assert_eq!(page.position(), 350.0);
    assert_eq!(page.guard(), GuardState::Idle);
}

#[test]
fn smooth_scroll_past_the_cycle_lands_inside_it() {
    let mut page = wraparound_page();
    page.user_scroll(900.0);
    page.host.smooth_scroll_to(1300.0);
    for _ in 0..80 {
        page.pump();
        if !page.host.is_smooth_scrolling() && !page.host.wants_frame() {
            break;
        }
    }
    page.pump();
    assert!(!page.host.is_smooth_scrolling());
    assert_eq!(page.position(), 300.0);
}

// ── Recycling ───────────────────────────────────────────────────────────

fn recycling_page() -> Page {
    let mut page = Page::new(
        LoopStrategy::Recycling,
        Size::new(800.0, 300.0),
        1000.0,
    );
    page.host
        .set_recycle_items(
            0.0,
            (0..10).map(|i| RecycleItem::new(ItemId::new(i), 100.0)),
        )
        .expect("recycling host");
    page
}

#[test]
fn recycling_moves_head_and_compensates_scroll() {
    let mut page = recycling_page();
    assert!(!page.host.wants_manual_scroll_restoration());

    let out = page.user_scroll(125.0);
    assert_eq!(
        out.recycle_effects,
        vec![RecycleEffect::MovedToTail(ItemId::new(0))]
    );
    assert_eq!(out.scroll_writes, vec![ScrollWrite::ScrollBy(-100.0)]);
    assert_eq!(page.position(), 25.0);

    // The compensation's own notification is stable.
    let echo = page.pump();
    assert!(echo.recycle_effects.is_empty());

    let back = page.user_scroll(24.0);
    assert_eq!(
        back.recycle_effects,
        vec![RecycleEffect::MovedToHead(ItemId::new(0))]
    );
    assert_eq!(back.scroll_writes, vec![ScrollWrite::ScrollBy(100.0)]);
    assert_eq!(page.position(), 124.0);
    assert!(page.pump().recycle_effects.is_empty());
}

#[test]
fn motion_preference_change_unwinds_recycling() {
    let mut page = recycling_page();
    page.user_scroll(125.0);
    page.pump();
    page.host
        .push_notification(HostNotification::ReduceMotionChanged(true));
    let out = page.host.take_outputs();
    assert_eq!(
        out.recycle_effects,
        vec![RecycleEffect::MovedToHead(ItemId::new(0))]
    );
    assert_eq!(out.scroll_writes, vec![ScrollWrite::ScrollBy(100.0)]);
    assert_eq!(page.position(), 125.0);
    assert!(page.host.recycling().is_some_and(|c| c.stack().is_empty()));
}

// ── Gallery ─────────────────────────────────────────────────────────────

#[test]
fn gallery_packs_on_width_and_resize() {
    let mut page = wraparound_page();
    page.host.set_gallery(vec![1.0; 5]);
    assert_eq!(page.host.take_outputs().masonry, None);

    page.host.set_gallery_width(451.0);
    let layout = page
        .host
        .take_outputs()
        .masonry
        .expect("ready width packs");
    assert_eq!(layout.column_count, 2);
    assert_eq!(layout.column_width, 223.0);
    let columns: Vec<usize> = layout.items.iter().map(|i| i.column).collect();
    assert_eq!(columns, vec![0, 1, 0, 1, 0]);

    page.host
        .surface_mut()
        .set_viewport(Size::new(451.0, 600.0));
    let out = page.pump();
    assert_eq!(out.masonry, Some(layout));
}

// ── Strips ──────────────────────────────────────────────────────────────

#[test]
fn hold_button_lifecycle_emits_capture_commands_and_log() {
    let mut page = wraparound_page();
    let track = page.host.register_track(0);
    page.host
        .measure_track(track, 600.0, 1000.0)
        .expect("live track");

    let down = PointerEvent::mouse(7, 10.0, 10.0);
    for input in [
        HoldInput::PointerDown(down),
        HoldInput::CaptureAcquired { pointer_id: 7 },
        HoldInput::PointerUp(down),
    ] {
        page.host
            .hold_input(track, HoldButton::Prev, input)
            .expect("live track");
    }
    let out = page.host.take_outputs();
    assert_eq!(
        out.capture_commands,
        vec![
            CaptureCommand::Acquire { pointer_id: 7 },
            CaptureCommand::Release { pointer_id: 7 },
        ]
    );
    let outcomes: Vec<HoldLogOutcome> = out.log.iter().map(|e| e.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            HoldLogOutcome::HoldStarted,
            HoldLogOutcome::CaptureStateUpdated,
            HoldLogOutcome::HoldEnded,
        ]
    );
    let modes: Vec<(TrackMode, TrackMode)> =
        out.mode_changes.iter().map(|c| (c.from, c.to)).collect();
    assert_eq!(
        modes,
        vec![
            (TrackMode::Base, TrackMode::FastRight),
            (TrackMode::FastRight, TrackMode::Base),
        ]
    );
}

#[test]
fn keyboard_hold_speeds_up_the_strip() {
    let mut page = wraparound_page();
    let track = page.host.register_track(0);
    page.host
        .measure_track(track, 600.0, 1000.0)
        .expect("live track");
    let start = page.pump().translations[0].offset;

    page.host
        .hold_input(track, HoldButton::Next, HoldInput::Key(KeyEvent::press(KeyCode::Space)))
        .expect("live track");
    page.host
        .hold_input(track, HoldButton::Next, HoldInput::Key(KeyEvent::repeat(KeyCode::Space)))
        .expect("live track");
    let out = page.pump();
    // fast duration max(12 * 0.4, 0.65) = 4.8s, so 300 / 4.8 = 62.5 px/s.
    let moved = out.translations[0].offset - start;
    assert!((moved + 62.5 * FRAME.as_secs_f64()).abs() < 1e-9);

    page.host
        .hold_input(track, HoldButton::Next, HoldInput::Key(KeyEvent::release(KeyCode::Space)))
        .expect("live track");
    assert_eq!(
        page.host.tracks().get(track).map(|t| t.mode()),
        Some(TrackMode::Base)
    );
}

#[test]
fn hidden_page_ends_holds_and_restarts_time_base() {
    let mut page = wraparound_page();
    let track = page.host.register_track(0);
    page.host
        .measure_track(track, 600.0, 1000.0)
        .expect("live track");
    page.pump();
    page.host
        .hold_input(
            track,
            HoldButton::Next,
            HoldInput::PointerDown(PointerEvent::mouse(3, 0.0, 0.0)),
        )
        .expect("live track");
    page.host
        .push_notification(HostNotification::VisibilityHidden);
    assert_eq!(
        page.host.tracks().get(track).map(|t| t.mode()),
        Some(TrackMode::Base)
    );
    let before = page.host.tracks().get(track).map(|t| t.offset());
    page.clock.advance(Duration::from_secs(30));
    let out = page.pump();
    assert_eq!(Some(out.translations[0].offset), before);
}
