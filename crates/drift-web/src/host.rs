#![forbid(unsafe_code)]

//! Frame-driven orchestration of one feed page.
//!
//! [`FeedHost`] owns every engine component a page needs: the shared
//! [`FrameClock`], the marquee [`TrackArena`] with per-strip input
//! controllers, exactly one loop controller (chosen by
//! [`LoopStrategy`]), the masonry packer, the notification coalescer and at
//! most one programmatic smooth scroll.
//!
//! # Frame pipeline
//!
//! ```text
//! platform callbacks ──▶ push_notification / strip_* / hold_input
//!                              │ (scroll + resize coalesced)
//!                              ▼
//! advance_frame(now):  1. flush coalescer (resize, then scroll)
//!                      2. run due frame tasks (corrections, smooth steps)
//!                      3. tick every track
//!                              │
//!                              ▼
//!                         HostOutputs
//! ```
//!
//! # Invariants
//!
//! 1. At most one loop correction frame task is outstanding.
//! 2. At most one smooth scroll runs; a user scroll gesture cancels it and
//!    its frame task in the same call.
//! 3. Track modes change only through input controllers and
//!    [`FeedHost::set_track_mode`]; offsets change only in step 3.
//!
//! # Failure Modes
//!
//! - Unmeasured tracks, galleries or documents produce no output until a
//!   later measurement succeeds.
//! - Operations for the inactive loop strategy return
//!   [`HostError::StrategyMismatch`].

use std::collections::BTreeMap;
use std::time::Duration;

use drift_core::config::{FeedConfig, LoopStrategy};
use drift_core::event::{HostNotification, PointerEvent};
use drift_core::event_coalescer::NotificationCoalescer;
use drift_core::frame_clock::{FrameClock, FrameHandle, SubscriberId};
use drift_core::geometry::ready_extent;
use drift_layout::{MasonryLayout, MasonryPacker};
use drift_runtime::{
    ItemId, LoopAction, PageLoopController, RecycleEffect, RecycleItem, RecyclePass,
    RecyclingLoopController, SmoothScroll, TrackArena, TrackId, TrackMode, TrackTranslation,
};
use tracing::{debug, trace};

use crate::{HostClock, HostError};
use crate::edge_zone::EdgeZoneInputController;
use crate::hold_control::{
    CaptureCommand, HoldButton, HoldControl, HoldDispatch, HoldInput, HoldLogEntry,
    HoldTransition,
};
use crate::scroll_surface::ScrollSurface;

/// One-shot work scheduled on the frame clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameTask {
    /// Run the pending wraparound correction.
    LoopCorrection,
    /// Advance the programmatic smooth scroll.
    SmoothScrollStep,
}

/// A programmatic scroll write the host performed on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollWrite {
    JumpTo(f64),
    ScrollBy(f64),
}

/// A track mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    pub track: TrackId,
    pub from: TrackMode,
    pub to: TrackMode,
}

/// Everything the page should apply after a host call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostOutputs {
    /// Frame index, if these outputs closed a frame.
    pub frame: Option<u64>,
    /// One translation per live track, in creation order.
    pub translations: Vec<TrackTranslation>,
    /// Scroll writes already applied to the surface.
    pub scroll_writes: Vec<ScrollWrite>,
    /// Pointer-capture commands for the hold buttons.
    pub capture_commands: Vec<CaptureCommand>,
    /// Node moves to mirror in the recycled list.
    pub recycle_effects: Vec<RecycleEffect>,
    /// Gallery placement, when it was recomputed.
    pub masonry: Option<MasonryLayout>,
    pub mode_changes: Vec<ModeChange>,
    /// Hold-button dispatch log.
    pub log: Vec<HoldLogEntry>,
}

impl HostOutputs {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
            && self.scroll_writes.is_empty()
            && self.capture_commands.is_empty()
            && self.recycle_effects.is_empty()
            && self.masonry.is_none()
            && self.mode_changes.is_empty()
            && self.log.is_empty()
    }
}

#[derive(Debug, Clone)]
enum LoopController {
    Wraparound(PageLoopController),
    Recycling(RecyclingLoopController),
}

impl LoopController {
    const fn strategy(&self) -> LoopStrategy {
        match self {
            Self::Wraparound(_) => LoopStrategy::Wraparound,
            Self::Recycling(_) => LoopStrategy::Recycling,
        }
    }
}

#[derive(Debug, Clone)]
struct StripControls {
    edge: EdgeZoneInputController,
    prev: HoldControl,
    next: HoldControl,
    subscriber: SubscriberId,
}

impl StripControls {
    fn hold_mut(&mut self, button: HoldButton) -> &mut HoldControl {
        match button {
            HoldButton::Prev => &mut self.prev,
            HoldButton::Next => &mut self.next,
        }
    }

    fn hold(&self, button: HoldButton) -> &HoldControl {
        match button {
            HoldButton::Prev => &self.prev,
            HoldButton::Next => &self.next,
        }
    }

    /// Fold a hold transition into the edge controller.
    fn apply_transition(
        &mut self,
        button: HoldButton,
        transition: HoldTransition,
    ) -> Option<TrackMode> {
        match transition {
            HoldTransition::Started(mode) => self.edge.begin_hold(mode),
            HoldTransition::Ended => {
                let other = match button {
                    HoldButton::Prev => HoldButton::Next,
                    HoldButton::Next => HoldButton::Prev,
                };
                if self.hold(other).is_held() {
                    self.edge.begin_hold(other.mode())
                } else {
                    self.edge.end_hold()
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct ActiveSmoothScroll {
    animation: SmoothScroll,
    handle: FrameHandle,
    primed: bool,
}

/// Orchestrates one feed page over a [`ScrollSurface`].
#[derive(Debug)]
pub struct FeedHost<S> {
    config: FeedConfig,
    surface: S,
    clock: FrameClock<FrameTask>,
    tracks: TrackArena,
    strips: BTreeMap<TrackId, StripControls>,
    loop_controller: LoopController,
    correction: Option<FrameHandle>,
    packer: MasonryPacker,
    gallery: Vec<f64>,
    gallery_width: Option<f64>,
    coalescer: NotificationCoalescer,
    smooth: Option<ActiveSmoothScroll>,
    outputs: HostOutputs,
}

impl<S: ScrollSurface> FeedHost<S> {
    /// Create a host for a validated configuration.
    pub fn new(config: FeedConfig, surface: S) -> Result<Self, HostError> {
        let config = config.into_validated()?;
        let loop_controller = match config.loop_strategy {
            LoopStrategy::Wraparound => LoopController::Wraparound(PageLoopController::new()),
            LoopStrategy::Recycling => {
                LoopController::Recycling(RecyclingLoopController::new(config.recycle))
            }
        };
        let mut tracks = TrackArena::new();
        tracks.set_reduce_motion(config.reduce_motion);
        debug!(
            target: "drift.host",
            strategy = config.loop_strategy.as_str(),
            reduce_motion = config.reduce_motion,
            "feed host created"
        );
        Ok(Self {
            packer: MasonryPacker::new(config.masonry),
            config,
            surface,
            clock: FrameClock::new(),
            tracks,
            strips: BTreeMap::new(),
            loop_controller,
            correction: None,
            gallery: Vec::new(),
            gallery_width: None,
            coalescer: NotificationCoalescer::new(),
            smooth: None,
            outputs: HostOutputs::default(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &FeedConfig {
        &self.config
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub const fn tracks(&self) -> &TrackArena {
        &self.tracks
    }

    #[must_use]
    pub const fn loop_strategy(&self) -> LoopStrategy {
        self.loop_controller.strategy()
    }

    /// The wraparound page restores its own return position, so the host
    /// page should turn off the platform's scroll restoration.
    #[must_use]
    pub const fn wants_manual_scroll_restoration(&self) -> bool {
        matches!(self.loop_controller, LoopController::Wraparound(_))
    }

    /// Whether the host should request another platform frame.
    #[must_use]
    pub fn wants_frame(&self) -> bool {
        self.clock.wants_frame() || self.coalescer.has_pending()
    }

    #[must_use]
    pub fn is_smooth_scrolling(&self) -> bool {
        self.smooth.is_some()
    }

    /// Current wraparound controller, if that strategy is active.
    #[must_use]
    pub fn page_loop(&self) -> Option<&PageLoopController> {
        match &self.loop_controller {
            LoopController::Wraparound(c) => Some(c),
            LoopController::Recycling(_) => None,
        }
    }

    /// Current recycling controller, if that strategy is active.
    #[must_use]
    pub fn recycling(&self) -> Option<&RecyclingLoopController> {
        match &self.loop_controller {
            LoopController::Recycling(c) => Some(c),
            LoopController::Wraparound(_) => None,
        }
    }

    // ------------------------------------------------------------------
    // Tracks and strip input
    // ------------------------------------------------------------------

    /// Create the track for strip `row` and subscribe it to the frame clock.
    pub fn register_track(&mut self, row: usize) -> TrackId {
        let id = self.tracks.insert_row(&self.config.marquee, row);
        let subscriber = self.clock.subscribe();
        self.strips.insert(
            id,
            StripControls {
                edge: EdgeZoneInputController::new(self.config.edge),
                prev: HoldControl::new(HoldButton::Prev),
                next: HoldControl::new(HoldButton::Next),
                subscriber,
            },
        );
        debug!(target: "drift.host", track = id.get(), row, "track registered");
        id
    }

    /// Drop a track and its frame subscription.
    pub fn remove_track(&mut self, id: TrackId) -> Result<(), HostError> {
        let strip = self.strips.remove(&id).ok_or(HostError::UnknownTrack(id))?;
        self.clock.unsubscribe(strip.subscriber);
        self.tracks.remove(id);
        Ok(())
    }

    /// Feed a strip's measurements. Returns `true` once the track is ready.
    pub fn measure_track(
        &mut self,
        id: TrackId,
        rendered_width: f64,
        strip_width: f64,
    ) -> Result<bool, HostError> {
        let strip = self.strips.get_mut(&id).ok_or(HostError::UnknownTrack(id))?;
        strip.edge.set_strip_width(strip_width);
        let track = self.tracks.get_mut(id).ok_or(HostError::UnknownTrack(id))?;
        Ok(track.compute_metrics(rendered_width))
    }

    /// Set a track's mode directly (navigation transitions use `Manual`).
    pub fn set_track_mode(&mut self, id: TrackId, mode: TrackMode) -> Result<bool, HostError> {
        if !self.strips.contains_key(&id) {
            return Err(HostError::UnknownTrack(id));
        }
        Ok(self.apply_mode(id, mode))
    }

    /// Place a `Manual` track. Returns `false` in any other mode.
    pub fn set_manual_offset(&mut self, id: TrackId, offset: f64) -> Result<bool, HostError> {
        let track = self.tracks.get_mut(id).ok_or(HostError::UnknownTrack(id))?;
        Ok(track.set_manual_offset(offset))
    }

    /// Pointer moved over a strip.
    pub fn strip_pointer_move(
        &mut self,
        id: TrackId,
        event: &PointerEvent,
    ) -> Result<(), HostError> {
        let strip = self.strips.get_mut(&id).ok_or(HostError::UnknownTrack(id))?;
        if let Some(mode) = strip.edge.pointer_move(event) {
            self.apply_mode(id, mode);
        }
        Ok(())
    }

    /// Pointer left a strip.
    pub fn strip_pointer_leave(&mut self, id: TrackId) -> Result<(), HostError> {
        let strip = self.strips.get_mut(&id).ok_or(HostError::UnknownTrack(id))?;
        if let Some(mode) = strip.edge.pointer_leave() {
            self.apply_mode(id, mode);
        }
        Ok(())
    }

    /// Feed one input to a strip's hold button.
    ///
    /// The returned dispatch carries the capture command the page must apply
    /// synchronously; it is also appended to the pending outputs.
    pub fn hold_input(
        &mut self,
        id: TrackId,
        button: HoldButton,
        input: HoldInput,
    ) -> Result<HoldDispatch, HostError> {
        let strip = self.strips.get_mut(&id).ok_or(HostError::UnknownTrack(id))?;
        let dispatch = strip.hold_mut(button).handle(input);
        let mode = dispatch
            .transition
            .and_then(|t| strip.apply_transition(button, t));
        self.record_dispatch(&dispatch);
        if let Some(mode) = mode {
            self.apply_mode(id, mode);
        }
        Ok(dispatch)
    }

    fn record_dispatch(&mut self, dispatch: &HoldDispatch) {
        if let Some(command) = dispatch.capture_command {
            self.outputs.capture_commands.push(command);
        }
        self.outputs.log.push(dispatch.log);
    }

    fn interrupt_holds(&mut self, hidden: bool) {
        let ids: Vec<TrackId> = self.strips.keys().copied().collect();
        for id in ids {
            let mut modes = Vec::new();
            let mut dispatches = Vec::new();
            if let Some(strip) = self.strips.get_mut(&id) {
                for button in [HoldButton::Prev, HoldButton::Next] {
                    if !strip.hold(button).is_held() {
                        continue;
                    }
                    let hold = strip.hold_mut(button);
                    let dispatch = if hidden {
                        hold.visibility_hidden()
                    } else {
                        hold.blur()
                    };
                    if let Some(mode) = dispatch
                        .transition
                        .and_then(|t| strip.apply_transition(button, t))
                    {
                        modes.push(mode);
                    }
                    dispatches.push(dispatch);
                }
            }
            for dispatch in &dispatches {
                self.record_dispatch(dispatch);
            }
            for mode in modes {
                self.apply_mode(id, mode);
            }
        }
    }

    fn apply_mode(&mut self, id: TrackId, mode: TrackMode) -> bool {
        let Some(from) = self.tracks.get(id).map(|t| t.mode()) else {
            return false;
        };
        let changed = self.tracks.set_mode(id, mode);
        if changed {
            self.outputs.mode_changes.push(ModeChange {
                track: id,
                from,
                to: mode,
            });
        }
        changed
    }

    // ------------------------------------------------------------------
    // Loop controllers
    // ------------------------------------------------------------------

    /// Restore `target` on the next resize pass (wraparound only).
    pub fn set_return_scroll(&mut self, target: f64) -> Result<(), HostError> {
        let active = self.loop_controller.strategy();
        match &mut self.loop_controller {
            LoopController::Wraparound(c) => {
                c.set_return_scroll(target);
                Ok(())
            }
            LoopController::Recycling(_) => Err(HostError::StrategyMismatch {
                required: LoopStrategy::Wraparound,
                active,
            }),
        }
    }

    /// Replace the recycled list (recycling only).
    pub fn set_recycle_items(
        &mut self,
        list_top: f64,
        items: impl IntoIterator<Item = RecycleItem>,
    ) -> Result<(), HostError> {
        let c = self.recycling_mut()?;
        c.set_list_top(list_top);
        c.set_items(items);
        Ok(())
    }

    /// Update one recycled item's height (recycling only).
    pub fn set_recycle_item_height(&mut self, id: ItemId, height: f64) -> Result<bool, HostError> {
        Ok(self.recycling_mut()?.set_item_height(id, height))
    }

    fn recycling_mut(&mut self) -> Result<&mut RecyclingLoopController, HostError> {
        let active = self.loop_controller.strategy();
        match &mut self.loop_controller {
            LoopController::Recycling(c) => Ok(c),
            LoopController::Wraparound(_) => Err(HostError::StrategyMismatch {
                required: LoopStrategy::Recycling,
                active,
            }),
        }
    }

    fn apply_loop_action(&mut self, action: LoopAction) {
        match action {
            LoopAction::Idle => {}
            LoopAction::ScheduleCorrection => {
                if self.correction.is_none() {
                    self.correction = Some(self.clock.request_frame(FrameTask::LoopCorrection));
                }
            }
            LoopAction::JumpTo(position) => self.jump_to(position),
        }
    }

    fn apply_recycle_pass(&mut self, pass: RecyclePass) {
        if pass.scroll_delta != 0.0 {
            self.surface.scroll_by(pass.scroll_delta);
            self.outputs
                .scroll_writes
                .push(ScrollWrite::ScrollBy(pass.scroll_delta));
        }
        self.outputs.recycle_effects.extend(pass.effects);
    }

    fn jump_to(&mut self, position: f64) {
        self.surface.scroll_to(position);
        self.outputs.scroll_writes.push(ScrollWrite::JumpTo(position));
    }

    fn run_correction(&mut self) {
        self.correction = None;
        let live = self.surface.scroll_position();
        let LoopController::Wraparound(c) = &mut self.loop_controller else {
            return;
        };
        let Some(target) = c.apply_correction(live) else {
            return;
        };
        if let Some(smooth) = &mut self.smooth {
            smooth.animation.shift(target - live);
        }
        self.jump_to(target);
    }

    // ------------------------------------------------------------------
    // Gallery
    // ------------------------------------------------------------------

    /// Replace the gallery's aspect ratios and re-pack.
    pub fn set_gallery(&mut self, aspect_ratios: Vec<f64>) {
        self.gallery = aspect_ratios;
        self.relayout_gallery();
    }

    /// Record the gallery container width and re-pack.
    pub fn set_gallery_width(&mut self, width: f64) {
        self.gallery_width = ready_extent(width);
        self.relayout_gallery();
    }

    fn relayout_gallery(&mut self) {
        let Some(width) = self.gallery_width else {
            return;
        };
        if self.gallery.is_empty() {
            return;
        }
        let layout = self.packer.pack_cached(width, &self.gallery);
        trace!(
            target: "drift.host",
            columns = layout.column_count,
            height = layout.height,
            "gallery packed"
        );
        self.outputs.masonry = Some(layout.clone());
    }

    // ------------------------------------------------------------------
    // Smooth scroll
    // ------------------------------------------------------------------

    /// Animate the document to `target`. Jumps directly under reduce motion.
    pub fn smooth_scroll_to(&mut self, target: f64) {
        self.cancel_smooth_scroll();
        let start = self.surface.scroll_position();
        if self.config.reduce_motion {
            self.jump_to(target);
            return;
        }
        let duration = Duration::from_millis(self.config.scroll.smooth_duration_ms);
        let Some(animation) = SmoothScroll::new(start, target, duration) else {
            return;
        };
        let handle = self.clock.request_frame(FrameTask::SmoothScrollStep);
        self.smooth = Some(ActiveSmoothScroll {
            animation,
            handle,
            primed: false,
        });
    }

    /// Stop a running smooth scroll and drop its frame task.
    pub fn cancel_smooth_scroll(&mut self) {
        if let Some(mut smooth) = self.smooth.take() {
            smooth.animation.cancel();
            self.clock.cancel_frame(smooth.handle);
        }
    }

    fn step_smooth_scroll(&mut self, handle: FrameHandle, delta: Duration) {
        let Some(mut smooth) = self.smooth.take() else {
            return;
        };
        if smooth.handle != handle {
            self.smooth = Some(smooth);
            return;
        }
        // The first frame only establishes the time base.
        let delta = if smooth.primed { delta } else { Duration::ZERO };
        smooth.primed = true;
        let Some(step) = smooth.animation.step(delta) else {
            return;
        };
        if step.position != self.surface.scroll_position() {
            self.jump_to(step.position);
        }
        if !step.done {
            smooth.handle = self.clock.request_frame(FrameTask::SmoothScrollStep);
            self.smooth = Some(smooth);
        }
    }

    // ------------------------------------------------------------------
    // Notifications and frames
    // ------------------------------------------------------------------

    /// Deliver one platform notification.
    ///
    /// Scroll and resize notifications are coalesced until the next frame;
    /// everything else is handled now.
    pub fn push_notification(&mut self, notification: HostNotification) {
        let Some(immediate) = self.coalescer.push(notification) else {
            return;
        };
        match immediate {
            HostNotification::ReduceMotionChanged(reduce_motion) => {
                self.set_reduce_motion(reduce_motion);
            }
            HostNotification::UserScrollStarted => self.cancel_smooth_scroll(),
            HostNotification::Blur => self.interrupt_holds(false),
            HostNotification::VisibilityHidden => {
                self.interrupt_holds(true);
                self.clock.reset();
            }
            HostNotification::Scroll { .. }
            | HostNotification::Resize { .. }
            | HostNotification::ContentResized => self.dispatch(immediate),
        }
    }

    fn set_reduce_motion(&mut self, reduce_motion: bool) {
        if self.config.reduce_motion == reduce_motion {
            return;
        }
        debug!(target: "drift.host", reduce_motion, "motion preference changed");
        self.config.reduce_motion = reduce_motion;
        self.tracks.set_reduce_motion(reduce_motion);
        if reduce_motion {
            self.cancel_smooth_scroll();
        }
        if let LoopController::Recycling(c) = &mut self.loop_controller {
            let pass = c.reset();
            self.apply_recycle_pass(pass);
        }
    }

    fn dispatch(&mut self, notification: HostNotification) {
        trace!(target: "drift.host", ?notification, "dispatch");
        match notification {
            HostNotification::Scroll { position } => match &mut self.loop_controller {
                LoopController::Wraparound(c) => {
                    let action = c.on_scroll(position);
                    self.apply_loop_action(action);
                }
                LoopController::Recycling(c) => {
                    let pass = c.on_scroll(position);
                    self.apply_recycle_pass(pass);
                }
            },
            HostNotification::Resize { .. } | HostNotification::ContentResized => {
                let total = self.surface.content_height();
                let current = self.surface.scroll_position();
                match &mut self.loop_controller {
                    LoopController::Wraparound(c) => {
                        let action = c.run_resize_tasks(total, current);
                        self.apply_loop_action(action);
                    }
                    LoopController::Recycling(c) => {
                        if matches!(notification, HostNotification::Resize { .. }) {
                            let pass = c.reset();
                            self.apply_recycle_pass(pass);
                        }
                    }
                }
                self.relayout_gallery();
            }
            HostNotification::ReduceMotionChanged(_)
            | HostNotification::UserScrollStarted
            | HostNotification::Blur
            | HostNotification::VisibilityHidden => {}
        }
    }

    /// Deliver one frame at host time `now` and return everything to apply.
    pub fn advance_frame(&mut self, now: Duration) -> HostOutputs {
        let tick = self.clock.advance(now);
        self.outputs.frame = Some(tick.index);
        let delta = tick.delta;
        let delta_seconds = tick.delta_seconds();

        let mut pending = Vec::with_capacity(2);
        self.coalescer.flush_each(|n| pending.push(n));
        for notification in pending {
            self.dispatch(notification);
        }

        for (handle, task) in tick.tasks {
            match task {
                FrameTask::LoopCorrection => {
                    if self.correction == Some(handle) {
                        self.run_correction();
                    }
                }
                FrameTask::SmoothScrollStep => self.step_smooth_scroll(handle, delta),
            }
        }

        if !self.clock.subscribers().is_empty() {
            let translations = self.tracks.tick_all(delta_seconds);
            self.outputs.translations.extend(translations);
        }
        self.take_outputs()
    }

    /// Deliver one frame at the time `clock` reports.
    pub fn advance_frame_from<C: HostClock>(&mut self, clock: &C) -> HostOutputs {
        self.advance_frame(clock.now_mono())
    }

    /// Take outputs accumulated since the last frame or take.
    pub fn take_outputs(&mut self) -> HostOutputs {
        std::mem::take(&mut self.outputs)
    }
}
