#![forbid(unsafe_code)]

//! Wraparound infinite list.
//!
//! The project list is rendered twice back to back, so the document is two
//! identical cycles tall. Whenever the scroll position crosses into the
//! second copy, the controller jumps back by exactly one cycle; the content
//! under the viewport is identical, so the jump is invisible.
//!
//! The controller never touches the platform. It returns a [`LoopAction`]
//! and the host either schedules a frame task (for a correction) or writes
//! the scroll position directly (for a return jump).
//!
//! # Invariants
//!
//! 1. After a correction or return jump, the target position is in
//!    `[0, cycle_height)`.
//! 2. At most one correction is pending at a time.
//! 3. The guard is armed before every programmatic jump and disarmed only by
//!    the next dispatched scroll notification.
//! 4. A correction re-reads the live position when it runs; a position that
//!    dropped back below the cycle in the meantime is left alone.
//!
//! # Failure Modes
//!
//! - Total height zero or non-finite: the cycle is unknown and every
//!   notification is a no-op until the next successful resize pass.
//! - Negative scroll positions (overscroll bounce) are ignored.

use drift_core::geometry::ready_extent;
use drift_core::wrap::fold_into_cycle;
use tracing::{debug, trace};

use crate::loop_guard::{CorrectionGuard, GuardState};

/// Return jumps closer than this to the current position are skipped; the
/// platform would not emit a notification for them.
const JUMP_EPSILON: f64 = 0.5;

/// What the host should do after feeding the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopAction {
    /// Nothing to do.
    Idle,
    /// Request a frame and call [`PageLoopController::apply_correction`]
    /// from it.
    ScheduleCorrection,
    /// Write this scroll position now.
    JumpTo(f64),
}

/// Wraparound loop state.
#[derive(Debug, Clone, Default)]
pub struct PageLoopController {
    cycle_height: Option<f64>,
    guard: CorrectionGuard,
    last_known_position: f64,
    correction_pending: bool,
    pending_return: Option<f64>,
}

impl PageLoopController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the cycle from the doubled list's total height.
    ///
    /// Runs on viewport resize and on content-ready notifications. A pending
    /// return target is folded into the new cycle and jumped to first; then
    /// the current position gets the normal check.
    pub fn run_resize_tasks(&mut self, total_height: f64, current_position: f64) -> LoopAction {
        let Some(cycle) = ready_extent(total_height / 2.0) else {
            trace!(target: "drift.loop", total_height, "loop metrics not ready");
            self.cycle_height = None;
            return LoopAction::Idle;
        };
        self.cycle_height = Some(cycle);
        debug!(target: "drift.loop", cycle_height = cycle, "loop cycle measured");

        if let Some(target) = self.pending_return.take()
            && let Some(folded) = fold_into_cycle(target, cycle)
        {
            if (folded - current_position).abs() > JUMP_EPSILON {
                debug!(target: "drift.loop", target, folded, "restoring return position");
                self.guard.arm();
                self.last_known_position = folded;
                return LoopAction::JumpTo(folded);
            }
        }

        self.last_known_position = current_position;
        self.check(current_position, cycle)
    }

    /// Handle one dispatched scroll notification.
    pub fn on_scroll(&mut self, position: f64) -> LoopAction {
        if !self.guard.on_notification() {
            trace!(target: "drift.loop", position, "own correction notification swallowed");
            self.last_known_position = position;
            return LoopAction::Idle;
        }
        if !position.is_finite() || position < 0.0 {
            return LoopAction::Idle;
        }
        self.last_known_position = position;
        match self.cycle_height {
            Some(cycle) => self.check(position, cycle),
            None => LoopAction::Idle,
        }
    }

    fn check(&mut self, position: f64, cycle: f64) -> LoopAction {
        if position >= cycle && !self.correction_pending {
            self.correction_pending = true;
            trace!(target: "drift.loop", position, cycle, "correction scheduled");
            LoopAction::ScheduleCorrection
        } else {
            LoopAction::Idle
        }
    }

    /// Run the scheduled correction against the live scroll position.
    ///
    /// Returns the position to jump to, with the guard already armed.
    pub fn apply_correction(&mut self, live_position: f64) -> Option<f64> {
        self.correction_pending = false;
        let cycle = self.cycle_height?;
        if !live_position.is_finite() || live_position < cycle {
            return None;
        }
        let target = fold_into_cycle(live_position, cycle)?;
        self.guard.arm();
        self.last_known_position = target;
        debug!(
            target: "drift.loop",
            from = live_position,
            to = target,
            "scroll normalized"
        );
        Some(target)
    }

    /// Forget a scheduled correction whose frame was cancelled.
    pub fn cancel_correction(&mut self) {
        self.correction_pending = false;
    }

    /// Inject a position to restore on the next resize pass.
    pub fn set_return_scroll(&mut self, target: f64) {
        if target.is_finite() {
            self.pending_return = Some(target);
        }
    }

    /// Drop pending work and disarm the guard.
    pub fn reset(&mut self) {
        self.guard.reset();
        self.correction_pending = false;
    }

    #[must_use]
    pub const fn cycle_height(&self) -> Option<f64> {
        self.cycle_height
    }

    #[must_use]
    pub const fn last_known_position(&self) -> f64 {
        self.last_known_position
    }

    #[must_use]
    pub const fn is_correction_pending(&self) -> bool {
        self.correction_pending
    }

    #[must_use]
    pub const fn guard_state(&self) -> GuardState {
        self.guard.state()
    }

    #[must_use]
    pub const fn pending_return(&self) -> Option<f64> {
        self.pending_return
    }
}
