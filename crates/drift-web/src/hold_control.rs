#![forbid(unsafe_code)]

//! Press-and-hold fast-scroll buttons with pointer capture.
//!
//! Each strip carries two discrete buttons. Holding one plays the strip in
//! its fast mode; releasing returns control to hover. This module turns the
//! raw pointer and key lifecycle of one button into hold transitions while
//! enforcing:
//! - one active hold at a time (a second pointer is ignored),
//! - explicit capture acquire/release commands for the host, and
//! - termination on every interruption path (cancel, lost capture, blur,
//!   hidden page).
//!
//! # Invariants
//!
//! 1. A `Release` command is only emitted for a pointer whose capture was
//!    acknowledged with [`HoldControl::capture_acquired`].
//! 2. Every `Started` transition is followed by exactly one `Ended`
//!    transition before the next `Started`.
//! 3. Ignored inputs never change state; they are still logged.
//!
//! # Failure Modes
//!
//! - Capture refused by the platform: recorded via
//!   [`HoldControl::capture_failed`]; the hold continues without capture.
//! - Pointer id `0`: rejected as invalid.

use drift_core::event::{ActionKeys, KeyEvent, KeyEventKind, PointerButton, PointerEvent};
use drift_runtime::TrackMode;
use tracing::trace;

/// Which of a strip's two buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HoldButton {
    /// Reveals earlier content: plays the strip fast to the right.
    Prev,
    /// Reveals later content: plays the strip fast to the left.
    Next,
}

impl HoldButton {
    /// Fast mode this button drives while held.
    #[must_use]
    pub const fn mode(self) -> TrackMode {
        match self {
            Self::Prev => TrackMode::FastRight,
            Self::Next => TrackMode::FastLeft,
        }
    }
}

/// Host pointer-capture command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureCommand {
    Acquire { pointer_id: u32 },
    Release { pointer_id: u32 },
}

/// Lifecycle phase that produced a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoldPhase {
    PointerDown,
    PointerUp,
    PointerCancel,
    LostPointerCapture,
    CaptureAcquired,
    CaptureFailed,
    KeyDown,
    KeyUp,
    Blur,
    VisibilityHidden,
}

/// Why an input was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoldIgnoredReason {
    InvalidPointerId,
    ButtonNotAllowed,
    ActiveHoldInProgress,
    NoActiveHold,
    PointerMismatch,
    KeyRepeat,
    NotActionKey,
    KeyNotHeld,
}

/// Outcome recorded in the dispatch log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoldLogOutcome {
    HoldStarted,
    HoldEnded,
    /// Another activation key joined a keyboard hold.
    HoldExtended,
    /// One of several held keys was released; the hold continues.
    KeyReleased,
    CaptureStateUpdated,
    CaptureFailed,
    Ignored(HoldIgnoredReason),
}

/// One dispatch log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldLogEntry {
    pub button: HoldButton,
    pub phase: HoldPhase,
    /// Sequence number of accepted inputs; `None` for ignored ones.
    pub sequence: Option<u64>,
    pub pointer_id: Option<u32>,
    pub capture_command: Option<CaptureCommand>,
    pub outcome: HoldLogOutcome,
}

/// One lifecycle input for a hold button, as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldInput {
    PointerDown(PointerEvent),
    PointerUp(PointerEvent),
    PointerCancel { pointer_id: u32 },
    LostPointerCapture { pointer_id: u32 },
    CaptureAcquired { pointer_id: u32 },
    CaptureFailed { pointer_id: u32 },
    Key(KeyEvent),
}

/// Hold state change the host should apply to its track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoldTransition {
    Started(TrackMode),
    Ended,
}

/// Result of feeding one input to a [`HoldControl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldDispatch {
    pub transition: Option<HoldTransition>,
    pub capture_command: Option<CaptureCommand>,
    pub log: HoldLogEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureState {
    Requested,
    Acquired,
    Failed,
}

impl CaptureState {
    const fn is_acquired(self) -> bool {
        matches!(self, Self::Acquired)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveHold {
    Pointer {
        pointer_id: u32,
        capture_state: CaptureState,
    },
    Keys(ActionKeys),
}

/// Press-and-hold state machine for one button.
#[derive(Debug, Clone)]
pub struct HoldControl {
    button: HoldButton,
    active: Option<ActiveHold>,
    next_sequence: u64,
}

impl HoldControl {
    #[must_use]
    pub const fn new(button: HoldButton) -> Self {
        Self {
            button,
            active: None,
            next_sequence: 1,
        }
    }

    #[must_use]
    pub const fn button(&self) -> HoldButton {
        self.button
    }

    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.active.is_some()
    }

    /// Pointer holding this button, if the hold is pointer-driven.
    #[must_use]
    pub fn active_pointer_id(&self) -> Option<u32> {
        match self.active {
            Some(ActiveHold::Pointer { pointer_id, .. }) => Some(pointer_id),
            _ => None,
        }
    }

    /// Activation keys holding this button.
    #[must_use]
    pub fn held_keys(&self) -> ActionKeys {
        match self.active {
            Some(ActiveHold::Keys(keys)) => keys,
            _ => ActionKeys::empty(),
        }
    }

    /// Route one input to the matching lifecycle handler.
    pub fn handle(&mut self, input: HoldInput) -> HoldDispatch {
        match input {
            HoldInput::PointerDown(event) => self.pointer_down(&event),
            HoldInput::PointerUp(event) => self.pointer_up(&event),
            HoldInput::PointerCancel { pointer_id } => self.pointer_cancel(pointer_id),
            HoldInput::LostPointerCapture { pointer_id } => self.lost_pointer_capture(pointer_id),
            HoldInput::CaptureAcquired { pointer_id } => self.capture_acquired(pointer_id),
            HoldInput::CaptureFailed { pointer_id } => self.capture_failed(pointer_id),
            HoldInput::Key(event) => self.key(event),
        }
    }

    /// Pointer pressed on the button; begins the hold and requests capture.
    pub fn pointer_down(&mut self, event: &PointerEvent) -> HoldDispatch {
        let phase = HoldPhase::PointerDown;
        let pointer_id = event.pointer_id;
        if pointer_id == 0 {
            return self.ignored(phase, HoldIgnoredReason::InvalidPointerId, Some(pointer_id));
        }
        if event.button != PointerButton::Primary {
            return self.ignored(phase, HoldIgnoredReason::ButtonNotAllowed, Some(pointer_id));
        }
        if self.active.is_some() {
            return self.ignored(
                phase,
                HoldIgnoredReason::ActiveHoldInProgress,
                Some(pointer_id),
            );
        }
        self.active = Some(ActiveHold::Pointer {
            pointer_id,
            capture_state: CaptureState::Requested,
        });
        self.accepted(
            phase,
            Some(pointer_id),
            Some(HoldTransition::Started(self.button.mode())),
            Some(CaptureCommand::Acquire { pointer_id }),
            HoldLogOutcome::HoldStarted,
        )
    }

    /// The platform confirmed pointer capture.
    pub fn capture_acquired(&mut self, pointer_id: u32) -> HoldDispatch {
        self.update_capture(
            HoldPhase::CaptureAcquired,
            pointer_id,
            CaptureState::Acquired,
            HoldLogOutcome::CaptureStateUpdated,
        )
    }

    /// The platform refused pointer capture. The hold continues.
    pub fn capture_failed(&mut self, pointer_id: u32) -> HoldDispatch {
        self.update_capture(
            HoldPhase::CaptureFailed,
            pointer_id,
            CaptureState::Failed,
            HoldLogOutcome::CaptureFailed,
        )
    }

    fn update_capture(
        &mut self,
        phase: HoldPhase,
        pointer_id: u32,
        next: CaptureState,
        outcome: HoldLogOutcome,
    ) -> HoldDispatch {
        match self.active {
            Some(ActiveHold::Pointer {
                pointer_id: active, ..
            }) if active == pointer_id => {
                self.active = Some(ActiveHold::Pointer {
                    pointer_id,
                    capture_state: next,
                });
                self.accepted(phase, Some(pointer_id), None, None, outcome)
            }
            Some(ActiveHold::Pointer { .. }) => {
                self.ignored(phase, HoldIgnoredReason::PointerMismatch, Some(pointer_id))
            }
            _ => self.ignored(phase, HoldIgnoredReason::NoActiveHold, Some(pointer_id)),
        }
    }

    /// Pointer released; ends the hold and releases capture if it was held.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> HoldDispatch {
        self.end_pointer(HoldPhase::PointerUp, event.pointer_id, true)
    }

    /// Platform cancelled the pointer.
    pub fn pointer_cancel(&mut self, pointer_id: u32) -> HoldDispatch {
        self.end_pointer(HoldPhase::PointerCancel, pointer_id, true)
    }

    /// Capture was taken away; the platform already released it.
    pub fn lost_pointer_capture(&mut self, pointer_id: u32) -> HoldDispatch {
        self.end_pointer(HoldPhase::LostPointerCapture, pointer_id, false)
    }

    fn end_pointer(&mut self, phase: HoldPhase, pointer_id: u32, release: bool) -> HoldDispatch {
        match self.active {
            Some(ActiveHold::Pointer {
                pointer_id: active,
                capture_state,
            }) if active == pointer_id => {
                self.active = None;
                let command = (release && capture_state.is_acquired())
                    .then_some(CaptureCommand::Release { pointer_id });
                self.accepted(
                    phase,
                    Some(pointer_id),
                    Some(HoldTransition::Ended),
                    command,
                    HoldLogOutcome::HoldEnded,
                )
            }
            Some(ActiveHold::Pointer { .. }) => {
                self.ignored(phase, HoldIgnoredReason::PointerMismatch, Some(pointer_id))
            }
            _ => self.ignored(phase, HoldIgnoredReason::NoActiveHold, Some(pointer_id)),
        }
    }

    /// Keyboard input while the button is focused.
    ///
    /// Activation keys are momentary: press begins the hold, release of the
    /// last held key ends it. Auto-repeat is ignored.
    pub fn key(&mut self, event: KeyEvent) -> HoldDispatch {
        let phase = match event.kind {
            KeyEventKind::Release => HoldPhase::KeyUp,
            KeyEventKind::Press | KeyEventKind::Repeat => HoldPhase::KeyDown,
        };
        let Some(key) = event.code.action_key() else {
            return self.ignored(phase, HoldIgnoredReason::NotActionKey, None);
        };
        match event.kind {
            KeyEventKind::Repeat => self.ignored(phase, HoldIgnoredReason::KeyRepeat, None),
            KeyEventKind::Press => self.key_down(key),
            KeyEventKind::Release => self.key_up(key),
        }
    }

    fn key_down(&mut self, key: ActionKeys) -> HoldDispatch {
        let phase = HoldPhase::KeyDown;
        match self.active {
            None => {
                self.active = Some(ActiveHold::Keys(key));
                self.accepted(
                    phase,
                    None,
                    Some(HoldTransition::Started(self.button.mode())),
                    None,
                    HoldLogOutcome::HoldStarted,
                )
            }
            Some(ActiveHold::Keys(keys)) if keys.contains(key) => {
                self.ignored(phase, HoldIgnoredReason::KeyRepeat, None)
            }
            Some(ActiveHold::Keys(keys)) => {
                self.active = Some(ActiveHold::Keys(keys | key));
                self.accepted(phase, None, None, None, HoldLogOutcome::HoldExtended)
            }
            Some(ActiveHold::Pointer { .. }) => {
                self.ignored(phase, HoldIgnoredReason::ActiveHoldInProgress, None)
            }
        }
    }

    fn key_up(&mut self, key: ActionKeys) -> HoldDispatch {
        let phase = HoldPhase::KeyUp;
        let Some(ActiveHold::Keys(keys)) = self.active else {
            return self.ignored(phase, HoldIgnoredReason::KeyNotHeld, None);
        };
        if !keys.contains(key) {
            return self.ignored(phase, HoldIgnoredReason::KeyNotHeld, None);
        }
        let remaining = keys.difference(key);
        if remaining.is_empty() {
            self.active = None;
            self.accepted(
                phase,
                None,
                Some(HoldTransition::Ended),
                None,
                HoldLogOutcome::HoldEnded,
            )
        } else {
            self.active = Some(ActiveHold::Keys(remaining));
            self.accepted(phase, None, None, None, HoldLogOutcome::KeyReleased)
        }
    }

    /// Window lost focus; ends any hold.
    pub fn blur(&mut self) -> HoldDispatch {
        self.interrupt(HoldPhase::Blur)
    }

    /// Page became hidden; ends any hold.
    pub fn visibility_hidden(&mut self) -> HoldDispatch {
        self.interrupt(HoldPhase::VisibilityHidden)
    }

    fn interrupt(&mut self, phase: HoldPhase) -> HoldDispatch {
        match self.active.take() {
            None => self.ignored(phase, HoldIgnoredReason::NoActiveHold, None),
            Some(ActiveHold::Keys(_)) => self.accepted(
                phase,
                None,
                Some(HoldTransition::Ended),
                None,
                HoldLogOutcome::HoldEnded,
            ),
            Some(ActiveHold::Pointer {
                pointer_id,
                capture_state,
            }) => self.accepted(
                phase,
                Some(pointer_id),
                Some(HoldTransition::Ended),
                capture_state
                    .is_acquired()
                    .then_some(CaptureCommand::Release { pointer_id }),
                HoldLogOutcome::HoldEnded,
            ),
        }
    }

    fn accepted(
        &mut self,
        phase: HoldPhase,
        pointer_id: Option<u32>,
        transition: Option<HoldTransition>,
        capture_command: Option<CaptureCommand>,
        outcome: HoldLogOutcome,
    ) -> HoldDispatch {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        HoldDispatch {
            transition,
            capture_command,
            log: HoldLogEntry {
                button: self.button,
                phase,
                sequence: Some(sequence),
                pointer_id,
                capture_command,
                outcome,
            },
        }
    }

    fn ignored(
        &self,
        phase: HoldPhase,
        reason: HoldIgnoredReason,
        pointer_id: Option<u32>,
    ) -> HoldDispatch {
        trace!(
            target: "drift.hold",
            button = ?self.button,
            phase = ?phase,
            reason = ?reason,
            "hold input ignored"
        );
        HoldDispatch {
            transition: None,
            capture_command: None,
            log: HoldLogEntry {
                button: self.button,
                phase,
                sequence: None,
                pointer_id,
                capture_command: None,
                outcome: HoldLogOutcome::Ignored(reason),
            },
        }
    }
}
