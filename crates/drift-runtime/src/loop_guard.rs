#![forbid(unsafe_code)]

//! Self-correction guard for programmatic scroll jumps.
//!
//! When a loop controller jumps the document scroll position, the platform
//! answers with a scroll notification of its own. That notification must not
//! be judged as user input, or the controller would correct its own
//! correction. The guard is armed immediately before the jump and disarmed by
//! the next dispatched notification, which it swallows.
//!
//! # Transition table
//!
//! | State                     | Event               | Next                      | Outcome    |
//! |---------------------------|---------------------|---------------------------|------------|
//! | `Idle`                    | `Notification`      | `Idle`                    | `Evaluate` |
//! | `Idle`                    | `CorrectionApplied` | `AwaitingOwnNotification` | `Armed`    |
//! | `Idle`                    | `Reset`             | `Idle`                    | `Cleared`  |
//! | `AwaitingOwnNotification` | `Notification`      | `Idle`                    | `Swallow`  |
//! | `AwaitingOwnNotification` | `CorrectionApplied` | `AwaitingOwnNotification` | `Armed`    |
//! | `AwaitingOwnNotification` | `Reset`             | `Idle`                    | `Cleared`  |
//!
//! Two jumps before the platform reports either of them produce a single
//! coalesced notification, so re-arming does not count.

/// Guard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GuardState {
    #[default]
    Idle,
    /// A programmatic jump was applied; its notification has not arrived.
    AwaitingOwnNotification,
}

/// Inputs to the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardEvent {
    /// A scroll notification was dispatched.
    Notification,
    /// The controller is about to jump the scroll position.
    CorrectionApplied,
    /// Controller reset (resize, teardown).
    Reset,
}

/// What the caller should do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardOutcome {
    /// Judge the notification as real input.
    Evaluate,
    /// The notification was caused by our own jump; ignore it.
    Swallow,
    Armed,
    Cleared,
}

/// Pure transition function.
#[must_use]
pub const fn transition(state: GuardState, event: GuardEvent) -> (GuardState, GuardOutcome) {
    use GuardEvent as E;
    use GuardState as S;
    match (state, event) {
        (S::Idle, E::Notification) => (S::Idle, GuardOutcome::Evaluate),
        (S::AwaitingOwnNotification, E::Notification) => (S::Idle, GuardOutcome::Swallow),
        (_, E::CorrectionApplied) => (S::AwaitingOwnNotification, GuardOutcome::Armed),
        (_, E::Reset) => (S::Idle, GuardOutcome::Cleared),
    }
}

/// Stateful wrapper around [`transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CorrectionGuard {
    state: GuardState,
}

impl CorrectionGuard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: GuardState::Idle,
        }
    }

    /// Feed one event and return the outcome.
    pub fn apply(&mut self, event: GuardEvent) -> GuardOutcome {
        let (next, outcome) = transition(self.state, event);
        self.state = next;
        outcome
    }

    /// Dispatch a notification. Returns `true` if it should be evaluated.
    pub fn on_notification(&mut self) -> bool {
        self.apply(GuardEvent::Notification) == GuardOutcome::Evaluate
    }

    /// Arm before a programmatic jump.
    pub fn arm(&mut self) {
        self.apply(GuardEvent::CorrectionApplied);
    }

    pub fn reset(&mut self) {
        self.apply(GuardEvent::Reset);
    }

    #[must_use]
    pub const fn state(&self) -> GuardState {
        self.state
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        matches!(self.state, GuardState::AwaitingOwnNotification)
    }
}
