#![forbid(unsafe_code)]

//! Drift Runtime
//!
//! The stateful controllers behind an infinite portfolio feed.
//!
//! # Key Components
//!
//! - [`MarqueeTrack`] - per-strip horizontal motion with speed modes
//! - [`TrackArena`] - id-keyed storage that ticks every strip per frame
//! - [`PageLoopController`] - wraparound infinite list over doubled content
//! - [`RecyclingLoopController`] - bounded infinite list by relocating items
//! - [`CorrectionGuard`] - swallows the notification caused by our own jump
//! - [`SmoothScroll`] - eased programmatic scrolling
//!
//! # Role in Drift
//! `drift-runtime` sits between the leaf types in `drift-core` and the host
//! adapter in `drift-web`. Nothing here reads the platform: every controller
//! takes measurements in and hands actions back.

pub mod loop_guard;
pub mod marquee;
pub mod page_loop;
pub mod recycle;
pub mod smooth_scroll;
pub mod track_arena;

pub use loop_guard::{CorrectionGuard, GuardEvent, GuardOutcome, GuardState};
pub use marquee::{MarqueeTrack, TrackMode, TrackState};
pub use page_loop::{LoopAction, PageLoopController};
pub use recycle::{
    ItemId, RecycleEffect, RecycleEntry, RecycleItem, RecyclePass, RecyclingLoopController,
};
pub use smooth_scroll::{ScrollAnimationState, ScrollStep, SmoothScroll, ease_out_cubic};
pub use track_arena::{TrackArena, TrackId, TrackTranslation};
