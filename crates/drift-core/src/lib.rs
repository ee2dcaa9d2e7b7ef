#![forbid(unsafe_code)]

//! Core: geometry readiness, wraparound math, the frame clock, input and host
//! notification types, and feed configuration.
//!
//! # Role in Drift
//! `drift-core` is the leaf layer. Everything time-based subscribes to the
//! [`FrameClock`](frame_clock::FrameClock), every controller receives its
//! tunables from [`FeedConfig`](config::FeedConfig), and every host
//! notification is described by [`HostNotification`](event::HostNotification).
//!
//! # How it fits in the system
//! The runtime (`drift-runtime`) owns the marquee tracks and loop controllers
//! and consumes these types. The layout solver (`drift-layout`) only needs
//! geometry and configuration. The host adapter (`drift-web`) translates
//! platform callbacks into the event types defined here.

pub mod config;
pub mod event;
pub mod event_coalescer;
pub mod frame_clock;
pub mod geometry;
pub mod logging;
pub mod wrap;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, warn};
