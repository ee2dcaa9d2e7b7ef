#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature enabled this module re-exports the `tracing`
//! macros so downstream crates can write `drift_core::debug!(...)` without a
//! direct dependency. Without the feature, the same macro names expand to
//! nothing, keeping call sites free of `cfg` noise.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, trace, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! __drift_noop_log {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::__drift_noop_log as debug;
#[cfg(not(feature = "tracing"))]
pub use crate::__drift_noop_log as trace;
#[cfg(not(feature = "tracing"))]
pub use crate::__drift_noop_log as warn;
