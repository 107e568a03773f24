//! Logging macros that cost nothing unless the `tracing` feature is enabled.
//!
//! With the feature enabled they forward to the [`tracing`] crate:
//!
//! ```bash
//! RUST_LOG=inavl=trace cargo test --features tracing
//! ```
//!
//! [`tracing`]: https://docs.rs/tracing

#![allow(unused_macros, unused_imports)]

/// Trace-level event. A no-op without the `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Debug-level event. A no-op without the `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;
pub(crate) use trace_log;
