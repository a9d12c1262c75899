//! Logging macros that compile to nothing when tracing is disabled.
//!
//! Tracing is enabled when either:
//! - The `tracing` feature is enabled
//! - Running this crate's unit tests (`cfg(test)`)

/// Emit a trace-level log message.
#[cfg(any(test, feature = "tracing"))]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*);
    };
}

/// Emit a trace-level log message (no-op version).
#[cfg(not(any(test, feature = "tracing")))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Emit a debug-level log message.
#[cfg(any(test, feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*);
    };
}

/// Emit a debug-level log message (no-op version).
#[cfg(not(any(test, feature = "tracing")))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

pub(crate) use debug;
pub(crate) use trace;
