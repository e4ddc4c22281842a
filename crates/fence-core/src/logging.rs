#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature the macros below are `tracing`'s own. Without it
//! they expand to nothing, so field code can log corrections unconditionally
//! and pay for it only when a subscriber is wanted.
//!
//! Always invoke them by path (`fence_core::debug!`), which resolves in both
//! configurations.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, trace, trace_span, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// Swallows its arguments when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Swallows its arguments when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Swallows its arguments when tracing is disabled.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// Swallows its arguments when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// Swallows its arguments when tracing is disabled.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    /// Yields a [`NoopSpan`](crate::logging::NoopSpan) when tracing is disabled.
    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    /// Yields a [`NoopSpan`](crate::logging::NoopSpan) when tracing is disabled.
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// Stand-in span used when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Enter the span. The guard does nothing.
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }
}

/// Guard returned by [`NoopSpan::enter`].
#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct NoopGuard;
