#![forbid(unsafe_code)]

//! Core: the observable text document, change notifications, and the
//! single-threaded task queue that corrective writes are deferred onto.
//!
//! # Role in textfence
//! `fence-core` has no opinion about what text is acceptable. It provides the
//! host side of the loop: a [`Document`](document::Document) that notifies
//! listeners after each edit and refuses reentrant writes, and a
//! [`Scheduler`](dispatch::Scheduler) for "run this after the current
//! dispatch". `fence-validation` decides; `fence-widgets` wires the two.

pub mod dispatch;
pub mod document;
pub mod event;
pub mod logging;
pub mod text;

// Re-export tracing macros at crate root so `fence_core::debug!` works in both
// feature configurations.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, trace_span, warn};
