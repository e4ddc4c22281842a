#![forbid(unsafe_code)]

//! Validation: what text a field will keep.
//!
//! # Role in textfence
//! This crate is pure decision logic. [`InputType`] names a rule and
//! [`Pattern`] compiles it; an [`EditPolicy`] ([`IncrementalValidator`] for
//! text fields, [`LengthLimiter`] for secret fields) looks at buffer content
//! after each edit and either keeps it or hands back a [`Correction`] for the
//! host to apply later. Nothing here touches a document or a queue.

pub mod input_type;
pub mod length;
pub mod pattern;
pub mod validator;

pub use input_type::{InputType, UnknownInputType};
pub use length::LengthLimiter;
pub use pattern::{Pattern, PatternError};
pub use validator::{
    Correction, EditPolicy, FieldState, IncrementalValidator, REJECTION_CODE_PATTERN,
    REJECTION_CODE_TOO_LONG, Rejection, Verdict,
};
