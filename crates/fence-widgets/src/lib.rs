#![forbid(unsafe_code)]

//! Widgets: constrained fields built from a document, a policy and a
//! scheduler.
//!
//! # Role in textfence
//! [`LimitedTextField`] pairs a [`Document`](fence_core::document::Document)
//! with an [`IncrementalValidator`](fence_validation::IncrementalValidator);
//! [`LimitedSecretField`] pairs one with a
//! [`LengthLimiter`](fence_validation::LengthLimiter) and adds masking. Both
//! are configured from a [`FieldConfig`], which can be read from the
//! environment.

pub mod config;
mod field;
pub mod secret_field;
pub mod text_field;

pub use config::{ConfigError, FieldConfig, FieldConfigParse};
pub use secret_field::{DEFAULT_ECHO_CHAR, LimitedSecretField};
pub use text_field::LimitedTextField;
