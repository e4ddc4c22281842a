#![forbid(unsafe_code)]

//! textfence public facade crate.
//!
//! Re-exports the types needed to build constrained fields and drive their
//! corrections, plus a top-level [`Error`] covering every fallible call.
//!
//! ```
//! use fence::prelude::*;
//!
//! # fn main() -> fence::Result<()> {
//! let queue = TaskQueue::new();
//! let field = LimitedTextField::new(
//!     queue.scheduler(),
//!     FieldConfig::default().with_max_length(5),
//! );
//! field.push_str("abcdef")?;
//! queue.run_until_idle(16)?;
//! assert_eq!(field.text(), "abcde");
//! # Ok(())
//! # }
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use fence_core::dispatch::{DispatchError, QueueScheduler, Scheduler, Task, TaskQueue};
pub use fence_core::document::{Document, DocumentError, WeakDocument};
pub use fence_core::event::{ChangeEvent, ChangeKind, DocumentListener, ListenerId};

// --- Validation re-exports -------------------------------------------------

pub use fence_validation::{
    Correction, EditPolicy, FieldState, IncrementalValidator, InputType, LengthLimiter, Pattern,
    PatternError, Rejection, UnknownInputType, Verdict,
};

// --- Widget re-exports -----------------------------------------------------

pub use fence_widgets::{
    ConfigError, DEFAULT_ECHO_CHAR, FieldConfig, FieldConfigParse, LimitedSecretField,
    LimitedTextField,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for textfence.
#[derive(Debug)]
pub enum Error {
    /// A document edit was refused.
    Document(DocumentError),
    /// The task queue did not drain within its budget.
    Dispatch(DispatchError),
    /// A custom rule failed to compile.
    Pattern(PatternError),
    /// A name did not denote an input type.
    InputType(UnknownInputType),
    /// Configuration values could not be used.
    Config(Vec<ConfigError>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document(err) => write!(f, "{err}"),
            Self::Dispatch(err) => write!(f, "{err}"),
            Self::Pattern(err) => write!(f, "{err}"),
            Self::InputType(err) => write!(f, "{err}"),
            Self::Config(errors) => {
                f.write_str("invalid configuration: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{err}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Document(err) => Some(err),
            Self::Dispatch(err) => Some(err),
            Self::Pattern(err) => Some(err),
            Self::InputType(err) => Some(err),
            Self::Config(errors) => errors
                .first()
                .map(|e| e as &(dyn std::error::Error + 'static)),
        }
    }
}

impl From<DocumentError> for Error {
    fn from(err: DocumentError) -> Self {
        Self::Document(err)
    }
}

impl From<DispatchError> for Error {
    fn from(err: DispatchError) -> Self {
        Self::Dispatch(err)
    }
}

impl From<PatternError> for Error {
    fn from(err: PatternError) -> Self {
        Self::Pattern(err)
    }
}

impl From<UnknownInputType> for Error {
    fn from(err: UnknownInputType) -> Self {
        Self::InputType(err)
    }
}

impl From<Vec<ConfigError>> for Error {
    fn from(errors: Vec<ConfigError>) -> Self {
        Self::Config(errors)
    }
}

/// Standard result type for textfence APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Read a [`FieldConfig`] from the environment, failing on any unusable
/// variable.
pub fn config_from_env() -> Result<FieldConfig> {
    let parsed = FieldConfig::from_env_with_diagnostics();
    if parsed.errors.is_empty() {
        Ok(parsed.config)
    } else {
        Err(Error::Config(parsed.errors))
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Document, EditPolicy, Error, FieldConfig, FieldState, InputType, LimitedSecretField,
        LimitedTextField, Pattern, Result, Scheduler, TaskQueue,
    };

    pub use crate::{core, validation, widgets};
}

pub use fence_core as core;
pub use fence_validation as validation;
pub use fence_widgets as widgets;
