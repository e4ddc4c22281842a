#![forbid(unsafe_code)]

//! Text field with a length bound and an input rule.

use std::fmt;
use std::rc::Rc;

use fence_core::dispatch::Scheduler;
use fence_core::document::{Document, DocumentError};
use fence_validation::{FieldState, IncrementalValidator, InputType, Pattern};

use crate::config::FieldConfig;
use crate::field::FieldCore;

/// A text field that keeps its content within a length bound and an input
/// rule.
///
/// Edits go straight into the field's [`Document`]. When an edit breaks a
/// constraint the field leaves it in place and asks the scheduler to fix it
/// up afterwards: over-long content is cut to the bound, content that breaks
/// the rule goes back to the last value that satisfied it. Deletions are
/// always kept.
///
/// # Example
///
/// ```rust
/// use fence_core::dispatch::TaskQueue;
/// use fence_validation::InputType;
/// use fence_widgets::{FieldConfig, LimitedTextField};
///
/// let queue = TaskQueue::new();
/// let field = LimitedTextField::new(
///     queue.scheduler(),
///     FieldConfig::default().with_input_type(InputType::Integer),
/// );
///
/// field.push_str("12").unwrap();
/// field.push_str("a").unwrap();
/// assert_eq!(field.text(), "12a");
///
/// queue.run_pending();
/// assert_eq!(field.text(), "12");
/// ```
pub struct LimitedTextField {
    core: FieldCore<IncrementalValidator>,
}

impl LimitedTextField {
    /// Create a field with max length and input type installed.
    ///
    /// Installing the input type resets the buffer, so a text field always
    /// starts empty and `config.text` is not used.
    pub fn new(scheduler: impl Scheduler + 'static, config: FieldConfig) -> Self {
        Self::with_shared_scheduler(Rc::new(scheduler), config)
    }

    /// Create a field that shares a scheduler handle with other fields.
    pub fn with_shared_scheduler(scheduler: Rc<dyn Scheduler>, config: FieldConfig) -> Self {
        let policy = IncrementalValidator::new(config.max_length, config.input_type);
        Self {
            core: FieldCore::new(policy, scheduler, config.columns, ""),
        }
    }

    /// Current content.
    #[must_use]
    pub fn text(&self) -> String {
        self.core.document().text()
    }

    /// The underlying document.
    #[must_use]
    pub fn document(&self) -> &Document {
        self.core.document()
    }

    /// Preferred visible width in columns (0 = unspecified).
    #[must_use]
    pub fn columns(&self) -> usize {
        self.core.columns()
    }

    /// Set the preferred visible width.
    pub fn set_columns(&mut self, columns: usize) {
        self.core.set_columns(columns);
    }

    /// Whether a correction is waiting in the scheduler.
    #[must_use]
    pub fn state(&self) -> FieldState {
        self.core.state()
    }

    /// The most recent content that satisfied both constraints (or was left
    /// by a deletion).
    #[must_use]
    pub fn last_accepted(&self) -> String {
        self.core.guard().policy().last_accepted().to_string()
    }

    // --- Constraints ---

    /// Length bound in chars (0 = unbounded).
    #[must_use]
    pub fn max_length(&self) -> usize {
        self.core.max_length()
    }

    /// Change the length bound. Content over the new bound is truncated
    /// immediately.
    pub fn set_max_length(&self, max_length: usize) -> Result<(), DocumentError> {
        self.core.set_max_length(max_length)
    }

    /// The selected input type.
    #[must_use]
    pub fn input_type(&self) -> InputType {
        self.core.guard().policy().input_type()
    }

    /// The active rule, if any.
    #[must_use]
    pub fn pattern(&self) -> Option<Pattern> {
        self.core.guard().policy().pattern().cloned()
    }

    /// Select a named rule. Clears the field.
    pub fn set_input_type(&self, input_type: InputType) -> Result<(), DocumentError> {
        self.core.guard().policy_mut().set_input_type(input_type);
        self.core.clear()
    }

    /// Install a custom rule, or remove the rule with `None`. Clears the
    /// field. The reported [`input_type`](Self::input_type) is left as is.
    pub fn set_pattern(&self, pattern: Option<Pattern>) -> Result<(), DocumentError> {
        self.core.guard().policy_mut().set_pattern(pattern);
        self.core.clear()
    }

    // --- Editing ---

    /// Insert `s` at char `offset`.
    pub fn insert_str(&self, offset: usize, s: &str) -> Result<(), DocumentError> {
        self.core.insert_str(offset, s)
    }

    /// Append `s`.
    pub fn push_str(&self, s: &str) -> Result<(), DocumentError> {
        self.core.push_str(s)
    }

    /// Remove `len` chars at char `offset`.
    pub fn remove(&self, offset: usize, len: usize) -> Result<(), DocumentError> {
        self.core.remove(offset, len)
    }

    /// Remove the last char. Returns `false` if the field was empty.
    pub fn backspace(&self) -> Result<bool, DocumentError> {
        self.core.backspace()
    }

    /// Remove all content.
    pub fn clear(&self) -> Result<(), DocumentError> {
        self.core.clear()
    }
}

impl fmt::Debug for LimitedTextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LimitedTextField")
            .field("core", &self.core)
            .finish()
    }
}
