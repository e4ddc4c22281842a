#![forbid(unsafe_code)]

//! Masked field with a length bound only.

use std::fmt;
use std::rc::Rc;

use fence_core::dispatch::Scheduler;
use fence_core::document::{Document, DocumentError};
use fence_core::text::char_len;
use fence_validation::{FieldState, LengthLimiter};

use crate::config::FieldConfig;
use crate::field::FieldCore;

/// Default mask character.
pub const DEFAULT_ECHO_CHAR: char = '•';

/// A password-style field.
///
/// Content is limited in length and nothing else; any character may be
/// typed. Masking is purely presentational: [`text`](Self::text) always
/// returns the real content, [`display_text`](Self::display_text) what a
/// renderer should show.
pub struct LimitedSecretField {
    core: FieldCore<LengthLimiter>,
    echo_char: char,
    revealed: bool,
}

impl LimitedSecretField {
    /// Create a field. `config.input_type` is ignored.
    pub fn new(scheduler: impl Scheduler + 'static, config: FieldConfig) -> Self {
        Self::with_shared_scheduler(Rc::new(scheduler), config)
    }

    /// Create a field that shares a scheduler handle with other fields.
    pub fn with_shared_scheduler(scheduler: Rc<dyn Scheduler>, config: FieldConfig) -> Self {
        let policy = LengthLimiter::new(config.max_length);
        Self {
            core: FieldCore::new(policy, scheduler, config.columns, &config.text),
            echo_char: DEFAULT_ECHO_CHAR,
            revealed: false,
        }
    }

    /// Builder: mask character.
    #[must_use]
    pub fn with_echo_char(mut self, echo_char: char) -> Self {
        self.echo_char = echo_char;
        self
    }

    /// Mask character.
    #[must_use]
    pub fn echo_char(&self) -> char {
        self.echo_char
    }

    /// Change the mask character. Does not reveal a revealed field.
    pub fn set_echo_char(&mut self, echo_char: char) {
        self.echo_char = echo_char;
    }

    /// Whether the content is shown in clear.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Show the content in clear (`true`) or masked (`false`).
    pub fn set_revealed(&mut self, revealed: bool) {
        self.revealed = revealed;
    }

    /// What a renderer should draw: the content, or one mask char per char.
    #[must_use]
    pub fn display_text(&self) -> String {
        let text = self.core.document().text();
        if self.revealed {
            text
        } else {
            std::iter::repeat_n(self.echo_char, char_len(&text)).collect()
        }
    }

    /// Real content, never masked.
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

    /// Whether a truncation is waiting in the scheduler.
    #[must_use]
    pub fn state(&self) -> FieldState {
        self.core.state()
    }

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

impl fmt::Debug for LimitedSecretField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Content stays out of debug output.
        f.debug_struct("LimitedSecretField")
            .field("len", &self.core.document().len())
            .field("max_length", &self.max_length())
            .field("echo_char", &self.echo_char)
            .field("revealed", &self.revealed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fence_core::dispatch::TaskQueue;

    #[test]
    fn masks_by_default() {
        let queue = TaskQueue::new();
        let f = LimitedSecretField::new(queue.scheduler(), FieldConfig::default().with_text("pässwörd"));
        assert_eq!(f.echo_char(), '•');
        assert_eq!(f.display_text(), "••••••••");
        assert_eq!(f.text(), "pässwörd");
    }

    #[test]
    fn reveal_and_echo_char() {
        let queue = TaskQueue::new();
        let mut f = LimitedSecretField::new(queue.scheduler(), FieldConfig::default().with_text("abc"))
            .with_echo_char('*');
        assert_eq!(f.display_text(), "***");
        f.set_revealed(true);
        assert!(f.is_revealed());
        assert_eq!(f.display_text(), "abc");
        f.set_echo_char('#');
        assert_eq!(f.display_text(), "abc");
        f.set_revealed(false);
        assert_eq!(f.display_text(), "###");
    }

    #[test]
    fn length_only() {
        let queue = TaskQueue::new();
        let f = LimitedSecretField::new(
            queue.scheduler(),
            FieldConfig::default().with_max_length(4),
        );
        f.push_str("a b!").unwrap();
        assert!(queue.is_empty());
        f.push_str("?").unwrap();
        assert_eq!(f.state(), FieldState::Correcting);
        queue.run_pending();
        assert_eq!(f.text(), "a b!");
    }

    #[test]
    fn debug_hides_content() {
        let queue = TaskQueue::new();
        let f = LimitedSecretField::new(queue.scheduler(), FieldConfig::default().with_text("hunter2"));
        let debug = format!("{f:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("len: 7"));
    }
}
