#![forbid(unsafe_code)]

//! Incremental edit validation.
//!
//! An [`EditPolicy`] watches the content of a buffer after every edit and
//! decides whether to keep it. It never writes to the buffer itself: a
//! rejected edit yields a [`Correction`] that the host applies *later*, once
//! the notification that carried the edit has finished. Applying it produces
//! another notification, which the policy recognises as settled.
//!
//! # State machine
//!
//! ```text
//!            insert violates
//!   Stable ------------------> Correcting
//!     ^  \                        |
//!     |   `-- insert ok --.       | correction taken / delete
//!     |        (accepted) |       |
//!     `-------------------'<------'
//! ```

use std::fmt;

use fence_core::text::{char_len, truncate_chars};

use crate::input_type::InputType;
use crate::pattern::Pattern;

/// Stable code for length rejections.
pub const REJECTION_CODE_TOO_LONG: &str = "too_long";
/// Stable code for pattern rejections.
pub const REJECTION_CODE_PATTERN: &str = "pattern";

/// Whether a correction is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldState {
    /// Buffer content is what the policy last agreed to.
    #[default]
    Stable,
    /// A correction has been scheduled but not yet applied.
    Correcting,
}

/// Why an insert was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Content exceeds the length bound.
    TooLong {
        /// Maximum length in chars.
        max: usize,
        /// Offending length in chars.
        actual: usize,
    },
    /// Content does not satisfy the active pattern.
    PatternMismatch,
}

impl Rejection {
    /// Stable code for programmatic handling.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TooLong { .. } => REJECTION_CODE_TOO_LONG,
            Self::PatternMismatch => REJECTION_CODE_PATTERN,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong { max, actual } => {
                write!(f, "{actual} chars exceeds the limit of {max}")
            }
            Self::PatternMismatch => f.write_str("content does not match the pattern"),
        }
    }
}

/// A write the host must apply to bring the buffer back into compliance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    /// Content to overwrite the buffer with.
    pub target: String,
    /// What triggered it.
    pub reason: Rejection,
}

/// Outcome of [`EditPolicy::on_insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Content equals the last accepted value; nothing to do.
    FixedPoint,
    /// Content accepted and remembered.
    Accepted,
    /// Content rejected; a correction is pending.
    Rejected {
        /// Why.
        reason: Rejection,
        /// `true` when no correction was pending before, so the host has to
        /// post a task that calls [`EditPolicy::take_correction`]. When
        /// `false` an already-queued task will pick up the new target.
        needs_post: bool,
    },
}

impl Verdict {
    /// Whether the content was kept (accepted or already settled).
    #[must_use]
    pub const fn is_kept(self) -> bool {
        matches!(self, Self::FixedPoint | Self::Accepted)
    }

    /// Whether the host must post a correction task.
    #[must_use]
    pub const fn needs_post(self) -> bool {
        matches!(
            self,
            Self::Rejected {
                needs_post: true,
                ..
            }
        )
    }
}

/// The decision side of a constrained field.
///
/// Implementations are driven by a document listener: `on_insert` after text
/// was added, `on_delete` after text was removed, `on_bulk_change` for
/// anything else. None of them may touch the buffer.
pub trait EditPolicy {
    /// Judge the buffer content after an insertion.
    fn on_insert(&mut self, content: &str) -> Verdict;

    /// Record the buffer content after a deletion. Deletions are never
    /// rejected.
    fn on_delete(&mut self, content: &str);

    /// Content-neutral notification. Ignored by default.
    fn on_bulk_change(&mut self) {}

    /// Take the pending correction, returning the policy to
    /// [`FieldState::Stable`]. Called by the deferred task right before it
    /// writes the target into the buffer.
    fn take_correction(&mut self) -> Option<Correction>;

    /// The pending correction, if any.
    fn pending_correction(&self) -> Option<&Correction>;

    /// Whether `content` would be kept as-is by [`on_insert`](Self::on_insert).
    fn accepts(&self, content: &str) -> bool;

    /// Length bound in chars (0 = unbounded).
    fn max_length(&self) -> usize;

    /// Change the length bound. The host truncates the buffer itself.
    fn set_max_length(&mut self, max_length: usize);

    /// Current state.
    fn state(&self) -> FieldState {
        if self.pending_correction().is_some() {
            FieldState::Correcting
        } else {
            FieldState::Stable
        }
    }
}

/// Length check shared by every policy.
pub(crate) fn length_rejection(max_length: usize, content: &str) -> Option<Rejection> {
    if max_length == 0 {
        return None;
    }
    let actual = char_len(content);
    (actual > max_length).then_some(Rejection::TooLong {
        max: max_length,
        actual,
    })
}

/// Record `correction` as pending and report whether a task must be posted.
pub(crate) fn schedule(pending: &mut Option<Correction>, correction: Correction) -> Verdict {
    let reason = correction.reason;
    fence_core::debug!(
        reason = reason.code(),
        fix = correction.target.as_str(),
        "correction scheduled"
    );
    let needs_post = pending.replace(correction).is_none();
    Verdict::Rejected { reason, needs_post }
}

/// Length- and pattern-constrained validator for a plain text field.
///
/// # Example
///
/// ```rust
/// use fence_validation::{EditPolicy, IncrementalValidator, InputType, Verdict};
///
/// let mut v = IncrementalValidator::new(0, InputType::Integer);
/// assert_eq!(v.on_insert("12"), Verdict::Accepted);
/// assert!(!v.on_insert("12a").is_kept());
///
/// // The host applies the correction later, from its task queue.
/// let fix = v.take_correction().unwrap();
/// assert_eq!(fix.target, "12");
/// assert_eq!(v.on_insert(&fix.target), Verdict::FixedPoint);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IncrementalValidator {
    max_length: usize,
    input_type: InputType,
    pattern: Option<Pattern>,
    last_accepted: String,
    pending: Option<Correction>,
}

impl IncrementalValidator {
    /// Create a validator with a length bound and an input type.
    #[must_use]
    pub fn new(max_length: usize, input_type: InputType) -> Self {
        Self {
            max_length,
            input_type,
            pattern: input_type.pattern(),
            last_accepted: String::new(),
            pending: None,
        }
    }

    /// The most recent content known to be acceptable.
    #[must_use]
    pub fn last_accepted(&self) -> &str {
        &self.last_accepted
    }

    /// The configured input type.
    #[must_use]
    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    /// The active rule.
    #[must_use]
    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    /// Select a named rule. Resets the accepted value; the host clears the
    /// buffer.
    pub fn set_input_type(&mut self, input_type: InputType) {
        self.input_type = input_type;
        self.set_pattern(input_type.pattern());
    }

    /// Install a custom rule (or none). Resets the accepted value; the host
    /// clears the buffer.
    pub fn set_pattern(&mut self, pattern: Option<Pattern>) {
        fence_core::debug!(
            pattern = pattern.as_ref().map_or("<none>", Pattern::as_str),
            "pattern installed"
        );
        self.pattern = pattern;
        self.last_accepted.clear();
        self.pending = None;
    }

    fn pattern_rejection(&self, content: &str) -> Option<Rejection> {
        match &self.pattern {
            Some(pattern) if !pattern.matches(content) => Some(Rejection::PatternMismatch),
            _ => None,
        }
    }
}

impl EditPolicy for IncrementalValidator {
    fn on_insert(&mut self, content: &str) -> Verdict {
        if content == self.last_accepted {
            self.pending = None;
            return Verdict::FixedPoint;
        }

        if let Some(reason) = length_rejection(self.max_length, content) {
            let target = truncate_chars(content, self.max_length).to_string();
            return schedule(&mut self.pending, Correction { target, reason });
        }

        if let Some(reason) = self.pattern_rejection(content) {
            let target = self.last_accepted.clone();
            return schedule(&mut self.pending, Correction { target, reason });
        }

        self.last_accepted.clear();
        self.last_accepted.push_str(content);
        self.pending = None;
        Verdict::Accepted
    }

    fn on_delete(&mut self, content: &str) {
        self.last_accepted.clear();
        self.last_accepted.push_str(content);
        self.pending = None;
    }

    fn take_correction(&mut self) -> Option<Correction> {
        self.pending.take()
    }

    fn pending_correction(&self) -> Option<&Correction> {
        self.pending.as_ref()
    }

    fn accepts(&self, content: &str) -> bool {
        length_rejection(self.max_length, content).is_none()
            && self.pattern_rejection(content).is_none()
    }

    fn max_length(&self) -> usize {
        self.max_length
    }

    fn set_max_length(&mut self, max_length: usize) {
        self.max_length = max_length;
        // A prefix of an accepted value need not match the rule.
        if max_length > 0 && char_len(&self.last_accepted) > max_length {
            self.last_accepted.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(v: &mut IncrementalValidator, content: &str) -> String {
        let mut buffer = content.to_string();
        let mut verdict = v.on_insert(&buffer);
        let mut rounds = 0;
        while !verdict.is_kept() {
            let fix = v.take_correction().expect("rejection leaves a correction");
            buffer = fix.target;
            verdict = if buffer.is_empty() {
                v.on_delete(&buffer);
                Verdict::FixedPoint
            } else {
                v.on_insert(&buffer)
            };
            rounds += 1;
            assert!(rounds < 4, "correction loop did not settle");
        }
        buffer
    }

    #[test]
    fn accepted_content_becomes_last_accepted() {
        let mut v = IncrementalValidator::new(0, InputType::None);
        assert_eq!(v.on_insert("hello"), Verdict::Accepted);
        assert_eq!(v.last_accepted(), "hello");
        assert_eq!(v.state(), FieldState::Stable);
    }

    #[test]
    fn equal_content_is_a_fixed_point() {
        let mut v = IncrementalValidator::new(0, InputType::Integer);
        v.on_insert("42");
        assert_eq!(v.on_insert("42"), Verdict::FixedPoint);
        assert_eq!(v.pending_correction(), None);
    }

    #[test]
    fn too_long_schedules_truncation() {
        let mut v = IncrementalValidator::new(5, InputType::None);
        let verdict = v.on_insert("abcdef");
        assert_eq!(
            verdict,
            Verdict::Rejected {
                reason: Rejection::TooLong { max: 5, actual: 6 },
                needs_post: true,
            }
        );
        assert_eq!(v.last_accepted(), "");
        assert_eq!(v.state(), FieldState::Correcting);
        assert_eq!(v.pending_correction().map(|c| c.target.as_str()), Some("abcde"));
    }

    #[test]
    fn truncation_settles() {
        let mut v = IncrementalValidator::new(5, InputType::None);
        assert_eq!(settle(&mut v, "abcdef"), "abcde");
        assert_eq!(v.last_accepted(), "abcde");
        assert_eq!(v.state(), FieldState::Stable);
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let mut v = IncrementalValidator::new(2, InputType::None);
        assert_eq!(settle(&mut v, "日本語"), "日本");
    }

    #[test]
    fn pattern_mismatch_reverts_to_last_accepted() {
        let mut v = IncrementalValidator::new(0, InputType::Integer);
        v.on_insert("1");
        v.on_insert("12");
        let verdict = v.on_insert("12a");
        assert_eq!(
            verdict,
            Verdict::Rejected {
                reason: Rejection::PatternMismatch,
                needs_post: true,
            }
        );
        let fix = v.take_correction().unwrap();
        assert_eq!(fix.target, "12");
        assert_eq!(v.state(), FieldState::Stable);
        assert_eq!(v.on_insert(&fix.target), Verdict::FixedPoint);
        assert_eq!(v.on_insert("123"), Verdict::Accepted);
    }

    #[test]
    fn length_is_checked_before_pattern() {
        let mut v = IncrementalValidator::new(3, InputType::Integer);
        v.on_insert("12");
        let verdict = v.on_insert("a412");
        assert!(matches!(
            verdict,
            Verdict::Rejected {
                reason: Rejection::TooLong { .. },
                ..
            }
        ));
        // The truncated value still fails the pattern, so a second round
        // reverts to the last accepted value.
        assert_eq!(settle(&mut v, "a412"), "12");
    }

    #[test]
    fn second_rejection_coalesces() {
        let mut v = IncrementalValidator::new(0, InputType::Integer);
        v.on_insert("7");
        assert!(v.on_insert("7x").needs_post());
        let again = v.on_insert("7xy");
        assert_eq!(
            again,
            Verdict::Rejected {
                reason: Rejection::PatternMismatch,
                needs_post: false,
            }
        );
        assert_eq!(v.take_correction().map(|c| c.target), Some("7".into()));
        assert_eq!(v.take_correction(), None);
    }

    #[test]
    fn delete_is_always_accepted() {
        let mut v = IncrementalValidator::new(0, InputType::Decimal);
        v.on_insert("1.5");
        v.on_delete(".5");
        assert_eq!(v.last_accepted(), ".5");
        assert!(!InputType::Decimal.pattern().unwrap().matches(".5"));
    }

    #[test]
    fn delete_drops_pending_correction() {
        let mut v = IncrementalValidator::new(0, InputType::Integer);
        v.on_insert("1");
        v.on_insert("1x");
        assert_eq!(v.state(), FieldState::Correcting);
        v.on_delete("");
        assert_eq!(v.state(), FieldState::Stable);
        assert_eq!(v.take_correction(), None);
    }

    #[test]
    fn acceptance_drops_stale_correction() {
        let mut v = IncrementalValidator::new(3, InputType::None);
        v.on_insert("abcd");
        assert_eq!(v.state(), FieldState::Correcting);
        assert_eq!(v.on_insert("ab"), Verdict::Accepted);
        assert_eq!(v.state(), FieldState::Stable);
    }

    #[test]
    fn reconfiguration_resets() {
        let mut v = IncrementalValidator::new(0, InputType::None);
        v.on_insert("abc");
        v.on_insert("abc!");
        v.set_input_type(InputType::Word);
        assert_eq!(v.last_accepted(), "");
        assert_eq!(v.state(), FieldState::Stable);
        assert_eq!(v.input_type(), InputType::Word);
        assert_eq!(v.pattern(), InputType::Word.pattern().as_ref());

        v.on_insert("abc");
        v.set_pattern(Some(Pattern::new("[xyz]*").unwrap()));
        assert_eq!(v.last_accepted(), "");
        assert_eq!(v.pattern().map(Pattern::as_str), Some("[xyz]*"));
        // A custom rule leaves the named type alone.
        assert_eq!(v.input_type(), InputType::Word);

        v.set_pattern(None);
        assert_eq!(v.on_insert("anything at all"), Verdict::Accepted);
    }

    #[test]
    fn shrinking_max_length_resets_over_long_last_accepted() {
        let mut v = IncrementalValidator::new(0, InputType::None);
        v.on_insert("abcdef");
        v.set_max_length(4);
        assert_eq!(v.max_length(), 4);
        assert_eq!(v.last_accepted(), "");
        assert_eq!(v.on_insert("abcd"), Verdict::Accepted);
        assert_eq!(v.last_accepted(), "abcd");
    }

    #[test]
    fn shrinking_max_length_rechecks_the_rule() {
        let mut v = IncrementalValidator::new(0, InputType::None);
        v.set_pattern(Some(Pattern::new("ab|abcd").unwrap()));
        assert_eq!(v.on_insert("ab"), Verdict::Accepted);
        assert_eq!(v.on_insert("abcd"), Verdict::Accepted);

        v.set_max_length(3);
        let verdict = v.on_insert("abc");
        assert!(verdict.needs_post());
        assert_eq!(v.take_correction().map(|c| c.target), Some(String::new()));
    }

    #[test]
    fn shrinking_max_length_keeps_short_last_accepted() {
        let mut v = IncrementalValidator::new(0, InputType::None);
        v.on_insert("abc");
        v.set_max_length(5);
        assert_eq!(v.last_accepted(), "abc");
        assert_eq!(v.on_insert("abc"), Verdict::FixedPoint);
    }

    #[test]
    fn zero_max_length_is_unbounded() {
        let mut v = IncrementalValidator::new(0, InputType::None);
        let long = "x".repeat(10_000);
        assert_eq!(v.on_insert(&long), Verdict::Accepted);
    }

    #[test]
    fn accepts_mirrors_both_checks() {
        let v = IncrementalValidator::new(3, InputType::Integer);
        assert!(v.accepts("123"));
        assert!(!v.accepts("1234"));
        assert!(!v.accepts("1a"));
    }

    #[test]
    fn signed_decimal_typing_sequence() {
        let mut v = IncrementalValidator::new(0, InputType::SignedDecimal);
        for step in ["-", "-1", "-1.", "-1.5"] {
            assert_eq!(v.on_insert(step), Verdict::Accepted, "step {step:?}");
        }
    }

    #[test]
    fn rejection_codes_and_display() {
        let too_long = Rejection::TooLong { max: 5, actual: 6 };
        assert_eq!(too_long.code(), "too_long");
        assert_eq!(too_long.to_string(), "6 chars exceeds the limit of 5");
        assert_eq!(Rejection::PatternMismatch.code(), "pattern");
    }
}
