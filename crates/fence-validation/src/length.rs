#![forbid(unsafe_code)]

//! Length-only edit policy.

use fence_core::text::{char_len, truncate_chars};

use crate::validator::{Correction, EditPolicy, Verdict, length_rejection, schedule};

/// Bounds content length and nothing else.
///
/// Used by secret fields, where the content is never revealed to a pattern
/// and there is no "last good" value to return to: an over-long insert is
/// simply cut back to the bound.
#[derive(Debug, Clone, Default)]
pub struct LengthLimiter {
    max_length: usize,
    pending: Option<Correction>,
}

impl LengthLimiter {
    /// Create a limiter. `0` means unbounded.
    #[must_use]
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            pending: None,
        }
    }
}

impl EditPolicy for LengthLimiter {
    fn on_insert(&mut self, content: &str) -> Verdict {
        match length_rejection(self.max_length, content) {
            Some(reason) => {
                let target = truncate_chars(content, self.max_length).to_string();
                schedule(&mut self.pending, Correction { target, reason })
            }
            None => {
                let settled = self.pending.take().is_some_and(|c| c.target == content);
                if settled {
                    Verdict::FixedPoint
                } else {
                    Verdict::Accepted
                }
            }
        }
    }

    fn on_delete(&mut self, _content: &str) {
        self.pending = None;
    }

    fn take_correction(&mut self) -> Option<Correction> {
        self.pending.take()
    }

    fn pending_correction(&self) -> Option<&Correction> {
        self.pending.as_ref()
    }

    fn accepts(&self, content: &str) -> bool {
        self.max_length == 0 || char_len(content) <= self.max_length
    }

    fn max_length(&self) -> usize {
        self.max_length
    }

    fn set_max_length(&mut self, max_length: usize) {
        self.max_length = max_length;
    }
}
