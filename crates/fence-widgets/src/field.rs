#![forbid(unsafe_code)]

//! Shared plumbing behind both field kinds.
//!
//! A field owns a [`Document`] and registers a [`FieldGuard`] on it. The guard
//! forwards every notification to the field's [`EditPolicy`] and, when the
//! policy rejects an edit, posts a task that writes the correction back once
//! dispatch has finished. The task holds only weak references, so dropping a
//! field cancels any correction still in the queue.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use fence_core::dispatch::Scheduler;
use fence_core::document::{Document, DocumentError, WeakDocument};
use fence_core::event::{ChangeEvent, DocumentListener, ListenerId};
use fence_core::text::{char_len, truncate_chars};
use fence_validation::{EditPolicy, FieldState};

/// Document listener that drives an [`EditPolicy`].
pub(crate) struct FieldGuard<P> {
    this: Weak<FieldGuard<P>>,
    policy: RefCell<P>,
    document: WeakDocument,
    scheduler: Rc<dyn Scheduler>,
}

impl<P: EditPolicy + 'static> FieldGuard<P> {
    fn new(policy: P, document: &Document, scheduler: Rc<dyn Scheduler>) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            policy: RefCell::new(policy),
            document: document.downgrade(),
            scheduler,
        })
    }

    pub(crate) fn policy(&self) -> std::cell::Ref<'_, P> {
        self.policy.borrow()
    }

    pub(crate) fn policy_mut(&self) -> std::cell::RefMut<'_, P> {
        self.policy.borrow_mut()
    }

    /// Run the insert check against the current document content.
    pub(crate) fn recheck(&self) {
        let Some(document) = self.document.upgrade() else {
            return;
        };
        let content = document.text();
        let verdict = self.policy.borrow_mut().on_insert(&content);
        if verdict.needs_post() {
            self.post_correction();
        }
    }

    fn post_correction(&self) {
        let guard = self.this.clone();
        self.scheduler.post(Box::new(move || {
            if let Some(guard) = guard.upgrade() {
                guard.apply_correction();
            }
        }));
    }

    /// Write the pending correction, if it is still wanted.
    fn apply_correction(&self) {
        let correction = self.policy.borrow_mut().take_correction();
        let Some(correction) = correction else {
            fence_core::trace!("correction superseded");
            return;
        };
        let Some(document) = self.document.upgrade() else {
            return;
        };
        fence_core::trace!(
            reason = correction.reason.code(),
            fix = correction.target.as_str(),
            "correction applied"
        );
        if let Err(err) = document.set_text(&correction.target) {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %err, "correction not applied");
            #[cfg(not(feature = "tracing"))]
            let _ = err;
        }
    }
}

impl<P: EditPolicy + 'static> DocumentListener for FieldGuard<P> {
    fn inserted(&self, event: &ChangeEvent<'_>) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "field_insert",
            offset = event.offset,
            len = event.len,
            revision = event.revision
        )
        .entered();

        let verdict = self.policy.borrow_mut().on_insert(event.content);
        if verdict.needs_post() {
            self.post_correction();
        }
    }

    fn removed(&self, event: &ChangeEvent<'_>) {
        self.policy.borrow_mut().on_delete(event.content);
    }

    fn changed(&self, _event: &ChangeEvent<'_>) {
        self.policy.borrow_mut().on_bulk_change();
    }
}

/// Document, guard and registration shared by both field kinds.
pub(crate) struct FieldCore<P: EditPolicy + 'static> {
    document: Document,
    guard: Rc<FieldGuard<P>>,
    listener: ListenerId,
    columns: usize,
}

impl<P: EditPolicy + 'static> FieldCore<P> {
    /// Wire `policy` to a fresh document seeded with `text`.
    ///
    /// `text` is cut to the policy's length bound; if what remains is still
    /// not acceptable the field starts empty.
    pub(crate) fn new(
        policy: P,
        scheduler: Rc<dyn Scheduler>,
        columns: usize,
        text: &str,
    ) -> Self {
        let seed = match policy.max_length() {
            0 => text,
            max => truncate_chars(text, max),
        };
        let seed = if policy.accepts(seed) { seed } else { "" };

        let document = Document::with_text(seed);
        let guard = FieldGuard::new(policy, &document, scheduler);
        guard.recheck();
        let listener = document.add_listener(guard.clone());
        Self {
            document,
            guard,
            listener,
            columns,
        }
    }

    pub(crate) fn guard(&self) -> &FieldGuard<P> {
        &self.guard
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn columns(&self) -> usize {
        self.columns
    }

    pub(crate) fn set_columns(&mut self, columns: usize) {
        self.columns = columns;
    }

    pub(crate) fn state(&self) -> FieldState {
        self.guard.policy().state()
    }

    pub(crate) fn max_length(&self) -> usize {
        self.guard.policy().max_length()
    }

    /// Change the bound and truncate the content right away if needed.
    pub(crate) fn set_max_length(&self, max_length: usize) -> Result<(), DocumentError> {
        self.guard.policy_mut().set_max_length(max_length);
        fence_core::debug!(max_length, "max length changed");

        let content = self.document.text();
        if max_length > 0 && char_len(&content) > max_length {
            // The cut content is judged from scratch, as after a full rewrite.
            self.guard.policy_mut().on_delete("");
            self.document.set_text(truncate_chars(&content, max_length))
        } else {
            self.guard.recheck();
            Ok(())
        }
    }

    pub(crate) fn insert_str(&self, offset: usize, s: &str) -> Result<(), DocumentError> {
        self.document.insert(offset, s)
    }

    pub(crate) fn push_str(&self, s: &str) -> Result<(), DocumentError> {
        self.document.insert(self.document.len(), s)
    }

    pub(crate) fn remove(&self, offset: usize, len: usize) -> Result<(), DocumentError> {
        self.document.remove(offset, len)
    }

    /// Remove the last char. Returns `false` when the field was empty.
    pub(crate) fn backspace(&self) -> Result<bool, DocumentError> {
        match self.document.len() {
            0 => Ok(false),
            len => self.document.remove(len - 1, 1).map(|()| true),
        }
    }

    pub(crate) fn clear(&self) -> Result<(), DocumentError> {
        self.document.set_text("")
    }
}

impl<P: EditPolicy + 'static> Drop for FieldCore<P> {
    fn drop(&mut self) {
        self.document.remove_listener(self.listener);
    }
}

impl<P: EditPolicy + fmt::Debug + 'static> fmt::Debug for FieldCore<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCore")
            .field("document", &self.document)
            .field("policy", &*self.guard.policy())
            .field("columns", &self.columns)
            .finish()
    }
}
