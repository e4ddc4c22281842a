#![forbid(unsafe_code)]

//! Mutable text document with change notifications.
//!
//! [`Document`] is the buffer a field edits. Every mutation bumps the
//! revision and is reported to registered [`DocumentListener`]s after it has
//! been applied.
//!
//! # Reentrancy
//!
//! While listeners are being notified the document is locked: `insert`,
//! `remove`, `set_text` and `notify_changed` return
//! [`DocumentError::Reentrant`] instead of mutating. A listener that wants to
//! change the text (for example to undo a rejected keystroke) has to defer the
//! write until dispatch has finished.
//!
//! ```
//! use fence_core::document::{Document, DocumentError};
//!
//! let doc = Document::with_text("12");
//! doc.insert(2, "3").unwrap();
//! assert_eq!(doc.text(), "123");
//! assert!(matches!(doc.remove(2, 5), Err(DocumentError::OutOfBounds { .. })));
//! ```
//!
//! `Document` is a cheap handle (`Rc` inside); clones share the same buffer.
//! It is single-threaded and intentionally `!Send`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::event::{ChangeEvent, ChangeKind, DocumentListener, ListenerId};
use crate::text::{byte_offset, char_len};

/// Errors from document mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// A mutation was attempted while listeners were being notified.
    Reentrant,
    /// The requested char range lies outside the document.
    OutOfBounds {
        /// Requested char offset.
        offset: usize,
        /// Requested char count.
        len: usize,
        /// Document length in chars.
        doc_len: usize,
    },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reentrant => write!(f, "document mutated while notifying listeners"),
            Self::OutOfBounds {
                offset,
                len,
                doc_len,
            } => write!(
                f,
                "range {offset}..{} out of bounds for document of {doc_len} chars",
                offset.saturating_add(*len)
            ),
        }
    }
}

impl std::error::Error for DocumentError {}

struct Inner {
    text: RefCell<String>,
    revision: Cell<u64>,
    dispatching: Cell<bool>,
    listeners: RefCell<Vec<(ListenerId, Rc<dyn DocumentListener>)>>,
    next_listener: Cell<u64>,
}

/// Shared, observable text buffer.
#[derive(Clone)]
pub struct Document {
    inner: Rc<Inner>,
}

/// Non-owning handle to a [`Document`].
///
/// Listeners that need to write back into the document they observe hold
/// one of these, so the document and its listeners do not keep each other
/// alive.
#[derive(Clone, Default)]
pub struct WeakDocument {
    inner: Weak<Inner>,
}

impl WeakDocument {
    /// Upgrade to a strong handle if the document is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Document> {
        self.inner.upgrade().map(|inner| Document { inner })
    }
}

impl fmt::Debug for WeakDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakDocument")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// Resets the dispatch flag even if a listener unwinds.
struct DispatchGuard<'a>(&'a Cell<bool>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create a document holding `text`. No notification is emitted.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(Inner {
                text: RefCell::new(text.into()),
                revision: Cell::new(0),
                dispatching: Cell::new(false),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    /// Weak handle to this document.
    #[must_use]
    pub fn downgrade(&self) -> WeakDocument {
        WeakDocument {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // --- Read access ---

    /// Copy of the current content.
    #[must_use]
    pub fn text(&self) -> String {
        self.inner.text.borrow().clone()
    }

    /// Length in chars.
    #[must_use]
    pub fn len(&self) -> usize {
        char_len(&self.inner.text.borrow())
    }

    /// Whether the document is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.text.borrow().is_empty()
    }

    /// Monotonic revision, incremented on every content mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    /// Whether listeners are currently being notified.
    #[must_use]
    pub fn is_dispatching(&self) -> bool {
        self.inner.dispatching.get()
    }

    // --- Listeners ---

    /// Register a listener. It is notified after every subsequent mutation.
    pub fn add_listener(&self, listener: Rc<dyn DocumentListener>) -> ListenerId {
        let id = ListenerId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Unregister a listener. Returns `false` if the id was unknown.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    // --- Mutation ---

    /// Insert `s` at char `offset`.
    pub fn insert(&self, offset: usize, s: &str) -> Result<(), DocumentError> {
        self.ensure_idle()?;
        if s.is_empty() {
            return Ok(());
        }
        {
            let mut text = self.inner.text.borrow_mut();
            let at = byte_offset(&text, offset).ok_or(DocumentError::OutOfBounds {
                offset,
                len: 0,
                doc_len: char_len(&text),
            })?;
            text.insert_str(at, s);
        }
        self.bump_revision();
        self.notify(ChangeKind::Insert, offset, char_len(s));
        Ok(())
    }

    /// Remove `len` chars starting at char `offset`.
    pub fn remove(&self, offset: usize, len: usize) -> Result<(), DocumentError> {
        self.ensure_idle()?;
        {
            let mut text = self.inner.text.borrow_mut();
            let out_of_bounds = DocumentError::OutOfBounds {
                offset,
                len,
                doc_len: char_len(&text),
            };
            let start = byte_offset(&text, offset).ok_or_else(|| out_of_bounds.clone())?;
            let end = offset
                .checked_add(len)
                .and_then(|end| byte_offset(&text, end))
                .ok_or(out_of_bounds)?;
            if start == end {
                return Ok(());
            }
            text.replace_range(start..end, "");
        }
        self.bump_revision();
        self.notify(ChangeKind::Remove, offset, len);
        Ok(())
    }

    /// Replace the whole content.
    ///
    /// Emits a single notification: [`ChangeKind::Insert`] covering the new
    /// content when it is non-empty, [`ChangeKind::Remove`] covering the old
    /// content when the document becomes empty. Writing the current content
    /// again is a no-op and notifies nobody.
    pub fn set_text(&self, s: &str) -> Result<(), DocumentError> {
        self.ensure_idle()?;
        let old_len = {
            let mut text = self.inner.text.borrow_mut();
            if *text == s {
                return Ok(());
            }
            let old_len = char_len(&text);
            text.clear();
            text.push_str(s);
            old_len
        };
        self.bump_revision();
        if s.is_empty() {
            self.notify(ChangeKind::Remove, 0, old_len);
        } else {
            self.notify(ChangeKind::Insert, 0, char_len(s));
        }
        Ok(())
    }

    /// Emit a [`ChangeKind::Changed`] notification without touching the text.
    pub fn notify_changed(&self) -> Result<(), DocumentError> {
        self.ensure_idle()?;
        let len = self.len();
        self.notify(ChangeKind::Changed, 0, len);
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), DocumentError> {
        if self.inner.dispatching.get() {
            return Err(DocumentError::Reentrant);
        }
        Ok(())
    }

    fn bump_revision(&self) {
        self.inner.revision.set(self.inner.revision.get() + 1);
    }

    fn notify(&self, kind: ChangeKind, offset: usize, len: usize) {
        // Snapshot so listeners may (un)register others while being notified.
        let listeners: Vec<Rc<dyn DocumentListener>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        if listeners.is_empty() {
            return;
        }

        let text = self.inner.text.borrow();
        let event = ChangeEvent {
            kind,
            offset,
            len,
            content: &text,
            revision: self.inner.revision.get(),
        };
        crate::trace!(
            kind = kind.as_str(),
            offset,
            len,
            listeners = listeners.len(),
            "document change"
        );

        self.inner.dispatching.set(true);
        let _guard = DispatchGuard(&self.inner.dispatching);
        for listener in &listeners {
            event.dispatch_to(listener.as_ref());
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("text", &*self.inner.text.borrow())
            .field("revision", &self.inner.revision.get())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
