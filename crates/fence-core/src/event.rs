#![forbid(unsafe_code)]

//! Change notifications emitted by a [`Document`](crate::document::Document).
//!
//! A document tells its listeners *after* each mutation what happened. The
//! three variants mirror the edits a text buffer can perform:
//!
//! - [`ChangeKind::Insert`]: text was added (also used when the whole content
//!   is overwritten with a non-empty value)
//! - [`ChangeKind::Remove`]: text was removed
//! - [`ChangeKind::Changed`]: a content-neutral update; listeners that only
//!   care about text can ignore it
//!
//! Listeners must not mutate the document from inside a callback. Mutations
//! attempted during dispatch fail with
//! [`DocumentError::Reentrant`](crate::document::DocumentError::Reentrant);
//! post a task on a [`Scheduler`](crate::dispatch::Scheduler) instead.

/// What kind of mutation produced a [`ChangeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Text was inserted.
    Insert,
    /// Text was removed.
    Remove,
    /// Bulk/attribute update that did not go through insert or remove.
    Changed,
}

impl ChangeKind {
    /// Stable lowercase name, used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Remove => "remove",
            Self::Changed => "changed",
        }
    }
}

/// A single change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent<'a> {
    /// Mutation kind.
    pub kind: ChangeKind,
    /// Char offset where the change starts.
    pub offset: usize,
    /// Number of chars inserted or removed.
    pub len: usize,
    /// Full document content after the change.
    pub content: &'a str,
    /// Document revision after the change.
    pub revision: u64,
}

impl ChangeEvent<'_> {
    /// Route the event to the matching listener callback.
    pub fn dispatch_to(&self, listener: &dyn DocumentListener) {
        match self.kind {
            ChangeKind::Insert => listener.inserted(self),
            ChangeKind::Remove => listener.removed(self),
            ChangeKind::Changed => listener.changed(self),
        }
    }
}

/// Receiver of document change notifications.
///
/// Callbacks take `&self`; implementations keep their mutable state behind
/// `Cell`/`RefCell`.
pub trait DocumentListener {
    /// Text was inserted.
    fn inserted(&self, event: &ChangeEvent<'_>);

    /// Text was removed.
    fn removed(&self, event: &ChangeEvent<'_>);

    /// Content-neutral update.
    fn changed(&self, _event: &ChangeEvent<'_>) {}
}

/// Handle returned when registering a listener, used to unregister it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl ListenerId {
    /// Raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<&'static str>>,
    }

    impl DocumentListener for Recorder {
        fn inserted(&self, _event: &ChangeEvent<'_>) {
            self.seen.borrow_mut().push("inserted");
        }

        fn removed(&self, _event: &ChangeEvent<'_>) {
            self.seen.borrow_mut().push("removed");
        }
    }

    fn event(kind: ChangeKind) -> ChangeEvent<'static> {
        ChangeEvent {
            kind,
            offset: 0,
            len: 1,
            content: "x",
            revision: 1,
        }
    }

    #[test]
    fn dispatch_routes_by_kind() {
        let recorder = Recorder::default();
        event(ChangeKind::Insert).dispatch_to(&recorder);
        event(ChangeKind::Remove).dispatch_to(&recorder);
        event(ChangeKind::Changed).dispatch_to(&recorder);
        assert_eq!(*recorder.seen.borrow(), vec!["inserted", "removed"]);
    }

    #[test]
    fn kind_names() {
        assert_eq!(ChangeKind::Insert.as_str(), "insert");
        assert_eq!(ChangeKind::Remove.as_str(), "remove");
        assert_eq!(ChangeKind::Changed.as_str(), "changed");
    }
}
