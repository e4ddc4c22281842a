#![forbid(unsafe_code)]

//! Single-threaded deferred task execution.
//!
//! A [`Scheduler`] accepts tasks that must run *after* the current dispatch
//! cycle has finished, on the same thread. Fields use it to push corrective
//! writes out of document listener callbacks, where mutating the document is
//! forbidden.
//!
//! [`TaskQueue`] is the bundled implementation: a FIFO of boxed closures that
//! the host loop drains between input events.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use fence_core::dispatch::{Scheduler, TaskQueue};
//!
//! let queue = TaskQueue::new();
//! let scheduler = queue.scheduler();
//! let hits = Rc::new(Cell::new(0));
//!
//! let h = hits.clone();
//! scheduler.post(Box::new(move || h.set(h.get() + 1)));
//! assert_eq!(hits.get(), 0);
//!
//! assert_eq!(queue.run_pending(), 1);
//! assert_eq!(hits.get(), 1);
//! ```
//!
//! # Termination
//!
//! Tasks may post further tasks; [`TaskQueue::run_pending`] keeps going until
//! the queue is empty. Hosts that cannot trust every producer to converge use
//! [`TaskQueue::run_until_idle`], which stops after a fixed number of tasks and
//! reports [`DispatchError::BudgetExhausted`].

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Run-later primitive supplied by the host environment.
///
/// Implementations must not run the task synchronously inside `post`.
pub trait Scheduler {
    /// Queue `task` to run after the current dispatch cycle.
    fn post(&self, task: Task);
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    fn post(&self, task: Task) {
        (**self).post(task);
    }
}

/// Errors from draining a [`TaskQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// The task budget ran out with work still queued.
    BudgetExhausted {
        /// Tasks executed before giving up.
        ran: usize,
        /// Tasks still waiting.
        remaining: usize,
    },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BudgetExhausted { ran, remaining } => write!(
                f,
                "task budget exhausted after {ran} tasks with {remaining} still queued"
            ),
        }
    }
}

impl std::error::Error for DispatchError {}

type Tasks = RefCell<VecDeque<Task>>;

/// FIFO task queue for a single event-loop thread.
#[derive(Default)]
pub struct TaskQueue {
    tasks: Rc<Tasks>,
}

impl TaskQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for posting into this queue.
    ///
    /// The handle does not keep the queue alive; tasks posted after the queue
    /// is dropped are discarded.
    #[must_use]
    pub fn scheduler(&self) -> QueueScheduler {
        QueueScheduler {
            tasks: Rc::downgrade(&self.tasks),
        }
    }

    /// Queue a task directly.
    pub fn post(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Run tasks in FIFO order until none remain, including tasks posted by
    /// the tasks themselves. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while self.run_one() {
            ran += 1;
        }
        ran
    }

    /// Like [`run_pending`](Self::run_pending), but stops after `budget` tasks.
    pub fn run_until_idle(&self, budget: usize) -> Result<usize, DispatchError> {
        let mut ran = 0;
        while ran < budget {
            if !self.run_one() {
                return Ok(ran);
            }
            ran += 1;
        }
        match self.len() {
            0 => Ok(ran),
            remaining => {
                crate::warn!(ran, remaining, "task budget exhausted");
                Err(DispatchError::BudgetExhausted { ran, remaining })
            }
        }
    }

    fn run_one(&self) -> bool {
        // The borrow ends before the task runs so it can post more work.
        let next = self.tasks.borrow_mut().pop_front();
        match next {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.len())
            .finish()
    }
}

/// Posting handle for a [`TaskQueue`].
#[derive(Clone)]
pub struct QueueScheduler {
    tasks: Weak<Tasks>,
}

impl Scheduler for QueueScheduler {
    fn post(&self, task: Task) {
        match self.tasks.upgrade() {
            Some(tasks) => tasks.borrow_mut().push_back(task),
            None => {
                crate::debug!("task posted to a dropped queue; discarded");
            }
        }
    }
}

impl fmt::Debug for QueueScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueScheduler")
            .field("alive", &(self.tasks.strong_count() > 0))
            .finish()
    }
}
