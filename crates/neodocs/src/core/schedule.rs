//! A FIFO queue of deferred command invocations.

use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};

use crate::{element::Element, keybinding::Action};

/// A command invocation waiting for a later turn of the host loop.
pub struct Job {
    /// Action to run. Named actions are resolved when the job runs.
    pub action: Action,
    /// Element the command runs against.
    pub element: Rc<dyn Element>,
    /// Arguments for the command.
    pub args: Vec<String>,
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("action", &self.action)
            .field("element", &self.element.id())
            .field("args", &self.args)
            .finish()
    }
}

/// A first-in first-out queue of deferred jobs.
///
/// Jobs can be queued through a shared reference, so a running command can
/// schedule follow-up work. Queued jobs can't be cancelled.
#[derive(Default, Debug)]
pub struct Scheduler {
    /// Pending jobs, oldest first.
    queue: RefCell<VecDeque<Job>>,
}

impl Scheduler {
    /// Construct an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a job behind everything already queued.
    pub fn push(&self, job: Job) {
        self.queue.borrow_mut().push_back(job);
    }

    /// Number of jobs waiting.
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Is the queue empty?
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Remove and return every job queued so far. Jobs queued after this call
    /// wait for the next batch.
    pub fn take_batch(&self) -> VecDeque<Job> {
        self.queue.take()
    }
}
