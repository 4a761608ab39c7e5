//! Virtual-time timer queue.

use crate::binding::EffectError;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use tracing::trace;

/// Identifies a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

type Task = Box<dyn FnOnce() -> Result<(), EffectError>>;

struct Entry {
    id: TimerId,
    deadline: Duration,
    task: Task,
}

#[derive(Default)]
struct Queue {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
}

impl Queue {
    /// Remove the earliest entry due at or before `until`. Ties go to the
    /// entry scheduled first.
    fn pop_due(&mut self, until: Duration) -> Option<Entry> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.deadline <= until)
            .min_by_key(|(_, entry)| (entry.deadline, entry.id))
            .map(|(index, _)| index)?;
        Some(self.entries.remove(index))
    }
}

/// Cloneable, single-threaded scheduler driven by an explicit clock.
///
/// Nothing runs until [`advance`](Self::advance) moves the clock. Tasks
/// may schedule or cancel other tasks and send events to bindings while
/// they run.
#[derive(Clone, Default)]
pub struct Timers {
    queue: Rc<RefCell<Queue>>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` once the clock has advanced by `delay`.
    pub fn schedule<F>(&self, delay: Duration, task: F) -> TimerId
    where
        F: FnOnce() -> Result<(), EffectError> + 'static,
    {
        let mut queue = self.queue.borrow_mut();
        let id = TimerId(queue.next_id);
        queue.next_id += 1;
        let deadline = queue.now + delay;
        trace!(timer = id.0, ?deadline, "timer scheduled");
        queue.entries.push(Entry {
            id,
            deadline,
            task: Box::new(task),
        });
        id
    }

    /// Drop a pending task. Returns false if it already ran or was
    /// cancelled.
    pub fn cancel(&self, id: TimerId) -> bool {
        let mut queue = self.queue.borrow_mut();
        let before = queue.entries.len();
        queue.entries.retain(|entry| entry.id != id);
        let cancelled = queue.entries.len() != before;
        if cancelled {
            trace!(timer = id.0, "timer cancelled");
        }
        cancelled
    }

    /// Move the clock forward, running every task that falls due in
    /// deadline order, including tasks scheduled by earlier tasks.
    ///
    /// Returns how many tasks ran. The first failing task stops the
    /// advance with the clock at that task's deadline.
    pub fn advance(&self, by: Duration) -> Result<usize, EffectError> {
        let until = self.now() + by;
        let mut ran = 0;

        loop {
            let entry = {
                let mut queue = self.queue.borrow_mut();
                match queue.pop_due(until) {
                    Some(entry) => {
                        queue.now = entry.deadline;
                        entry
                    }
                    None => {
                        queue.now = until;
                        break;
                    }
                }
            };

            trace!(timer = entry.id.0, deadline = ?entry.deadline, "timer fired");
            (entry.task)()?;
            ran += 1;
        }

        Ok(ran)
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.borrow().entries.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.queue.borrow().entries.iter().any(|entry| entry.id == id)
    }
}

impl fmt::Debug for Timers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queue = self.queue.borrow();
        f.debug_struct("Timers")
            .field("now", &queue.now)
            .field("pending", &queue.entries.len())
            .finish()
    }
}
