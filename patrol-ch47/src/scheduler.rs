//! One-tick deferral of work on the host's single simulation thread.
//!
//! Chinook brains finish their own setup during the spawn tick, so the patrol
//! rule queues its attachment and runs it from the host's next-tick callback.

use patrol_core::types::AgentId;

/// Work postponed to the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Install a patrol path on the agent.
    AttachPatrol(AgentId),
}

/// FIFO of tasks deferred until the next tick.
///
/// [`take_due`](Self::take_due) hands out everything queued so far; tasks
/// deferred while those run wait for the following tick.
#[derive(Debug, Clone)]
pub struct DeferredQueue<T> {
    pending: Vec<T>,
}

impl<T> DeferredQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self { pending: Vec::new() }
    }

    /// Run `task` on the next tick.
    pub fn defer(&mut self, task: T) {
        self.pending.push(task);
    }

    /// Remove and return every task queued before this call, oldest first.
    pub fn take_due(&mut self) -> Vec<T> {
        std::mem::take(&mut self.pending)
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
