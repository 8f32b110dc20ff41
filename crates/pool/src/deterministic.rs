//! Deterministic pools for tests
//!
//! Real worker threads make completion timing a race. These pools pin the
//! ordering instead: [`InlinePool`] finishes work before `submit` returns,
//! [`ManualPool`] holds work until the test explicitly runs it. Between the
//! two, both sides of the "register handler before / after completion" race
//! can be exercised without sleeps.

use crate::{PoolError, Task, TaskHandle, TaskPool};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

/// Runs each task synchronously inside `submit`.
///
/// The task is complete by the time submission returns, so the submitter
/// always observes a terminal status.
#[derive(Debug, Default)]
pub struct InlinePool {
    next_task: AtomicU64,
}

impl InlinePool {
    /// Create an inline pool.
    pub fn new() -> Self {
        InlinePool::default()
    }
}

impl TaskPool for InlinePool {
    fn submit(&self, task: Task) -> Result<TaskHandle, PoolError> {
        let id = self.next_task.fetch_add(1, Ordering::Relaxed) + 1;
        task();
        Ok(TaskHandle::new(id))
    }
}

/// Queues tasks until the test runs them.
///
/// `submit` only enqueues; nothing executes until [`run_next`] or
/// [`run_all`]. Tasks run on the calling thread, in submission order.
///
/// [`run_next`]: ManualPool::run_next
/// [`run_all`]: ManualPool::run_all
#[derive(Default)]
pub struct ManualPool {
    queue: Mutex<VecDeque<Task>>,
    next_task: AtomicU64,
}

impl ManualPool {
    /// Create an empty manual pool.
    pub fn new() -> Self {
        ManualPool::default()
    }

    /// Run the oldest queued task; false if the queue was empty.
    pub fn run_next(&self) -> bool {
        // Take the task before running it; the task body may re-enter the
        // pool (e.g. a handler spawning a follow-up operation).
        let task = self.queue.lock().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Run every queued task, including ones queued while draining.
    /// Returns how many ran.
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }
}

impl TaskPool for ManualPool {
    fn submit(&self, task: Task) -> Result<TaskHandle, PoolError> {
        let id = self.next_task.fetch_add(1, Ordering::Relaxed) + 1;
        self.queue.lock().push_back(task);
        tracing::trace!(task = id, "task queued");
        Ok(TaskHandle::new(id))
    }
}
