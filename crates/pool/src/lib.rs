//! Task submission seam for opcell
//!
//! The operation engine consumes a thread pool through exactly two
//! capabilities: submit a task and get a handle back, release the handle.
//! This crate owns that seam.
//!
//! # Implementors
//!
//! - [`ThreadedPool`] (production): a fixed set of OS worker threads backed
//!   by `rayon`. Submission never blocks the caller.
//! - [`InlinePool`] (testing): executes the task synchronously inside
//!   `submit`, so the work is already finished when submission returns.
//! - [`ManualPool`] (testing): queues tasks; the test drives execution with
//!   [`ManualPool::run_next`], making interleavings deterministic.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod deterministic;
pub mod threaded;

pub use deterministic::{InlinePool, ManualPool};
pub use threaded::ThreadedPool;

use thiserror::Error;

/// A unit of work handed to a pool.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Errors from pool construction and task submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The worker pool could not be built.
    #[error("failed to build worker pool: {0}")]
    Build(String),

    /// The pool no longer accepts tasks.
    #[error("pool is shut down")]
    Shutdown,
}

/// Executes submitted tasks on worker threads.
///
/// **Contract:**
/// - `submit` must not block the caller waiting for the task to run.
/// - Every accepted task runs exactly once.
/// - On submission failure the task is dropped, together with everything it
///   owns, before the error is returned.
pub trait TaskPool: Send + Sync {
    /// Hand a task to the pool.
    ///
    /// Returns an owned [`TaskHandle`] on acceptance. The handle does not
    /// control the task; it is the token the submitter releases exactly once
    /// when it is done with the operation.
    fn submit(&self, task: Task) -> Result<TaskHandle, PoolError>;
}

/// Opaque, exclusively-owned token for a submitted task.
///
/// Released exactly once, by dropping.
#[derive(Debug)]
pub struct TaskHandle {
    id: u64,
}

impl TaskHandle {
    pub(crate) fn new(id: u64) -> Self {
        TaskHandle { id }
    }

    /// Pool-assigned identifier of the submitted task.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        tracing::trace!(task = self.id, "task handle released");
    }
}
