//! Production pool backed by `rayon`
//!
//! A fixed set of worker threads built once at pool construction. Tasks are
//! fire-and-forget: completion is reported by the task itself (the engine's
//! worker body), not by the pool.

use crate::{PoolError, Task, TaskHandle, TaskPool};
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread pool with a fixed number of OS worker threads.
///
/// Submission enqueues onto rayon's internal deques and returns immediately;
/// it never blocks behind running tasks.
pub struct ThreadedPool {
    inner: rayon::ThreadPool,
    next_task: AtomicU64,
}

impl ThreadedPool {
    /// Build a pool with `threads` workers.
    ///
    /// `0` lets rayon pick one worker per available core.
    pub fn new(threads: usize) -> Result<Self, PoolError> {
        let inner = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("opcell-worker-{i}"))
            .build()
            .map_err(|e| PoolError::Build(e.to_string()))?;

        Ok(ThreadedPool {
            inner,
            next_task: AtomicU64::new(0),
        })
    }

    /// Number of worker threads in this pool.
    pub fn threads(&self) -> usize {
        self.inner.current_num_threads()
    }
}

impl TaskPool for ThreadedPool {
    fn submit(&self, task: Task) -> Result<TaskHandle, PoolError> {
        let id = self.next_task.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.spawn(task);
        tracing::trace!(task = id, "task submitted");
        Ok(TaskHandle::new(id))
    }
}
