//! The shared asynchronous operation state machine
//!
//! One engine represents one unit of off-thread work and its eventual
//! result. The lifecycle:
//!
//! 1. [`OperationEngine::new`] stores the work callback; status is
//!    `Started`.
//! 2. [`OperationEngine::start`] hands the work to the pool, together with a
//!    keep-alive `Arc` clone of the engine. The clone is what guarantees the
//!    engine outlives the background task.
//! 3. The worker runs the callback off the mutex, then under the mutex
//!    records the result and moves to `Completed`/`Error` (preserving
//!    `Canceled` and `Closed`), disarms a registered handler, and finally
//!    invokes it outside the mutex. The keep-alive clone drops last.
//! 4. `close` releases the task handle; it is rejected while work is
//!    outstanding and idempotent afterwards.
//!
//! # Thread Safety
//!
//! A single `parking_lot::Mutex` totally orders every access to status,
//! result, error and handler. Handler invocation always happens outside the
//! mutex, after the slot has been disarmed, on exactly one of the two racing
//! paths (worker completion vs. late registration).

use crate::handler::{CompletedHandler, HandlerSlot};
use opcell_core::{OperationError, OperationStatus, Result, Value, WorkFailure};
use opcell_pool::{TaskHandle, TaskPool};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Work callback: runs once on a pool thread and produces the operation's
/// outcome. Everything the work needs (invoker, parameters) is owned by the
/// closure.
pub type WorkFn = Box<dyn FnOnce() -> std::result::Result<Value, WorkFailure> + Send + 'static>;

static NEXT_OPERATION_ID: AtomicU64 = AtomicU64::new(1);

/// The shared asynchronous-operation primitive.
///
/// Engines are always handled through `Arc`; the `Arc` count is the
/// ownership model, including the keep-alive reference taken at
/// [`start`](OperationEngine::start).
pub struct OperationEngine {
    id: u64,
    pool: Arc<dyn TaskPool>,
    state: Mutex<EngineState>,
}

struct EngineState {
    status: OperationStatus,
    result: Value,
    failure: Option<WorkFailure>,
    handler: HandlerSlot,
    task: Option<TaskHandle>,
    work: Option<WorkFn>,
    started: bool,
}

impl OperationEngine {
    /// Create an engine holding `work`, ready to be started.
    ///
    /// The operation is in `Started` status from construction; nothing runs
    /// until [`start`](OperationEngine::start).
    pub fn new(pool: Arc<dyn TaskPool>, work: WorkFn) -> Arc<Self> {
        let id = NEXT_OPERATION_ID.fetch_add(1, Ordering::Relaxed);
        Arc::new(OperationEngine {
            id,
            pool,
            state: Mutex::new(EngineState {
                status: OperationStatus::Started,
                result: Value::Empty,
                failure: None,
                handler: HandlerSlot::Unset,
                task: None,
                work: Some(work),
                started: false,
            }),
        })
    }

    /// Submit the stored work to the pool.
    ///
    /// Callable exactly once; a second call fails with `IllegalState`. The
    /// submitted closure owns an `Arc` clone of the engine, so the engine
    /// cannot be dropped while the work is outstanding. On submission
    /// failure that clone is dropped before the error is reported and no
    /// background work exists.
    pub fn start(this: &Arc<Self>) -> Result<()> {
        {
            let mut state = this.state.lock();
            if state.started {
                return Err(OperationError::IllegalState {
                    operation: "start",
                    status: state.status,
                });
            }
            state.started = true;
        }

        // Keep the operation alive for the duration of the background task.
        let keep_alive = Arc::clone(this);
        let handle = this
            .pool
            .submit(Box::new(move || keep_alive.run()))
            .map_err(|e| OperationError::Submission(e.to_string()))?;

        // A synchronous pool may already have run the task here; the handle
        // is still stored and released exactly once, at close.
        this.state.lock().task = Some(handle);
        tracing::trace!(operation = this.id, "work submitted");
        Ok(())
    }

    /// Worker body: runs on a pool thread.
    fn run(self: Arc<Self>) {
        let work = self.state.lock().work.take();
        let Some(work) = work else {
            // The pool's exactly-once contract was violated; there is
            // nothing left to run.
            tracing::error!(operation = self.id, "work invoked twice by pool");
            return;
        };

        // The callback runs off the mutex: it may take arbitrarily long and
        // the engine's synchronous operations must stay callable meanwhile.
        let outcome = work();

        let (handler, status) = {
            let mut state = self.state.lock();
            match outcome {
                Ok(value) => {
                    state.result = value;
                    if Self::accepts_completion(state.status) {
                        state.status = OperationStatus::Completed;
                    }
                }
                Err(failure) => {
                    state.failure = Some(failure);
                    if Self::accepts_completion(state.status) {
                        state.status = OperationStatus::Error;
                    }
                }
            }
            (state.handler.disarm(), state.status)
        };

        tracing::debug!(operation = self.id, status = %status, "work finished");

        if let Some(handler) = handler {
            handler(status);
        }
        // The keep-alive reference taken in start drops here, after the
        // handler has run.
    }

    /// A finishing worker may only overwrite `Started`.
    ///
    /// `Canceled` is sticky: cancellation cannot stop the in-flight
    /// callback, but its verdict survives the callback finishing. `Closed`
    /// (reachable when the caller cancels and then closes while the work is
    /// still running) is likewise preserved.
    fn accepts_completion(status: OperationStatus) -> bool {
        status == OperationStatus::Started
    }

    /// Register the completion handler.
    ///
    /// Registration is single-shot, even with `None`: the slot distinguishes
    /// "never assigned" from "assigned nothing", and only the former admits
    /// a registration. If the operation is already terminal the handler is
    /// invoked immediately, synchronously, on this thread, before returning.
    pub fn set_completed(&self, handler: Option<CompletedHandler>) -> Result<()> {
        let mut state = self.state.lock();
        if state.status == OperationStatus::Closed {
            return Err(OperationError::IllegalState {
                operation: "set_completed",
                status: state.status,
            });
        }
        if !state.handler.is_unset() {
            return Err(OperationError::HandlerAlreadyAssigned);
        }

        match handler {
            None => {
                state.handler = HandlerSlot::Empty;
            }
            Some(handler) => {
                if state.status != OperationStatus::Started {
                    // Disarm before invoking, same as the worker path: the
                    // slot must never deliver twice or be re-armed.
                    let status = state.status;
                    state.handler = HandlerSlot::Empty;
                    drop(state);

                    handler(status);
                    return Ok(());
                }
                state.handler = HandlerSlot::Armed(handler);
            }
        }
        Ok(())
    }

    /// Whether a handler is currently registered and undelivered.
    ///
    /// The internal "never assigned" sentinel reads as absent.
    pub fn has_completed_handler(&self) -> Result<bool> {
        let state = self.state.lock();
        if state.status == OperationStatus::Closed {
            return Err(OperationError::IllegalState {
                operation: "has_completed_handler",
                status: state.status,
            });
        }
        Ok(state.handler.is_armed())
    }

    /// Copy of the stored outcome: the result value, or the failure the
    /// work callback reported.
    ///
    /// Fails fast with `IllegalState` unless status is `Completed` or
    /// `Error`; the engine never blocks waiting for the worker.
    pub fn outcome(&self) -> Result<std::result::Result<Value, WorkFailure>> {
        let state = self.state.lock();
        if !state.status.has_result() {
            return Err(OperationError::IllegalState {
                operation: "outcome",
                status: state.status,
            });
        }
        Ok(match &state.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(state.result.clone()),
        })
    }

    /// Current status. Infallible so callers can poll through `Closed`.
    pub fn status(&self) -> OperationStatus {
        self.state.lock().status
    }

    /// The stored failure, or `None` while the work has not failed.
    pub fn error_code(&self) -> Result<Option<WorkFailure>> {
        let state = self.state.lock();
        if state.status == OperationStatus::Closed {
            return Err(OperationError::IllegalState {
                operation: "error_code",
                status: state.status,
            });
        }
        Ok(state.failure.clone())
    }

    /// Numeric identity of this operation.
    pub fn id(&self) -> Result<u64> {
        let state = self.state.lock();
        if state.status == OperationStatus::Closed {
            return Err(OperationError::IllegalState {
                operation: "id",
                status: state.status,
            });
        }
        Ok(self.id)
    }

    /// Request cancellation.
    ///
    /// Cooperative and best-effort: the in-flight callback keeps running,
    /// but a `Started` operation moves to `Canceled` and stays there. A
    /// no-op on an already-terminal operation.
    pub fn cancel(&self) -> Result<()> {
        let mut state = self.state.lock();
        match state.status {
            OperationStatus::Closed => Err(OperationError::IllegalState {
                operation: "cancel",
                status: state.status,
            }),
            OperationStatus::Started => {
                state.status = OperationStatus::Canceled;
                tracing::debug!(operation = self.id, "cancel requested");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Release the task handle and move to `Closed`.
    ///
    /// Rejected with `IllegalStateChange` while the work is outstanding;
    /// idempotent once closed.
    pub fn close(&self) -> Result<()> {
        let task = {
            let mut state = self.state.lock();
            match state.status {
                OperationStatus::Started => {
                    return Err(OperationError::IllegalStateChange {
                        from: OperationStatus::Started,
                        to: OperationStatus::Closed,
                    });
                }
                OperationStatus::Closed => return Ok(()),
                _ => {
                    state.status = OperationStatus::Closed;
                    state.task.take()
                }
            }
        };
        drop(task);
        tracing::trace!(operation = self.id, "closed");
        Ok(())
    }
}

impl Drop for OperationEngine {
    fn drop(&mut self) {
        // Runs only once every Arc is gone, which the keep-alive reference
        // makes impossible while work is outstanding. Force the close
        // effects in case the caller never closed explicitly: release the
        // task handle and drop a still-registered handler.
        let state = self.state.get_mut();
        state.task.take();
        state.handler = HandlerSlot::Empty;
        tracing::trace!(operation = self.id, "operation dropped");
    }
}
