//! # Opcell
//!
//! Asynchronous operation primitive: run work on a pool thread, get the
//! result back through a polled status or a completion handler.
//!
//! An operation is a result that becomes available later. Callers construct
//! a typed operation around a work closure, the closure runs on a worker
//! thread, and completion is reported exactly once through an optionally
//! registered handler. Nothing in the API blocks waiting for the worker:
//! reading the result before completion fails fast instead.
//!
//! ## Quick Start
//!
//! ```ignore
//! use opcell::prelude::*;
//!
//! let pool: Arc<dyn TaskPool> = Arc::new(ThreadedPool::new(4)?);
//!
//! // Spawn work; the operation is already running.
//! let op: AsyncOperation<u32> = AsyncOperation::spawn(pool, || Ok(count_devices()?))?;
//!
//! // Either poll...
//! while !op.status().is_terminal() {}
//! println!("{} devices", op.results()?);
//!
//! // ...or register a completion handler (at most once per operation).
//! let done = op.clone();
//! op.set_completed(Some(Box::new(move |status| {
//!     if status == OperationStatus::Completed {
//!         println!("{} devices", done.results().unwrap());
//!     }
//! })))?;
//! ```
//!
//! ## Layers
//!
//! - [`OperationEngine`] - the shared state machine: status, result slot,
//!   handler slot, task handle, one mutex over all of them
//! - [`AsyncOperation`] - typed wrapper over an engine, one per result shape
//! - [`TaskPool`] - the submission seam; [`ThreadedPool`] in production,
//!   [`InlinePool`]/[`ManualPool`] for deterministic tests

#![warn(missing_docs)]

pub mod prelude;

// Re-export core types
pub use opcell_core::{OperationError, OperationStatus, Result, ResultValue, Value, WorkFailure};

// Re-export the engine and typed wrapper
pub use opcell_engine::{AsyncOperation, CompletedHandler, OperationEngine, WorkFn};

// Re-export the pool seam
pub use opcell_pool::{InlinePool, ManualPool, PoolError, Task, TaskHandle, TaskPool, ThreadedPool};
