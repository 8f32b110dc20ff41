//! Convenient imports for opcell.
//!
//! Re-exports the types almost every consumer needs:
//!
//! ```ignore
//! use opcell::prelude::*;
//!
//! let pool: Arc<dyn TaskPool> = Arc::new(ThreadedPool::new(4)?);
//! let op: AsyncOperation<u32> = AsyncOperation::spawn(pool, || Ok(7))?;
//! ```

// The typed wrapper and its engine
pub use crate::{AsyncOperation, CompletedHandler, OperationEngine};

// Status and results
pub use crate::{OperationStatus, ResultValue, Value, WorkFailure};

// Error handling
pub use crate::{OperationError, Result};

// Pools
pub use crate::{InlinePool, ManualPool, TaskPool, ThreadedPool};

// Operations are always shared through Arc
pub use std::sync::Arc;
