//! Error taxonomy for the operation engine
//!
//! Two kinds of failure flow through the engine and they never mix:
//!
//! - **Contract violations** are returned synchronously to the caller that
//!   violated them: an operation invalid for the current status, a second
//!   handler registration, a failed task submission.
//! - **Work failures** are produced by the callback on a worker thread,
//!   captured as a [`WorkFailure`], and surfaced only through the completion
//!   path (handler status or the result accessor) - never thrown across the
//!   worker/caller boundary.

use crate::status::OperationStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure reported by a work callback.
///
/// Stored in the engine's error slot once the worker finishes; `code` is the
/// machine-readable discriminant, `message` is for humans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkFailure {
    /// Machine-readable failure code.
    pub code: i32,
    /// Human-readable description.
    pub message: String,
}

impl WorkFailure {
    /// Create a new failure record.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        WorkFailure {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for WorkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code {}: {}", self.code, self.message)
    }
}

/// All operation engine errors.
///
/// Each variant corresponds to a distinct failure class; nothing is silently
/// swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// The requested operation is not valid for the current status
    /// (e.g. reading the result before the operation finished, or any call
    /// once the operation is closed).
    #[error("illegal state: {operation} is not valid while {status}")]
    IllegalState {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Status the operation was in at the time of the call.
        status: OperationStatus,
    },

    /// A status transition that the lifecycle forbids
    /// (closing an operation whose work is still outstanding).
    #[error("illegal state change: {from} -> {to}")]
    IllegalStateChange {
        /// Status the operation was in.
        from: OperationStatus,
        /// Status the caller asked for.
        to: OperationStatus,
    },

    /// A completion handler was already assigned to this operation.
    #[error("completion handler already assigned")]
    HandlerAlreadyAssigned,

    /// The work could not be handed to the pool; no partial operation is
    /// left live.
    #[error("task submission failed: {0}")]
    Submission(String),

    /// The work callback itself reported failure; carries the stored code.
    #[error("operation failed: {0}")]
    Callback(WorkFailure),

    /// The stored result does not match the statically expected shape.
    #[error("wrong result type: expected {expected}, got {actual}")]
    WrongType {
        /// Variant the typed wrapper expected.
        expected: &'static str,
        /// Variant actually stored.
        actual: &'static str,
    },
}

/// Result type alias using [`OperationError`].
pub type Result<T> = std::result::Result<T, OperationError>;
