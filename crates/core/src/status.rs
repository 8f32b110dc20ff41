//! Operation lifecycle states
//!
//! Every operation moves through exactly one of these states at a time:
//!
//! ```text
//! Started ──┬──> Completed ──┐
//!           ├──> Error ──────┼──> Closed
//!           └──> Canceled ───┘
//! ```
//!
//! `Closed` is only reachable from a terminal state for a caller-initiated
//! close; the destructor may force it as a safety net once no work is
//! outstanding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an asynchronous operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    /// Work has been (or is about to be) submitted and has not finished.
    Started,
    /// The work callback ran and produced a result.
    Completed,
    /// The work callback ran and reported a failure.
    Error,
    /// Cancellation was requested while the operation was still running.
    ///
    /// Cancellation is cooperative: the in-flight callback is not
    /// interrupted, but a finishing worker preserves `Canceled`.
    Canceled,
    /// The operation was closed and its task handle released.
    Closed,
}

impl OperationStatus {
    /// True for `Completed`, `Error` and `Canceled`.
    ///
    /// Terminal states are the only ones from which `close` is permitted.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OperationStatus::Completed | OperationStatus::Error | OperationStatus::Canceled
        )
    }

    /// True once the stored result and error code are readable.
    pub fn has_result(self) -> bool {
        matches!(self, OperationStatus::Completed | OperationStatus::Error)
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationStatus::Started => "Started",
            OperationStatus::Completed => "Completed",
            OperationStatus::Error => "Error",
            OperationStatus::Canceled => "Canceled",
            OperationStatus::Closed => "Closed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!OperationStatus::Started.is_terminal());
        assert!(OperationStatus::Completed.is_terminal());
        assert!(OperationStatus::Error.is_terminal());
        assert!(OperationStatus::Canceled.is_terminal());
        assert!(!OperationStatus::Closed.is_terminal());
    }

    #[test]
    fn test_result_availability() {
        assert!(OperationStatus::Completed.has_result());
        assert!(OperationStatus::Error.has_result());
        assert!(!OperationStatus::Canceled.has_result());
        assert!(!OperationStatus::Started.has_result());
        assert!(!OperationStatus::Closed.has_result());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(OperationStatus::Started.to_string(), "Started");
        assert_eq!(OperationStatus::Closed.to_string(), "Closed");
    }
}
