//! Core types for opcell
//!
//! This crate defines the shared vocabulary of the operation engine:
//! - `OperationStatus`: the lifecycle state machine
//! - `Value`: the tagged container used as the generic result slot
//! - `ResultValue`: mapping between `Value` and statically-known result shapes
//! - `OperationError` / `WorkFailure`: the error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod status;
pub mod value;

pub use error::{OperationError, Result, WorkFailure};
pub use status::OperationStatus;
pub use value::{ResultValue, Value};
