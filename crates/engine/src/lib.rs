//! Operation engine for opcell
//!
//! This crate implements the asynchronous operation primitive:
//! - [`OperationEngine`]: the shared state machine (status, result slot,
//!   handler slot, task handle) behind every operation
//! - [`AsyncOperation`]: the typed wrapper composing an engine with a
//!   statically-typed result accessor
//!
//! The engine is purely reactive: [`OperationEngine::start`] is the only
//! call that spawns work, every other operation runs synchronously on the
//! caller's thread. Completion handlers are delivered exactly once, either
//! on the worker thread that finished the work or on the caller's thread
//! when registration happens after completion.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod handler;
pub mod typed;

pub use engine::{OperationEngine, WorkFn};
pub use handler::CompletedHandler;
pub use typed::AsyncOperation;
