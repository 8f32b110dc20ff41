//! Completion handler slot
//!
//! The slot distinguishes "never assigned" from "explicitly assigned
//! nothing": registration is single-shot, so a caller that passed `None`
//! has still used its one assignment. Delivery disarms the slot before the
//! handler runs, which is what makes invocation exactly-once under the race
//! between "caller registers" and "worker finishes".

use opcell_core::OperationStatus;

/// Callback invoked once with the operation's final status.
///
/// Runs on the worker thread when the work finishes after registration, or
/// synchronously on the registering thread when the operation was already
/// terminal.
pub type CompletedHandler = Box<dyn FnOnce(OperationStatus) + Send + 'static>;

/// Three-state handler slot.
pub(crate) enum HandlerSlot {
    /// No assignment has happened yet; registration is still permitted.
    Unset,
    /// Assignment happened (with no handler, or the handler was already
    /// delivered); registration is no longer permitted.
    Empty,
    /// A handler is waiting for the operation to finish.
    Armed(CompletedHandler),
}

impl HandlerSlot {
    pub(crate) fn is_unset(&self) -> bool {
        matches!(self, HandlerSlot::Unset)
    }

    pub(crate) fn is_armed(&self) -> bool {
        matches!(self, HandlerSlot::Armed(_))
    }

    /// Take an armed handler out of the slot, leaving it `Empty`.
    ///
    /// An `Unset` slot stays `Unset`: a delivery attempt must not consume
    /// the caller's one registration.
    pub(crate) fn disarm(&mut self) -> Option<CompletedHandler> {
        match std::mem::replace(self, HandlerSlot::Empty) {
            HandlerSlot::Armed(handler) => Some(handler),
            HandlerSlot::Unset => {
                *self = HandlerSlot::Unset;
                None
            }
            HandlerSlot::Empty => None,
        }
    }
}
