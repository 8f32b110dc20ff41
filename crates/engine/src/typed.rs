//! Typed operation wrappers
//!
//! [`AsyncOperation<R>`] composes an [`OperationEngine`] with a statically
//! typed result accessor. The wrapper adds no state of its own: every
//! lifecycle call forwards to the embedded engine, and
//! [`results`](AsyncOperation::results) is the one operation the engine does
//! not have, unpacking the generic result slot into `R`.
//!
//! One generic wrapper replaces the per-result-type adapters of a vtable
//! world: `AsyncOperation<u32>`, `AsyncOperation<String>` and so on are the
//! individual "typed operations", each at zero marginal cost.

use crate::engine::OperationEngine;
use crate::handler::CompletedHandler;
use opcell_core::{
    OperationError, OperationStatus, Result, ResultValue, WorkFailure,
};
use opcell_pool::TaskPool;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A handle to an asynchronous operation whose result has type `R`.
///
/// Cloning the handle shares the one underlying engine. The handle most
/// callers want is produced by [`spawn`](AsyncOperation::spawn), which
/// creates *and starts* the operation; a handle for an operation that never
/// ran does not exist.
///
/// ```ignore
/// use opcell::prelude::*;
///
/// let pool: Arc<dyn TaskPool> = Arc::new(ThreadedPool::new(4)?);
/// let op: AsyncOperation<u32> = AsyncOperation::spawn(pool, || Ok(enumerate_devices()?.len() as u32))?;
///
/// let done = op.clone();
/// op.set_completed(Some(Box::new(move |status| {
///     if status == OperationStatus::Completed {
///         println!("{} devices", done.results().unwrap());
///     }
/// })))?;
/// ```
pub struct AsyncOperation<R: ResultValue> {
    engine: Arc<OperationEngine>,
    _result: PhantomData<fn() -> R>,
}

impl<R: ResultValue> AsyncOperation<R> {
    /// Create an engine around `work` and start it.
    ///
    /// On submission failure the error is returned and no operation object
    /// exists, mirroring construction: there is never a live operation whose
    /// work was not accepted by the pool.
    pub fn spawn<F>(pool: Arc<dyn TaskPool>, work: F) -> Result<Self>
    where
        F: FnOnce() -> std::result::Result<R, WorkFailure> + Send + 'static,
    {
        let engine = OperationEngine::new(pool, Box::new(move || work().map(ResultValue::into_value)));
        OperationEngine::start(&engine)?;
        Ok(AsyncOperation {
            engine,
            _result: PhantomData,
        })
    }

    /// The statically typed result.
    ///
    /// Valid once the status is `Completed` or `Error`:
    /// - `Completed` unpacks the stored value into `R`, failing with
    ///   `WrongType` if the callback produced a different shape;
    /// - `Error` surfaces the stored [`WorkFailure`] as
    ///   [`OperationError::Callback`].
    pub fn results(&self) -> Result<R> {
        match self.engine.outcome()? {
            Err(failure) => Err(OperationError::Callback(failure)),
            Ok(value) => R::from_value(&value).ok_or_else(|| OperationError::WrongType {
                expected: R::type_name(),
                actual: value.type_name(),
            }),
        }
    }

    /// Forwards to [`OperationEngine::set_completed`].
    pub fn set_completed(&self, handler: Option<CompletedHandler>) -> Result<()> {
        self.engine.set_completed(handler)
    }

    /// Forwards to [`OperationEngine::has_completed_handler`].
    pub fn has_completed_handler(&self) -> Result<bool> {
        self.engine.has_completed_handler()
    }

    /// Forwards to [`OperationEngine::status`].
    pub fn status(&self) -> OperationStatus {
        self.engine.status()
    }

    /// Forwards to [`OperationEngine::error_code`].
    pub fn error_code(&self) -> Result<Option<WorkFailure>> {
        self.engine.error_code()
    }

    /// Forwards to [`OperationEngine::id`].
    pub fn id(&self) -> Result<u64> {
        self.engine.id()
    }

    /// Forwards to [`OperationEngine::cancel`].
    pub fn cancel(&self) -> Result<()> {
        self.engine.cancel()
    }

    /// Forwards to [`OperationEngine::close`].
    pub fn close(&self) -> Result<()> {
        self.engine.close()
    }

    /// The untyped engine underneath this wrapper.
    pub fn engine(&self) -> &Arc<OperationEngine> {
        &self.engine
    }
}

impl<R: ResultValue> Clone for AsyncOperation<R> {
    fn clone(&self) -> Self {
        AsyncOperation {
            engine: Arc::clone(&self.engine),
            _result: PhantomData,
        }
    }
}

impl<R: ResultValue> fmt::Debug for AsyncOperation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncOperation")
            .field("status", &self.engine.status())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opcell_core::Value;
    use opcell_pool::{InlinePool, ManualPool};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn manual() -> Arc<ManualPool> {
        Arc::new(ManualPool::new())
    }

    #[test]
    fn test_spawn_and_typed_results() {
        let pool = manual();
        let op: AsyncOperation<u32> =
            AsyncOperation::spawn(Arc::clone(&pool) as Arc<dyn TaskPool>, || Ok(42)).unwrap();

        assert_eq!(op.status(), OperationStatus::Started);
        pool.run_all();
        assert_eq!(op.results().unwrap(), 42);
    }

    #[test]
    fn test_results_before_terminal_fails_fast() {
        let pool = manual();
        let op: AsyncOperation<u32> =
            AsyncOperation::spawn(Arc::clone(&pool) as Arc<dyn TaskPool>, || Ok(1)).unwrap();

        assert!(matches!(
            op.results(),
            Err(OperationError::IllegalState { .. })
        ));
        pool.run_all();
    }

    #[test]
    fn test_results_surfaces_callback_failure() {
        let pool: Arc<dyn TaskPool> = Arc::new(InlinePool::new());
        let op: AsyncOperation<u32> =
            AsyncOperation::spawn(pool, || Err(WorkFailure::new(-5, "enumeration failed")))
                .unwrap();

        assert_eq!(op.status(), OperationStatus::Error);
        assert_eq!(
            op.results(),
            Err(OperationError::Callback(WorkFailure::new(
                -5,
                "enumeration failed"
            )))
        );
    }

    #[test]
    fn test_wrong_shape_is_reported_not_coerced() {
        // An untyped engine storing a string, read through a u32 wrapper.
        let pool: Arc<dyn TaskPool> = Arc::new(InlinePool::new());
        let engine = OperationEngine::new(pool, Box::new(|| Ok(Value::String("ten".into()))));
        OperationEngine::start(&engine).unwrap();

        let op = AsyncOperation::<u32> {
            engine,
            _result: PhantomData,
        };
        assert_eq!(
            op.results(),
            Err(OperationError::WrongType {
                expected: "UInt",
                actual: "String",
            })
        );
    }

    #[test]
    fn test_clone_shares_the_engine() {
        let pool = manual();
        let op: AsyncOperation<String> =
            AsyncOperation::spawn(Arc::clone(&pool) as Arc<dyn TaskPool>, || {
                Ok("ready".to_owned())
            })
            .unwrap();
        let other = op.clone();

        pool.run_all();
        op.close().unwrap();
        // The clone observes the close: one engine, two handles.
        assert_eq!(other.status(), OperationStatus::Closed);
    }

    #[test]
    fn test_handler_captures_a_clone_for_results() {
        let pool = manual();
        let op: AsyncOperation<u32> =
            AsyncOperation::spawn(Arc::clone(&pool) as Arc<dyn TaskPool>, || Ok(3)).unwrap();

        let fired = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&fired);
        let done = op.clone();
        op.set_completed(Some(Box::new(move |status| {
            assert_eq!(status, OperationStatus::Completed);
            assert_eq!(done.results().unwrap(), 3);
            seen.fetch_add(1, Ordering::SeqCst);
        })))
        .unwrap();

        pool.run_all();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unit_operation_signals_completion_only() {
        let pool: Arc<dyn TaskPool> = Arc::new(InlinePool::new());
        let op: AsyncOperation<()> = AsyncOperation::spawn(pool, || Ok(())).unwrap();
        assert_eq!(op.status(), OperationStatus::Completed);
        op.results().unwrap();
    }
}
