//! End-to-end lifecycle scenarios
//!
//! Each test drives a full construct -> start -> finish -> read sequence
//! through the public facade, using the deterministic pools so the ordering
//! under test is explicit.

use opcell::prelude::*;

fn manual() -> Arc<ManualPool> {
    Arc::new(ManualPool::new())
}

#[test]
fn success_value_round_trip() {
    let pool = manual();
    let op: AsyncOperation<String> =
        AsyncOperation::spawn(Arc::clone(&pool) as Arc<dyn TaskPool>, || {
            Ok("PnP\\Root\\0000".to_owned())
        })
        .unwrap();

    assert_eq!(op.status(), OperationStatus::Started);
    assert_eq!(pool.run_all(), 1);

    assert_eq!(op.status(), OperationStatus::Completed);
    assert_eq!(op.results().unwrap(), "PnP\\Root\\0000");
    assert_eq!(op.error_code().unwrap(), None);
}

#[test]
fn failure_code_round_trip_with_late_handler() {
    let pool = manual();
    let op: AsyncOperation<u32> =
        AsyncOperation::spawn(Arc::clone(&pool) as Arc<dyn TaskPool>, || {
            Err(WorkFailure::new(0x8007001F_u32 as i32, "device not functioning"))
        })
        .unwrap();
    pool.run_all();

    // Registration after completion: delivered synchronously, on this
    // thread, before set_completed returns.
    let (tx, rx) = std::sync::mpsc::channel();
    op.set_completed(Some(Box::new(move |status| {
        tx.send(status).unwrap();
    })))
    .unwrap();
    assert_eq!(rx.try_recv(), Ok(OperationStatus::Error));

    match op.results() {
        Err(OperationError::Callback(failure)) => {
            assert_eq!(failure.code, 0x8007001F_u32 as i32);
        }
        other => panic!("expected callback failure, got {other:?}"),
    }
}

#[test]
fn results_fails_fast_until_terminal() {
    let pool = manual();
    let op: AsyncOperation<u32> =
        AsyncOperation::spawn(Arc::clone(&pool) as Arc<dyn TaskPool>, || Ok(1)).unwrap();

    assert!(matches!(
        op.results(),
        Err(OperationError::IllegalState {
            status: OperationStatus::Started,
            ..
        })
    ));

    pool.run_all();
    assert_eq!(op.results().unwrap(), 1);
}

#[test]
fn close_rejected_while_running_idempotent_after() {
    let pool = manual();
    let op: AsyncOperation<()> =
        AsyncOperation::spawn(Arc::clone(&pool) as Arc<dyn TaskPool>, || Ok(())).unwrap();

    assert_eq!(
        op.close(),
        Err(OperationError::IllegalStateChange {
            from: OperationStatus::Started,
            to: OperationStatus::Closed,
        })
    );

    pool.run_all();
    op.close().unwrap();
    op.close().unwrap();
    assert_eq!(op.status(), OperationStatus::Closed);

    // Everything except the status poll is rejected once closed.
    assert!(matches!(op.results(), Err(OperationError::IllegalState { .. })));
    assert!(matches!(op.cancel(), Err(OperationError::IllegalState { .. })));
    assert!(matches!(
        op.set_completed(None),
        Err(OperationError::IllegalState { .. })
    ));
}

#[test]
fn cancel_noop_on_terminal_sticky_while_running() {
    let pool = manual();

    // Terminal first: cancel must not disturb the status.
    let done: AsyncOperation<u32> =
        AsyncOperation::spawn(Arc::clone(&pool) as Arc<dyn TaskPool>, || Ok(2)).unwrap();
    pool.run_all();
    done.cancel().unwrap();
    assert_eq!(done.status(), OperationStatus::Completed);
    assert_eq!(done.results().unwrap(), 2);

    // Canceled while queued: the worker's verdict must not overwrite it.
    let canceled: AsyncOperation<u32> =
        AsyncOperation::spawn(Arc::clone(&pool) as Arc<dyn TaskPool>, || Ok(3)).unwrap();
    canceled.cancel().unwrap();
    pool.run_all();
    assert_eq!(canceled.status(), OperationStatus::Canceled);
    assert!(matches!(
        canceled.results(),
        Err(OperationError::IllegalState {
            status: OperationStatus::Canceled,
            ..
        })
    ));

    // Canceled is terminal, so close is allowed afterwards.
    canceled.close().unwrap();
}

#[test]
fn second_registration_rejected() {
    let pool = manual();
    let op: AsyncOperation<u32> =
        AsyncOperation::spawn(Arc::clone(&pool) as Arc<dyn TaskPool>, || Ok(0)).unwrap();

    op.set_completed(Some(Box::new(|_| {}))).unwrap();
    assert_eq!(
        op.set_completed(Some(Box::new(|_| {}))),
        Err(OperationError::HandlerAlreadyAssigned)
    );

    // Still rejected after delivery; the slot is never re-armed.
    pool.run_all();
    assert_eq!(
        op.set_completed(Some(Box::new(|_| {}))),
        Err(OperationError::HandlerAlreadyAssigned)
    );
}

#[test]
fn typed_views_reject_mismatched_shapes() {
    let pool: Arc<dyn TaskPool> = Arc::new(InlinePool::new());
    let engine = OperationEngine::new(pool, Box::new(|| Ok(Value::Array(vec![Value::UInt(1)]))));
    OperationEngine::start(&engine).unwrap();

    assert_eq!(engine.outcome().unwrap(), Ok(Value::Array(vec![Value::UInt(1)])));

    // The untyped slot is only readable through a matching wrapper; a
    // mismatched one reports instead of coercing.
    let as_array: Option<Vec<Value>> = engine
        .outcome()
        .unwrap()
        .ok()
        .and_then(|v| ResultValue::from_value(&v));
    assert_eq!(as_array, Some(vec![Value::UInt(1)]));

    let as_uint: Option<u32> = engine
        .outcome()
        .unwrap()
        .ok()
        .and_then(|v| ResultValue::from_value(&v));
    assert_eq!(as_uint, None);
}

#[test]
fn operation_ids_survive_until_close() {
    let pool = manual();
    let op: AsyncOperation<()> =
        AsyncOperation::spawn(Arc::clone(&pool) as Arc<dyn TaskPool>, || Ok(())).unwrap();
    let id = op.id().unwrap();
    pool.run_all();
    assert_eq!(op.id().unwrap(), id);
    op.close().unwrap();
    assert!(matches!(op.id(), Err(OperationError::IllegalState { .. })));
}
