use crate::container::TeardownChain;
use crate::error::ipc::IpcError;
use crate::ipc::{ListenerId, ReadySignal};

use common::ErrorLocation;

use std::panic::Location;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// **VALUE**: Verifies a failing step does not stop the steps after it.
///
/// **WHY THIS MATTERS**: A failed unregister must still be followed by
/// dispatcher teardown, or handlers keep running after destroy.
///
/// **BUG THIS CATCHES**: Using `?` between steps.
#[test]
fn given_failing_middle_step_when_chain_runs_then_all_steps_run_in_order() {
    // GIVEN: Three steps borrowing local state, the second failing
    let order = Mutex::new(Vec::new());
    let chain = TeardownChain::new()
        .then("one", || {
            order.lock().unwrap().push("one");
            Ok(())
        })
        .then("two", || {
            order.lock().unwrap().push("two");
            Err(IpcError::Send {
                message: String::from("boom"),
                location: ErrorLocation::from(Location::caller()),
            })
        })
        .then("three", || {
            order.lock().unwrap().push("three");
            Ok(())
        });

    // WHEN: Running the chain
    let report = chain.run();

    // THEN: Every step ran in order and only the failing one is reported
    assert_eq!(*order.lock().unwrap(), vec!["one", "two", "three"]);
    assert!(!report.is_clean());
    assert_eq!(report.completed, vec!["one", "three"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "two");
}

/// **VALUE**: Verifies the ready callback fires once and waiters see the id.
///
/// **WHY THIS MATTERS**: The UI binds view models in the ready callback.
/// Running it twice double-binds everything.
///
/// **BUG THIS CATCHES**: Callback stored as `FnMut` and re-run.
#[test]
fn given_ready_signal_when_settled_twice_then_callback_returned_once() {
    // GIVEN: A signal with a counting callback and one early waiter
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut signal: ReadySignal<()> = ReadySignal::new(Box::new(move |_: &()| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    let mut early = signal.waiter();

    // WHEN: Settling twice
    if let Some(callback) = signal.settle(ListenerId(4)) {
        callback(&());
    }
    let again = signal.settle(ListenerId(5));
    let mut late = signal.waiter();

    // THEN: One call, both waiters resolved with the first id
    assert!(again.is_none());
    assert!(signal.is_settled());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(early.try_recv().ok(), Some(ListenerId(4)));
    assert_eq!(late.try_recv().ok(), Some(ListenerId(4)));
}

/// **VALUE**: Verifies abandoning drops the callback and closes waiters.
///
/// **WHY THIS MATTERS**: A container destroyed before the service answered
/// must never report ready.
///
/// **BUG THIS CATCHES**: Waiters left hanging forever after teardown.
#[test]
fn given_abandoned_signal_when_settled_then_no_callback_and_waiters_closed() {
    // GIVEN: A signal with a waiter
    let mut signal: ReadySignal<()> = ReadySignal::new(Box::new(|_: &()| {}));
    let mut waiter = signal.waiter();

    // WHEN: Abandoning, then trying to settle
    signal.abandon();
    let callback = signal.settle(ListenerId(1));

    // THEN: Nothing fires and the waiter is closed
    assert!(callback.is_none());
    assert!(!signal.is_settled());
    assert!(waiter.try_recv().is_err());
}
