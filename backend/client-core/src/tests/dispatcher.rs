use crate::ipc::{DispatchingHandler, Event, EventKind, HandlerId, ListenerId};
use crate::tests::helpers::{CORRUPT_PAYLOAD, UNKNOWN_PAYLOAD};

use models::{Settings, TunnelState};

use std::sync::{Arc, Mutex};

fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&'static str) -> Box<dyn FnMut(&Event) + Send>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let handle = Arc::clone(&log);
    let make = move |label: &'static str| {
        let log = Arc::clone(&handle);
        Box::new(move |_: &Event| log.lock().unwrap().push(label.to_string()))
            as Box<dyn FnMut(&Event) + Send>
    };
    (log, make)
}

/// **VALUE**: Verifies events reach only the handlers registered for their kind.
///
/// **WHY THIS MATTERS**: Every feature cache relies on kind routing. A tunnel
/// cache receiving settings events would corrupt its state.
///
/// **BUG THIS CATCHES**: Routing table keyed wrongly, or handlers registered
/// for every kind by mistake.
#[test]
fn given_handlers_for_two_kinds_when_event_dispatched_then_only_matching_kind_invoked() {
    // GIVEN: One handler for tunnel state and one for settings
    let (log, make) = recorder();
    let mut dispatcher = DispatchingHandler::new();
    dispatcher.register_handler(EventKind::TunnelStateChange, make("tunnel"));
    dispatcher.register_handler(EventKind::SettingsUpdate, make("settings"));

    // WHEN: A tunnel state event arrives twice
    let raw = Event::TunnelStateChange(TunnelState::disconnected()).encode();
    let first = dispatcher.dispatch(&raw);
    let second = dispatcher.dispatch(&raw);

    // THEN: Only the tunnel handler ran, once per event
    assert_eq!(first, 1);
    assert_eq!(second, 1);
    assert_eq!(*log.lock().unwrap(), vec!["tunnel", "tunnel"]);
}

/// **VALUE**: Verifies multiple handlers on one kind run in registration order.
///
/// **WHY THIS MATTERS**: Two caches observing the same event must both see it,
/// and ordering has to be deterministic for derived caches.
///
/// **BUG THIS CATCHES**: A map replacing earlier registrations, or unordered
/// iteration.
#[test]
fn given_three_handlers_same_kind_when_dispatched_then_all_run_in_registration_order() {
    // GIVEN: Three handlers for SettingsUpdate, one of them an all-kind handler
    let (log, make) = recorder();
    let mut dispatcher = DispatchingHandler::new();
    dispatcher.register_handler(EventKind::SettingsUpdate, make("first"));
    dispatcher.register_all(make("all"));
    dispatcher.register_handler(EventKind::SettingsUpdate, make("third"));

    // WHEN: A settings event arrives
    let invoked = dispatcher.dispatch_event(&Event::SettingsUpdate(Settings::default()));

    // THEN: All three ran in the order they were registered
    assert_eq!(invoked, 3);
    assert_eq!(*log.lock().unwrap(), vec!["first", "all", "third"]);
}

/// **VALUE**: Verifies corrupt and unknown payloads are dropped without
/// disturbing later events.
///
/// **WHY THIS MATTERS**: The service may be newer than the client. A payload
/// this build cannot understand must never take down the dispatch loop.
///
/// **BUG THIS CATCHES**: Panics on decode failure, or handlers invoked with a
/// default-constructed event.
#[test]
fn given_malformed_payloads_interleaved_when_dispatched_then_only_good_ones_handled() {
    // GIVEN: A handler for every kind
    let (log, make) = recorder();
    let mut dispatcher = DispatchingHandler::new();
    dispatcher.register_all(make("event"));

    // WHEN: Corrupt, unknown and valid payloads arrive interleaved
    let good = Event::ListenerReady(ListenerId(3)).encode();
    let counts = [
        dispatcher.dispatch(CORRUPT_PAYLOAD),
        dispatcher.dispatch(&good),
        dispatcher.dispatch(UNKNOWN_PAYLOAD),
        dispatcher.dispatch(&[]),
        dispatcher.dispatch(&good),
    ];

    // THEN: Only the two valid payloads reached the handler
    assert_eq!(counts, [0, 1, 0, 0, 1]);
    assert_eq!(log.lock().unwrap().len(), 2);
}

/// **VALUE**: Verifies teardown clears handlers and stops dispatch.
///
/// **WHY THIS MATTERS**: No handler may run once the container has started
/// tearing down, or caches would be written after destruction.
///
/// **BUG THIS CATCHES**: Teardown that only flips a flag but keeps closures
/// alive, or late registrations sneaking in.
#[test]
fn given_torn_down_dispatcher_when_dispatch_or_register_then_nothing_happens() {
    // GIVEN: A dispatcher with one handler, then torn down twice
    let (log, make) = recorder();
    let mut dispatcher = DispatchingHandler::new();
    dispatcher.register_handler(EventKind::CurrentVersion, make("version"));
    dispatcher.teardown();
    dispatcher.teardown();

    // WHEN: Registering again and dispatching
    let late = dispatcher.register_handler(EventKind::CurrentVersion, make("late"));
    let invoked = dispatcher.dispatch(&Event::CurrentVersion(String::from("1.0")).encode());

    // THEN: Nothing ran and the late registration got the dead id
    assert!(dispatcher.is_torn_down());
    assert_eq!(late, HandlerId::DEAD);
    assert_eq!(invoked, 0);
    assert_eq!(dispatcher.handler_count(EventKind::CurrentVersion), 0);
    assert!(log.lock().unwrap().is_empty());
}

/// **VALUE**: Verifies a single registration can be removed without touching
/// the others.
///
/// **WHY THIS MATTERS**: Selective removal must not reorder or drop sibling
/// handlers on the same kind.
///
/// **BUG THIS CATCHES**: Removing by position instead of id.
#[test]
fn given_two_handlers_when_first_removed_then_second_still_runs() {
    // GIVEN: Two AuthToken handlers
    let (log, make) = recorder();
    let mut dispatcher = DispatchingHandler::new();
    let first = dispatcher.register_handler(EventKind::AuthToken, make("first"));
    dispatcher.register_handler(EventKind::AuthToken, make("second"));

    // WHEN: Removing the first, twice
    let removed = dispatcher.remove_handler(first);
    let removed_again = dispatcher.remove_handler(first);
    dispatcher.dispatch_event(&Event::AuthToken(common::RedactedSecret::new("token")));

    // THEN: Only the second handler ran
    assert!(removed);
    assert!(!removed_again);
    assert_eq!(dispatcher.handler_count(EventKind::AuthToken), 1);
    assert_eq!(*log.lock().unwrap(), vec!["second"]);
}
