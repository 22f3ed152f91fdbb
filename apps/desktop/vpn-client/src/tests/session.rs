use crate::session::reconnect_policy;

use vpn_client_core::config::ReconnectConfig;

use std::time::Duration;

use backoff::backoff::Backoff;

/// **VALUE**: Verifies the reconnect delay never exceeds the configured cap.
///
/// **WHY THIS MATTERS**: An unbounded delay leaves the UI disconnected long
/// after the service is back.
///
/// **BUG THIS CATCHES**: Max interval not passed to the policy.
#[test]
fn given_capped_policy_when_backing_off_repeatedly_then_delay_stays_under_cap() {
    // GIVEN: A policy capped at 200ms that never gives up
    let mut policy = reconnect_policy(&ReconnectConfig {
        initial_interval_ms: 50,
        max_interval_ms: 200,
        max_elapsed_secs: 0,
    });

    // WHEN: Taking many delays
    let delays: Vec<Duration> = (0..20).map(|_| policy.next_backoff()).collect::<Option<_>>().unwrap();

    // THEN: Every delay is within the cap plus jitter
    assert!(delays.iter().all(|delay| *delay <= Duration::from_millis(300)));
}

/// **VALUE**: Verifies a zero elapsed limit means retry forever.
///
/// **WHY THIS MATTERS**: The default config must keep trying while the
/// service restarts.
///
/// **BUG THIS CATCHES**: Zero passed through as a zero-length window, giving
/// up immediately.
#[test]
fn given_zero_max_elapsed_when_building_policy_then_no_elapsed_limit() {
    // GIVEN/WHEN: A default reconnect config
    let policy = reconnect_policy(&ReconnectConfig::default());

    // THEN: No elapsed limit
    assert_eq!(policy.max_elapsed_time, None);
    assert_eq!(policy.initial_interval, Duration::from_millis(500));
}
