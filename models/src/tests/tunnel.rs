use crate::{ActionAfterDisconnect, TransportProtocol, TunnelEndpoint, TunnelState, TunnelStateKind};

fn endpoint() -> TunnelEndpoint {
    TunnelEndpoint {
        address: String::from("185.213.154.68:51820"),
        protocol: TransportProtocol::Udp as i32,
        quantum_resistant: false,
    }
}

/// **VALUE**: Verifies that the default tunnel state is disconnected.
///
/// **WHY THIS MATTERS**: Caches start from the default value before the service sends its
/// first snapshot; showing "connected" before anything is known would lie to the user.
///
/// **BUG THIS CATCHES**: Would catch reordering of the enum so a different kind becomes zero.
#[test]
fn given_default_tunnel_state_when_inspected_then_is_disconnected_and_unsecured() {
    // GIVEN/WHEN: Default state
    let state = TunnelState::default();

    // THEN: Disconnected and not secured
    assert_eq!(state.kind(), TunnelStateKind::Disconnected);
    assert!(!state.is_connected());
    assert!(!state.is_secured());
}

/// **VALUE**: Verifies the secured predicate across tunnel phases.
///
/// **WHY THIS MATTERS**: The UI decides between "secure" and "unsecure" styling from this
/// predicate. A disconnect that is followed by a reconnect or block keeps traffic protected.
///
/// **BUG THIS CATCHES**: Would catch if blocking errors or reconnecting disconnects are
/// reported as unsecured.
#[test]
fn given_tunnel_phases_when_checking_secured_then_matches_blocking_semantics() {
    assert!(TunnelState::connected(endpoint(), None).is_secured());
    assert!(TunnelState::connecting(Some(endpoint()), None).is_secured());
    assert!(TunnelState::error("firewall failure", true).is_secured());
    assert!(!TunnelState::error("firewall failure", false).is_secured());
    assert!(TunnelState::disconnecting(ActionAfterDisconnect::Reconnect).is_secured());
    assert!(!TunnelState::disconnecting(ActionAfterDisconnect::Nothing).is_secured());
}
