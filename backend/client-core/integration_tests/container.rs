use crate::helpers::{FakeService, RECV_TIMEOUT};

use vpn_client_core::container::{DriveOutcome, ServiceConnectionContainer};
use vpn_client_core::ipc::{Connection, Event, ListenerId, Request};
use vpn_client_core::transport::WebSocketChannel;

use models::{TunnelEndpoint, TunnelState, TunnelStateKind};

use tokio::sync::{oneshot, watch};

/// **VALUE**: Exercises the whole lifecycle over a real socket: register,
/// ready, state update, shutdown, unregister.
///
/// **WHY THIS MATTERS**: This is exactly what the client does against the
/// real service.
///
/// **BUG THIS CATCHES**: Unregister queued but the socket closed before the
/// writer flushed it.
#[tokio::test]
async fn given_driven_container_when_service_ready_and_shutdown_then_full_protocol_observed() {
    // GIVEN: A container driven over a WebSocket to the fake service
    let mut service = FakeService::start().await;
    let (channel, inbound) = WebSocketChannel::connect(&service.url).await.unwrap();
    let (ready_tx, ready_rx) = oneshot::channel();
    let container = ServiceConnectionContainer::new(
        Connection::new(channel),
        move |container: &ServiceConnectionContainer| {
            let _ = ready_tx.send(container.listener_id());
        },
        || {},
    );
    let tunnel = container.connection_proxy().clone();
    let mut tunnel_updates = tunnel.subscribe();
    let (shutdown_tx, shutdown) = watch::channel(false);
    let driver = tokio::spawn(container.drive(inbound, shutdown));

    // WHEN: The service acknowledges and pushes a connected state
    let register = service.next_request().await;
    service.send_event(&Event::ListenerReady(ListenerId(7)));
    let ready = tokio::time::timeout(RECV_TIMEOUT, ready_rx)
        .await
        .expect("Timed out waiting for ready")
        .expect("Ready callback dropped");
    service.send_event(&Event::TunnelStateChange(TunnelState::connected(
        TunnelEndpoint::default(),
        None,
    )));
    tokio::time::timeout(RECV_TIMEOUT, tunnel_updates.changed())
        .await
        .expect("Timed out waiting for tunnel state")
        .unwrap();
    shutdown_tx.send(true).unwrap();
    let outcome = driver.await.unwrap();

    // THEN: Register first, ready with id 7, state applied, unregister with 7
    assert!(matches!(register, Request::RegisterListener(_)));
    assert_eq!(ready, Some(ListenerId(7)));
    assert_eq!(tunnel.current().kind(), TunnelStateKind::Connected);
    assert_eq!(outcome, DriveOutcome::Shutdown);
    let unregister = service
        .expect_request(|request| matches!(request, Request::UnregisterListener(_)))
        .await;
    assert_eq!(unregister, Request::UnregisterListener(ListenerId(7)));
}

/// **VALUE**: Verifies a service that goes away ends the driver with
/// `ChannelClosed`.
///
/// **WHY THIS MATTERS**: The executable reconnects on this outcome and quits
/// on `Shutdown`; confusing them either hangs or exits.
///
/// **BUG THIS CATCHES**: Driver waiting forever on a dead socket.
#[tokio::test]
async fn given_driven_container_when_service_closes_then_channel_closed() {
    // GIVEN: A driven container
    let mut service = FakeService::start().await;
    let (channel, inbound) = WebSocketChannel::connect(&service.url).await.unwrap();
    let container = ServiceConnectionContainer::new(
        Connection::new(channel),
        |_: &ServiceConnectionContainer| {},
        || {},
    );
    let (_shutdown_tx, shutdown) = watch::channel(false);
    let driver = tokio::spawn(container.drive(inbound, shutdown));
    service.next_request().await;

    // WHEN: The service closes the connection
    service.close();

    // THEN: The driver stops with ChannelClosed
    let outcome = tokio::time::timeout(RECV_TIMEOUT, driver)
        .await
        .expect("Timed out waiting for driver")
        .unwrap();
    assert_eq!(outcome, DriveOutcome::ChannelClosed);
}
