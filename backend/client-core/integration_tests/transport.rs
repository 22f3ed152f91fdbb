use crate::helpers::{FakeService, RECV_TIMEOUT};

use vpn_client_core::error::ws::WsError;
use vpn_client_core::ipc::{Channel, Connection, Event, ListenerId, Request};
use vpn_client_core::transport::WebSocketChannel;

/// **VALUE**: Verifies requests reach the service as one binary frame each.
///
/// **WHY THIS MATTERS**: The service decodes one envelope per frame; merged or
/// split frames would be rejected.
///
/// **BUG THIS CATCHES**: Text frames, or payloads batched into one frame.
#[tokio::test]
async fn given_connected_channel_when_sending_requests_then_service_receives_each_in_order() {
    // GIVEN: A channel connected to the fake service
    let mut service = FakeService::start().await;
    let (channel, _inbound) = WebSocketChannel::connect(&service.url).await.unwrap();
    let connection = Connection::new(channel);

    // WHEN: Sending two requests
    connection.send(Request::Connect).unwrap();
    connection.send(Request::SetAllowLan(true)).unwrap();

    // THEN: Both arrive, in order
    assert_eq!(service.next_request().await, Request::Connect);
    assert_eq!(service.next_request().await, Request::SetAllowLan(true));
}

/// **VALUE**: Verifies inbound binary frames are delivered and text frames
/// are skipped.
///
/// **WHY THIS MATTERS**: Only binary frames carry events. A text frame must
/// not end the stream or reach the dispatcher.
///
/// **BUG THIS CATCHES**: Reader task exiting on the first unexpected frame.
#[tokio::test]
async fn given_text_then_binary_frame_when_reading_then_only_binary_delivered() {
    // GIVEN: A connected channel
    let service = FakeService::start().await;
    let (_channel, mut inbound) = WebSocketChannel::connect(&service.url).await.unwrap();

    // WHEN: The service sends a text frame, then an event
    service.send_text("hello");
    service.send_event(&Event::ListenerReady(ListenerId(12)));

    // THEN: The first payload delivered is the event
    let raw = tokio::time::timeout(RECV_TIMEOUT, inbound.recv())
        .await
        .expect("Timed out waiting for inbound payload")
        .expect("Inbound closed");
    assert_eq!(Event::decode(&raw).unwrap(), Event::ListenerReady(ListenerId(12)));
}

/// **VALUE**: Verifies the inbound stream ends when the service closes.
///
/// **WHY THIS MATTERS**: The driver relies on the stream ending to notice a
/// lost service and trigger reconnect.
///
/// **BUG THIS CATCHES**: Reader task kept alive after close.
#[tokio::test]
async fn given_service_closes_when_reading_then_inbound_ends() {
    // GIVEN: A connected channel
    let service = FakeService::start().await;
    let (_channel, mut inbound) = WebSocketChannel::connect(&service.url).await.unwrap();

    // WHEN: The service closes the socket
    service.close();

    // THEN: The stream ends
    let next = tokio::time::timeout(RECV_TIMEOUT, inbound.recv())
        .await
        .expect("Timed out waiting for close");
    assert!(next.is_none());
}

/// **VALUE**: Verifies malformed and non-WebSocket URLs are rejected before
/// any network activity.
///
/// **WHY THIS MATTERS**: A config typo should give a clear validation error.
///
/// **BUG THIS CATCHES**: Attempting to connect to an http URL.
#[tokio::test]
async fn given_http_url_when_connecting_then_validation_error() {
    // GIVEN/WHEN: Connecting with bad URLs
    let http = WebSocketChannel::connect("http://127.0.0.1:1").await;
    let garbage = WebSocketChannel::connect("::not a url::").await;

    // THEN: Both are validation errors
    assert!(matches!(http, Err(WsError::Validation { .. })));
    assert!(matches!(garbage, Err(WsError::Validation { .. })));
}

/// **VALUE**: Verifies every connection gets its own reply endpoint.
///
/// **WHY THIS MATTERS**: The service routes events by endpoint; two UI
/// processes sharing one would receive each other's events.
///
/// **BUG THIS CATCHES**: A constant endpoint.
#[tokio::test]
async fn given_two_connections_when_comparing_endpoints_then_distinct() {
    // GIVEN: Two connected channels
    let first_service = FakeService::start().await;
    let second_service = FakeService::start().await;
    let (first, _) = WebSocketChannel::connect(&first_service.url).await.unwrap();
    let (second, _) = WebSocketChannel::connect(&second_service.url).await.unwrap();

    // WHEN/THEN: Endpoints differ
    assert_ne!(first.reply_endpoint(), second.reply_endpoint());
}
