use vpn_client::error::VpnClientError;
use vpn_client::session::run;

use vpn_client_core::config::{ClientConfig, ReconnectConfig};
use vpn_client_core::ipc::{Event, ListenerId, Request};

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Accepts clients forever. Connection `n` is answered with listener id
/// `n + 1`; the first connection is closed right after it is answered.
async fn start_flaky_service() -> (String, mpsc::UnboundedReceiver<(usize, Request)>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind loopback listener");
    let port = listener.local_addr().expect("No local address").port();
    let (requests_tx, requests) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut connection_index = 0;
        while let Ok((stream, _)) = listener.accept().await {
            let requests_tx = requests_tx.clone();
            let index = connection_index;
            connection_index += 1;

            tokio::spawn(async move {
                let Ok(ws_stream) = accept_async(stream).await else {
                    return;
                };
                let (mut write, mut read) = ws_stream.split();

                while let Some(Ok(message)) = read.next().await {
                    let Message::Binary(data) = message else {
                        continue;
                    };
                    let Ok(request) = Request::decode(&data) else {
                        continue;
                    };
                    let registering = matches!(request, Request::RegisterListener(_));
                    if requests_tx.send((index, request)).is_err() {
                        return;
                    }

                    if registering {
                        let ready = Event::ListenerReady(ListenerId(index as u32 + 1)).encode();
                        if write.send(Message::Binary(ready.into())).await.is_err() {
                            return;
                        }
                        if index == 0 {
                            let _ = write.close().await;
                            return;
                        }
                    }
                }
            });
        }
    });

    (format!("ws://127.0.0.1:{port}"), requests)
}

fn fast_config(url: String) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.daemon.ipc_url = url;
    config.reconnect = ReconnectConfig {
        initial_interval_ms: 10,
        max_interval_ms: 50,
        max_elapsed_secs: 0,
    };
    config
}

async fn wait_for(
    requests: &mut mpsc::UnboundedReceiver<(usize, Request)>,
    predicate: impl Fn(usize, &Request) -> bool,
) {
    loop {
        let (index, request) = tokio::time::timeout(RECV_TIMEOUT, requests.recv())
            .await
            .expect("Timed out waiting for a request")
            .expect("Service stopped");
        if predicate(index, &request) {
            return;
        }
    }
}

/// **VALUE**: Verifies the session builds a fresh container after the
/// service drops the connection.
///
/// **WHY THIS MATTERS**: A daemon restart must not leave the client dead or
/// reusing a container whose listener id belongs to the old connection.
///
/// **BUG THIS CATCHES**: `ChannelClosed` treated as a terminal outcome, or a
/// reconnect that skips listener registration.
#[tokio::test]
async fn given_service_drops_connection_when_running_then_reconnects_and_registers_again() {
    // GIVEN: A service that closes the first connection after it is ready
    let (url, mut requests) = start_flaky_service().await;
    let (shutdown_tx, shutdown) = watch::channel(false);
    let config = fast_config(url);

    // WHEN: Running the session
    let session = tokio::spawn(async move { run(&config, shutdown).await });

    // THEN: Both connections register a listener
    wait_for(&mut requests, |index, request| {
        index == 0 && matches!(request, Request::RegisterListener(_))
    })
    .await;
    wait_for(&mut requests, |index, request| {
        index == 1 && matches!(request, Request::RegisterListener(_))
    })
    .await;

    // AND: Shutdown ends the session cleanly
    shutdown_tx.send(true).expect("Session dropped shutdown receiver");
    let result = tokio::time::timeout(RECV_TIMEOUT, session)
        .await
        .expect("Session did not stop")
        .expect("Session task panicked");
    assert!(result.is_ok());
}

/// **VALUE**: Verifies shutdown tears the live container down, which
/// unregisters the listener with the service.
///
/// **WHY THIS MATTERS**: The daemon keeps pushing events to registered
/// listeners; a client that exits without unregistering leaks one.
///
/// **BUG THIS CATCHES**: `run` returning on shutdown without letting the
/// driver run `on_destroy`.
#[tokio::test]
async fn given_ready_session_when_shutdown_requested_then_listener_unregistered() {
    // GIVEN: A session ready on its second, stable connection. Priming
    // requests are only sent after ListenerReady has been dispatched.
    let (url, mut requests) = start_flaky_service().await;
    let (shutdown_tx, shutdown) = watch::channel(false);
    let config = fast_config(url);
    let session = tokio::spawn(async move { run(&config, shutdown).await });
    wait_for(&mut requests, |index, request| {
        index == 1 && matches!(request, Request::FetchAccountExpiry)
    })
    .await;

    // WHEN: Requesting shutdown
    shutdown_tx.send(true).expect("Session dropped shutdown receiver");

    // THEN: The service sees the listener unregister on that connection
    wait_for(&mut requests, |index, request| {
        index == 1 && matches!(request, Request::UnregisterListener(_))
    })
    .await;
    let result = tokio::time::timeout(RECV_TIMEOUT, session)
        .await
        .expect("Session did not stop")
        .expect("Session task panicked");
    assert!(result.is_ok());
}

/// **VALUE**: Verifies a bounded reconnect window ends in a connect error.
///
/// **WHY THIS MATTERS**: Supervised deployments rely on a non-zero exit to
/// restart the client when the daemon never comes up.
///
/// **BUG THIS CATCHES**: `max_elapsed_secs` ignored, looping forever.
#[tokio::test]
async fn given_unreachable_service_and_bounded_window_when_running_then_connect_error() {
    // GIVEN: A port nobody listens on and a one second window
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind loopback listener");
    let port = listener.local_addr().expect("No local address").port();
    drop(listener);

    let mut config = fast_config(format!("ws://127.0.0.1:{port}"));
    config.reconnect.max_elapsed_secs = 1;
    let (_shutdown_tx, shutdown) = watch::channel(false);

    // WHEN: Running the session
    let result = tokio::time::timeout(Duration::from_secs(10), run(&config, shutdown))
        .await
        .expect("Session never gave up");

    // THEN: Connect error
    assert!(matches!(result, Err(VpnClientError::Connect { .. })));
}
