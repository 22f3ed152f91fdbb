//! Loopback fake service for transport and end-to-end tests.
//!
//! The fake accepts one WebSocket client, forwards every binary frame it
//! receives as a decoded [`Request`], and lets the test push events back.

use vpn_client_core::ipc::{Event, Request};

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

pub enum ServiceCommand {
    Event(Vec<u8>),
    Text(String),
    Close,
}

pub struct FakeService {
    pub url: String,
    requests: mpsc::UnboundedReceiver<Request>,
    commands: mpsc::UnboundedSender<ServiceCommand>,
}

impl FakeService {
    /// Bind to an ephemeral loopback port and serve one client.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind loopback listener");
        let port = listener.local_addr().expect("No local address").port();

        let (requests_tx, requests) = mpsc::unbounded_channel();
        let (commands, mut commands_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("Failed to accept client");
            let ws_stream = accept_async(stream).await.expect("Handshake failed");
            let (mut write, mut read) = ws_stream.split();

            loop {
                tokio::select! {
                    message = read.next() => match message {
                        Some(Ok(Message::Binary(data))) => {
                            let request = Request::decode(&data).expect("Client sent undecodable request");
                            if requests_tx.send(request).is_err() {
                                return;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
                        Some(Ok(_)) => {}
                    },
                    command = commands_rx.recv() => match command {
                        Some(ServiceCommand::Event(raw)) => {
                            write.send(Message::Binary(raw.into())).await.expect("Failed to send event");
                        }
                        Some(ServiceCommand::Text(text)) => {
                            write.send(Message::Text(text.into())).await.expect("Failed to send text");
                        }
                        Some(ServiceCommand::Close) | None => {
                            let _ = write.close().await;
                            return;
                        }
                    },
                }
            }
        });

        Self {
            url: format!("ws://127.0.0.1:{port}"),
            requests,
            commands,
        }
    }

    pub fn send_event(&self, event: &Event) {
        self.send_raw(event.encode());
    }

    pub fn send_raw(&self, raw: Vec<u8>) {
        self.commands
            .send(ServiceCommand::Event(raw))
            .expect("Fake service stopped");
    }

    pub fn send_text(&self, text: &str) {
        self.commands
            .send(ServiceCommand::Text(text.to_string()))
            .expect("Fake service stopped");
    }

    pub fn close(&self) {
        let _ = self.commands.send(ServiceCommand::Close);
    }

    /// Next request from the client, failing the test after [`RECV_TIMEOUT`].
    pub async fn next_request(&mut self) -> Request {
        tokio::time::timeout(RECV_TIMEOUT, self.requests.recv())
            .await
            .expect("Timed out waiting for a request")
            .expect("Fake service stopped")
    }

    /// Wait until a request matching `predicate` arrives, skipping others.
    pub async fn expect_request(&mut self, predicate: impl Fn(&Request) -> bool) -> Request {
        loop {
            let request = self.next_request().await;
            if predicate(&request) {
                return request;
            }
        }
    }
}
