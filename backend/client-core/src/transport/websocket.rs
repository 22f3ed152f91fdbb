//! WebSocket transport.
//!
//! One binary frame carries one payload in each direction. Outbound payloads
//! go through an unbounded queue drained by a writer task, so
//! [`Channel::send`] never blocks. A reader task forwards inbound binary
//! frames to the receiver returned by [`WebSocketChannel::connect`]; the
//! receiver closes when the socket does.

use crate::error::ipc::IpcError;
use crate::error::ws::WsError;
use crate::ipc::{Channel, ReplyEndpoint};

use common::ErrorLocation;

use std::panic::Location;

use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

pub struct WebSocketChannel {
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    endpoint: ReplyEndpoint,
}

impl WebSocketChannel {
    /// Connect to the service at `url` (`ws://` or `wss://`).
    ///
    /// # Errors
    ///
    /// [`WsError::Validation`] for a malformed or non-WebSocket URL,
    /// [`WsError::Connect`] if the handshake fails.
    pub async fn connect(url: &str) -> Result<(Self, mpsc::UnboundedReceiver<Vec<u8>>), WsError> {
        let url = Url::parse(url)?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(WsError::Validation {
                message: format!("Service URL must use ws:// or wss://, got {url}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let (ws_stream, _) =
            connect_async(url.as_str())
                .await
                .map_err(|source| WsError::Connect {
                    message: format!("Failed to connect to {url}"),
                    location: ErrorLocation::from(Location::caller()),
                    source,
                })?;
        info!("Connected to service at {url}");

        let (mut write, mut read) = ws_stream.split();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Vec<u8>>();
        let (inbound_tx, inbound) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(payload) = outbound_rx.recv().await {
                if let Err(write_error) = write.send(Message::Binary(payload.into())).await {
                    error!("Failed to write to service: {write_error}");
                    return;
                }
            }

            debug!("Outbound queue closed, closing socket");
            let _ = write.close().await;
        });

        tokio::spawn(async move {
            while let Some(message) = read.next().await {
                match message {
                    Ok(Message::Binary(data)) => {
                        if inbound_tx.send(data.to_vec()).is_err() {
                            debug!("Inbound receiver dropped, stopping reader");
                            return;
                        }
                    }
                    Ok(Message::Text(_)) => warn!("Ignoring text frame from service"),
                    Ok(Message::Close(_)) => {
                        info!("Service closed the connection");
                        return;
                    }
                    Ok(_) => {}
                    Err(read_error) => {
                        error!("Error reading from service: {read_error}");
                        return;
                    }
                }
            }
        });

        let channel = Self {
            outbound,
            endpoint: ReplyEndpoint::generate(),
        };

        Ok((channel, inbound))
    }
}

impl Channel for WebSocketChannel {
    #[track_caller]
    fn send(&self, payload: Vec<u8>) -> Result<(), IpcError> {
        self.outbound.send(payload).map_err(|_| IpcError::Send {
            message: String::from("WebSocket writer has stopped"),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn reply_endpoint(&self) -> ReplyEndpoint {
        self.endpoint.clone()
    }
}
