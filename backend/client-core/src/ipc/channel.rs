//! Outbound half of the service connection.

use crate::error::ipc::IpcError;
use crate::ipc::request::Request;

use common::ErrorLocation;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;
use std::sync::{Arc, Weak};

use uuid::Uuid;

/// Endpoint identity handed to the service in `RegisterListener` so it knows
/// where to deliver events for this connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReplyEndpoint(String);

impl ReplyEndpoint {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self(endpoint.into())
    }

    /// A fresh random endpoint identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ReplyEndpoint {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(&self.0)
    }
}

/// Fire-and-forget cross-process send primitive.
///
/// Implementations must not block: payloads are queued and delivered
/// asynchronously. A failure is reported synchronously and means the payload
/// was not accepted; there is no delivery acknowledgement.
pub trait Channel: Send + Sync {
    fn send(&self, payload: Vec<u8>) -> Result<(), IpcError>;

    fn reply_endpoint(&self) -> ReplyEndpoint;
}

/// Owning handle to the channel. Exactly one exists per container.
pub struct Connection {
    channel: Arc<dyn Channel>,
}

impl Connection {
    pub fn new(channel: impl Channel + 'static) -> Self {
        Self {
            channel: Arc::new(channel),
        }
    }

    pub fn from_shared(channel: Arc<dyn Channel>) -> Self {
        Self { channel }
    }

    /// Encode and send one request.
    #[track_caller]
    pub fn send(&self, request: Request) -> Result<(), IpcError> {
        self.channel.send(request.encode())
    }

    pub fn reply_endpoint(&self) -> ReplyEndpoint {
        self.channel.reply_endpoint()
    }

    /// Non-owning handle for feature caches.
    pub fn downgrade(&self) -> WeakConnection {
        WeakConnection {
            channel: Arc::downgrade(&self.channel),
        }
    }
}

/// Non-owning handle to the channel held by feature caches.
///
/// Sending through it after the owning [`Connection`] is gone fails with
/// [`IpcError::Disconnected`].
#[derive(Clone)]
pub struct WeakConnection {
    channel: Weak<dyn Channel>,
}

impl WeakConnection {
    #[track_caller]
    pub fn send(&self, request: Request) -> Result<(), IpcError> {
        let channel = self.channel.upgrade().ok_or_else(|| IpcError::Disconnected {
            message: format!("Connection closed, dropping {request:?}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        channel.send(request.encode())
    }

    pub fn is_alive(&self) -> bool {
        self.channel.strong_count() > 0
    }
}
