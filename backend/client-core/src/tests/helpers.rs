//! Test doubles shared by the unit tests.

use crate::error::ipc::IpcError;
use crate::ipc::{Channel, Connection, Event, ListenerId, ReplyEndpoint, Request};

use common::ErrorLocation;

use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_ENDPOINT: &str = "test-endpoint";

/// Channel that records every payload it accepts. Clones share the record, so
/// a test keeps one clone while the connection owns another.
#[derive(Clone, Default)]
pub struct RecordingChannel {
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingChannel {
    pub fn failing() -> Self {
        let channel = Self::default();
        channel.set_failing(true);
        channel
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn connection(&self) -> Connection {
        Connection::new(self.clone())
    }

    pub fn requests(&self) -> Vec<Request> {
        self.sent
            .lock()
            .expect("recording lock poisoned")
            .iter()
            .map(|raw| Request::decode(raw).expect("recorded payload should decode"))
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&Request) -> bool) -> usize {
        self.requests().iter().filter(|request| predicate(request)).count()
    }

    pub fn clear(&self) {
        self.sent.lock().expect("recording lock poisoned").clear();
    }
}

impl Channel for RecordingChannel {
    #[track_caller]
    fn send(&self, payload: Vec<u8>) -> Result<(), IpcError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(IpcError::Send {
                message: String::from("recording channel set to fail"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.sent
            .lock()
            .expect("recording lock poisoned")
            .push(payload);
        Ok(())
    }

    fn reply_endpoint(&self) -> ReplyEndpoint {
        ReplyEndpoint::new(TEST_ENDPOINT)
    }
}

pub fn listener_ready(id: u32) -> Vec<u8> {
    Event::ListenerReady(ListenerId(id)).encode()
}

pub fn is_register(request: &Request) -> bool {
    matches!(request, Request::RegisterListener(_))
}

pub fn is_unregister(request: &Request) -> bool {
    matches!(request, Request::UnregisterListener(_))
}

/// Bytes that are not a valid protobuf envelope (truncated length-delimited field).
pub const CORRUPT_PAYLOAD: &[u8] = &[0x12, 0xff, 0x01];

/// A valid envelope whose only field (tag 99) is unknown to this build.
pub const UNKNOWN_PAYLOAD: &[u8] = &[0x98, 0x06, 0x01];
