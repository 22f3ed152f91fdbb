use crate::cache::{FeatureCache, subscribe_latest};
use crate::error::ipc::IpcError;
use crate::ipc::{DispatchingHandler, Event, EventKind, Request, WeakConnection};

use models::TunnelState;

use tokio::sync::watch;

/// Tunnel state plus the connect/disconnect controls.
#[derive(Clone)]
pub struct ConnectionProxy {
    connection: WeakConnection,
    state: watch::Receiver<TunnelState>,
}

impl ConnectionProxy {
    pub fn new(connection: WeakConnection, dispatcher: &mut DispatchingHandler) -> Self {
        let state = subscribe_latest(
            dispatcher,
            EventKind::TunnelStateChange,
            TunnelState::disconnected(),
            |event| match event {
                Event::TunnelStateChange(state) => Some(state.clone()),
                _ => None,
            },
        );

        Self { connection, state }
    }

    pub fn current(&self) -> TunnelState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TunnelState> {
        self.state.clone()
    }

    pub fn connect(&self) -> Result<(), IpcError> {
        self.connection.send(Request::Connect)
    }

    pub fn disconnect(&self) -> Result<(), IpcError> {
        self.connection.send(Request::Disconnect)
    }

    pub fn reconnect(&self) -> Result<(), IpcError> {
        self.connection.send(Request::Reconnect)
    }
}

impl FeatureCache for ConnectionProxy {
    fn name(&self) -> &'static str {
        "connection proxy"
    }
}
