//! Listener registration protocol.
//!
//! ```text
//! Unregistered ──register──▶ Registering ──ListenerReady(id)──▶ Registered(id)
//!                                 │                                   │
//!                                 └────────────unregister─────────────┤
//!                                                                      ▼
//!                                                   Unregistering ──▶ Closed
//! ```
//!
//! `RegisterListener` is sent at most once per lifetime. `UnregisterListener`
//! is sent at most once and only with an id the service handed out.

use crate::ipc::channel::Connection;
use crate::ipc::dispatcher::DispatchingHandler;
use crate::ipc::event::{Event, EventKind};
use crate::ipc::request::{ListenerId, Request};

use log::{error, info, warn};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Unregistered,
    Registering,
    Registered(ListenerId),
    Unregistering,
    Closed,
}

pub struct ListenerRegistration {
    state: RegistrationState,
    register_attempted: bool,
    /// Fed by the `ListenerReady` handler. Holds every id the service sent;
    /// only the first one observed while registering is acted on.
    ready_rx: watch::Receiver<Option<ListenerId>>,
}

impl ListenerRegistration {
    /// Subscribe to `ListenerReady` on `dispatcher`.
    pub fn new(dispatcher: &mut DispatchingHandler) -> Self {
        let (ready_tx, ready_rx) = watch::channel(None);

        dispatcher.register_handler(EventKind::ListenerReady, move |event| {
            if let Event::ListenerReady(id) = event {
                ready_tx.send_replace(Some(*id));
            }
        });

        Self {
            state: RegistrationState::Unregistered,
            register_attempted: false,
            ready_rx,
        }
    }

    /// Send `RegisterListener`. Only the first call per lifetime does anything.
    ///
    /// A send failure is logged and leaves the state `Unregistered`.
    pub fn register(&mut self, connection: &Connection) {
        if self.register_attempted {
            warn!("RegisterListener already attempted, not sending again");
            return;
        }
        self.register_attempted = true;

        let endpoint = connection.reply_endpoint();
        match connection.send(Request::RegisterListener(endpoint.clone())) {
            Ok(()) => {
                info!("Registering listener at endpoint {endpoint}");
                self.state = RegistrationState::Registering;
            }
            Err(send_error) => {
                error!("Failed to register listener: {send_error}");
            }
        }
    }

    /// Apply a `ListenerReady` the handler has seen since the last poll.
    ///
    /// Returns the id exactly once: on the transition to `Registered`.
    pub fn poll_ready(&mut self) -> Option<ListenerId> {
        if !self.ready_rx.has_changed().unwrap_or(false) {
            return None;
        }

        let id = (*self.ready_rx.borrow_and_update())?;

        match self.state {
            RegistrationState::Registering => {
                info!("Listener registered with id {id}");
                self.state = RegistrationState::Registered(id);
                Some(id)
            }
            RegistrationState::Registered(current) => {
                warn!("Duplicate ListenerReady({id}), keeping listener id {current}");
                None
            }
            other => {
                warn!("Ignoring ListenerReady({id}) in state {other:?}");
                None
            }
        }
    }

    /// Send `UnregisterListener` if an id was issued, then close. Idempotent.
    ///
    /// A send failure is logged, never escalated.
    pub fn unregister(&mut self, connection: &Connection) {
        let previous = std::mem::replace(&mut self.state, RegistrationState::Unregistering);

        match previous {
            RegistrationState::Registered(id) => {
                match connection.send(Request::UnregisterListener(id)) {
                    Ok(()) => info!("Unregistered listener {id}"),
                    Err(send_error) => {
                        error!("Failed to unregister listener {id}: {send_error}")
                    }
                }
            }
            RegistrationState::Closed => {}
            other => info!("No listener id in state {other:?}, skipping unregister"),
        }

        self.state = RegistrationState::Closed;
    }

    pub fn listener_id(&self) -> Option<ListenerId> {
        match self.state {
            RegistrationState::Registered(id) => Some(id),
            _ => None,
        }
    }

    pub fn state(&self) -> RegistrationState {
        self.state
    }
}
