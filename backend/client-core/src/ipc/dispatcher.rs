//! Event dispatcher.
//!
//! Decodes inbound payloads and fans each [`Event`] out to the handlers
//! registered for its kind.
//!
//! # Ordering
//!
//! Handlers are invoked in registration order. Handlers registered through
//! [`DispatchingHandler::register_all`] share that single order with
//! kind-specific handlers: an all-kind handler registered between two
//! kind-specific ones runs between them.
//!
//! # Confinement
//!
//! All mutation goes through `&mut self`. The dispatcher lives on the driver
//! task and is never shared, so no locking is involved.

use crate::ipc::event::{Event, EventKind};

use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FormatResult};

use log::{debug, warn};

/// Callback invoked with every event of the kinds it was registered for.
///
/// Handlers run synchronously on the dispatch context and must not block.
pub type EventHandler = Box<dyn FnMut(&Event) + Send>;

/// Identity of one handler registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    /// Id returned for registrations refused after teardown.
    pub const DEAD: HandlerId = HandlerId(0);
}

impl Display for HandlerId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "handler#{}", self.0)
    }
}

pub struct DispatchingHandler {
    /// Per kind, handler ids in registration order.
    routes: HashMap<EventKind, Vec<HandlerId>>,
    handlers: HashMap<HandlerId, EventHandler>,
    next_id: u64,
    torn_down: bool,
}

impl Default for DispatchingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchingHandler {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            handlers: HashMap::new(),
            next_id: 1,
            torn_down: false,
        }
    }

    /// Register `handler` for events of `kind`. Duplicate registrations for
    /// the same kind all fire.
    ///
    /// After [`teardown`](Self::teardown) this is a no-op returning
    /// [`HandlerId::DEAD`].
    pub fn register_handler<F>(&mut self, kind: EventKind, handler: F) -> HandlerId
    where
        F: FnMut(&Event) + Send + 'static,
    {
        self.insert(&[kind], Box::new(handler))
    }

    /// Register `handler` for every recognized event kind.
    pub fn register_all<F>(&mut self, handler: F) -> HandlerId
    where
        F: FnMut(&Event) + Send + 'static,
    {
        self.insert(&EventKind::ALL, Box::new(handler))
    }

    /// Remove one registration. Returns `false` if the id is unknown.
    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        if self.handlers.remove(&id).is_none() {
            return false;
        }

        for ids in self.routes.values_mut() {
            ids.retain(|registered| *registered != id);
        }

        true
    }

    /// Decode `raw` and deliver it. Returns the number of handlers invoked.
    ///
    /// Corrupt and unrecognized payloads are logged and dropped.
    pub fn dispatch(&mut self, raw: &[u8]) -> usize {
        if self.torn_down {
            debug!("Dispatcher torn down, dropping {} byte payload", raw.len());
            return 0;
        }

        match Event::decode(raw) {
            Ok(event) => self.dispatch_event(&event),
            Err(error) => {
                debug!("Dropping undecodable payload ({} bytes): {error}", raw.len());
                0
            }
        }
    }

    /// Deliver an already-decoded event. Returns the number of handlers invoked.
    pub fn dispatch_event(&mut self, event: &Event) -> usize {
        if self.torn_down {
            return 0;
        }

        let Some(kind) = event.kind() else {
            debug!("Dropping unrecognized event");
            return 0;
        };

        let Some(ids) = self.routes.get(&kind) else {
            debug!("No handler registered for {kind:?}");
            return 0;
        };

        let mut invoked = 0;
        for id in ids {
            if let Some(handler) = self.handlers.get_mut(id) {
                handler(event);
                invoked += 1;
            }
        }

        invoked
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.routes.get(&kind).map_or(0, Vec::len)
    }

    /// Drop every registration and stop accepting events. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }

        self.torn_down = true;
        self.routes.clear();
        self.handlers.clear();
        debug!("Dispatcher torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn insert(&mut self, kinds: &[EventKind], handler: EventHandler) -> HandlerId {
        if self.torn_down {
            warn!("Handler registered after dispatcher teardown, ignoring");
            return HandlerId::DEAD;
        }

        let id = HandlerId(self.next_id);
        self.next_id += 1;

        self.handlers.insert(id, handler);
        for kind in kinds {
            self.routes.entry(*kind).or_default().push(id);
        }

        id
    }
}
