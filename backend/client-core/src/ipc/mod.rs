//! Service IPC layer: the channel abstraction, the closed request/event sets,
//! the dispatcher and the listener registration protocol.
//!
//! # Architecture
//!
//! ```text
//!  service ──raw payload──▶ DispatchingHandler ──&Event──▶ feature caches ──▶ UI
//!     ▲                                                          │
//!     └────────────── Channel::send ◀── Request ◀────────────────┘
//! ```
//!
//! The dispatcher is confined to one execution context: it is owned by the
//! container, which in turn is owned by the driver task. Sending is allowed from
//! any context because [`Channel`] implementations are `Send + Sync`.

mod channel;
mod dispatcher;
mod event;
mod ready;
mod registration;
mod request;

pub use channel::{Channel, Connection, ReplyEndpoint, WeakConnection};
pub use dispatcher::{DispatchingHandler, EventHandler, HandlerId};
pub use event::{AccountCreation, Event, EventKind};
pub use ready::{ReadyCallback, ReadySignal};
pub use registration::{ListenerRegistration, RegistrationState};
pub use request::{ListenerId, Request};
