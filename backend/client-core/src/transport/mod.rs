//! Concrete transports implementing [`Channel`](crate::ipc::Channel).

pub mod websocket;

pub use websocket::WebSocketChannel;
