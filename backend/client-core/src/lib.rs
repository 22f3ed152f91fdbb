pub mod cache;
pub mod config;
pub mod container;
pub mod error;
pub mod ipc;
pub mod proto;
pub mod transport;

#[cfg(test)]
mod tests;

pub const DEFAULT_DAEMON_HOST: &str = "127.0.0.1";
pub const DEFAULT_DAEMON_PORT: u16 = 47_830;
pub const DEFAULT_DAEMON_IPC_URL: &str =
    const_format::concatcp!("ws://", DEFAULT_DAEMON_HOST, ":", DEFAULT_DAEMON_PORT);
