use common::ErrorLocation;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the executable.
///
/// Library errors are flattened to a message at the boundary so the type
/// stays serializable for status output.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum VpnClientError {
    /// Error from this app (logging, directories).
    #[error("VPN Client Error: {message} {location}")]
    Client {
        message: String,
        location: ErrorLocation,
    },

    /// Configuration could not be loaded or validated.
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// The service stayed unreachable for the whole reconnect window.
    #[error("Connect Error: {message} {location}")]
    Connect {
        message: String,
        location: ErrorLocation,
    },
}
