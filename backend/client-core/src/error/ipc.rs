use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum IpcError {
    /// The channel refused the payload (remote gone, queue closed).
    #[error("Send Error: {message} {location}")]
    Send {
        message: String,
        location: ErrorLocation,
    },

    /// The connection handle outlived the container that owned it.
    #[error("Disconnected Error: {message} {location}")]
    Disconnected {
        message: String,
        location: ErrorLocation,
    },

    #[error("Protobuf Decode Error: {message} {location}")]
    ProtobufDecode {
        message: String,
        location: ErrorLocation,
    },

    /// Shared cache state was poisoned by a panicking handler.
    #[error("Lock Error: {message} {location}")]
    Lock {
        message: String,
        location: ErrorLocation,
    },
}

impl From<prost::DecodeError> for IpcError {
    #[track_caller]
    fn from(error: prost::DecodeError) -> Self {
        IpcError::ProtobufDecode {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
