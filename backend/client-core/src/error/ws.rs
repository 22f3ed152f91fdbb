use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;
use tokio_tungstenite::tungstenite::Error as TungsteniteError;

#[derive(Debug, ThisError)]
pub enum WsError {
    #[error("Connect Error: {message} {location}")]
    Connect {
        message: String,
        location: ErrorLocation,
        #[source]
        source: TungsteniteError,
    },

    #[error("Validation Error: {message} {location}")]
    Validation {
        message: String,
        location: ErrorLocation,
    },
}

impl From<url::ParseError> for WsError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        WsError::Validation {
            message: format!("Invalid service URL: {error}"),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
