//! Shared building blocks for the VPN client workspace.
//!
//! ## Architecture
//!
//! - **common** (this crate): error location tracking and secret redaction
//! - **models**: Pure data structures exchanged with the VPN service
//! - **vpn-client-core**: Service connection container and feature caches
//! - **vpn-client**: Executable wiring everything together

pub mod error;
pub mod redacted_secret;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use redacted_secret::RedactedSecret;
