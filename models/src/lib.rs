//! Domain models exchanged with the VPN service.
//!
//! These are pure data structures: the payloads carried by service events and
//! client requests. They are protobuf messages so the transport can encode them
//! as-is. Models have no business logic beyond small predicates and a validated
//! builder.

pub mod account;
pub mod device;
pub mod error;
pub mod location;
pub mod relay_list;
pub mod relay_location;
pub mod settings;
pub mod tunnel;
pub mod version;

pub use account::{
    AccountCreationResult, AccountExpiry, AccountHistory, LoginResult, LoginStatus,
    VoucherStatus, VoucherSubmissionResult,
};
pub use device::{Device, DeviceList, DeviceState, DeviceStateKind, RemovedDevice};
pub use error::model_error::ModelError;
pub use location::{GeoIpLocation, LocationConstraint};
pub use relay_list::{Relay, RelayCity, RelayCountry, RelayList};
pub use relay_location::builder::RelayLocationBuilder;
pub use settings::{
    DefaultDnsOptions, DnsOptions, DnsState, RelaySettings, Settings, SplitTunnelSettings,
    TunnelOptions, WireguardConstraints,
};
pub use tunnel::{ActionAfterDisconnect, TransportProtocol, TunnelEndpoint, TunnelState, TunnelStateKind};
pub use version::AppVersionInfo;

#[cfg(test)]
mod tests;
