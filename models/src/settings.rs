//! Daemon settings snapshot.

use crate::location::LocationConstraint;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum DnsState {
    Default = 0,
    Custom = 1,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct DefaultDnsOptions {
    #[prost(bool, tag = "1")]
    pub block_ads: bool,
    #[prost(bool, tag = "2")]
    pub block_trackers: bool,
    #[prost(bool, tag = "3")]
    pub block_malware: bool,
    #[prost(bool, tag = "4")]
    pub block_adult_content: bool,
    #[prost(bool, tag = "5")]
    pub block_gambling: bool,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct DnsOptions {
    #[prost(enumeration = "DnsState", tag = "1")]
    pub state: i32,
    #[prost(message, optional, tag = "2")]
    pub default_options: Option<DefaultDnsOptions>,
    #[prost(string, repeated, tag = "3")]
    pub custom_addresses: Vec<String>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct TunnelOptions {
    #[prost(uint32, optional, tag = "1")]
    pub wireguard_mtu: Option<u32>,
    #[prost(bool, tag = "2")]
    pub quantum_resistant: bool,
    #[prost(message, optional, tag = "3")]
    pub dns_options: Option<DnsOptions>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct WireguardConstraints {
    /// `None` means any port.
    #[prost(uint32, optional, tag = "1")]
    pub port: Option<u32>,
    #[prost(bool, tag = "2")]
    pub use_multihop: bool,
    #[prost(message, optional, tag = "3")]
    pub entry_location: Option<LocationConstraint>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct RelaySettings {
    #[prost(message, optional, tag = "1")]
    pub location: Option<LocationConstraint>,
    #[prost(message, optional, tag = "2")]
    pub wireguard_constraints: Option<WireguardConstraints>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct SplitTunnelSettings {
    #[prost(bool, tag = "1")]
    pub enabled: bool,
    #[prost(string, repeated, tag = "2")]
    pub excluded_apps: Vec<String>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct Settings {
    #[prost(message, optional, tag = "1")]
    pub relay_settings: Option<RelaySettings>,
    #[prost(bool, tag = "2")]
    pub allow_lan: bool,
    #[prost(bool, tag = "3")]
    pub auto_connect: bool,
    #[prost(message, optional, tag = "4")]
    pub tunnel_options: Option<TunnelOptions>,
    #[prost(bool, tag = "5")]
    pub show_beta_releases: bool,
    #[prost(message, optional, tag = "6")]
    pub split_tunnel: Option<SplitTunnelSettings>,
}

impl Settings {
    pub fn selected_location(&self) -> Option<&LocationConstraint> {
        self.relay_settings.as_ref()?.location.as_ref()
    }

    pub fn dns_options(&self) -> Option<&DnsOptions> {
        self.tunnel_options.as_ref()?.dns_options.as_ref()
    }
}
