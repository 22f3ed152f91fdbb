use crate::cache::{FeatureCache, SettingsListener};
use crate::error::ipc::IpcError;
use crate::ipc::{Request, WeakConnection};

use models::{DnsOptions, DnsState};

use std::net::IpAddr;

use log::warn;

/// Custom DNS controls derived from the latest settings snapshot.
///
/// Every change is sent as a full `SetDnsOptions` built from the snapshot;
/// the cache itself only updates when the service echoes new settings.
#[derive(Clone)]
pub struct CustomDns {
    connection: WeakConnection,
    settings: SettingsListener,
}

impl CustomDns {
    pub fn new(connection: WeakConnection, settings: SettingsListener) -> Self {
        Self {
            connection,
            settings,
        }
    }

    pub fn dns_options(&self) -> DnsOptions {
        self.settings
            .current()
            .and_then(|settings| settings.dns_options().cloned())
            .unwrap_or_default()
    }

    pub fn is_enabled(&self) -> bool {
        self.dns_options().state() == DnsState::Custom
    }

    /// Configured servers. Addresses that do not parse are skipped.
    pub fn servers(&self) -> Vec<IpAddr> {
        self.dns_options()
            .custom_addresses
            .iter()
            .filter_map(|address| match address.parse() {
                Ok(address) => Some(address),
                Err(_) => {
                    warn!("Ignoring malformed DNS server address {address:?}");
                    None
                }
            })
            .collect()
    }

    pub fn enable(&self) -> Result<(), IpcError> {
        let mut options = self.dns_options();
        options.set_state(DnsState::Custom);
        self.connection.send(Request::SetDnsOptions(options))
    }

    pub fn disable(&self) -> Result<(), IpcError> {
        let mut options = self.dns_options();
        options.set_state(DnsState::Default);
        self.connection.send(Request::SetDnsOptions(options))
    }

    /// Returns `Ok(false)` without sending if the server is already present.
    pub fn add_server(&self, server: IpAddr) -> Result<bool, IpcError> {
        if self.servers().contains(&server) {
            return Ok(false);
        }

        let mut options = self.dns_options();
        options.custom_addresses.push(server.to_string());
        self.connection.send(Request::SetDnsOptions(options))?;

        Ok(true)
    }

    /// Returns `Ok(false)` without sending if the server is not configured.
    pub fn remove_server(&self, server: IpAddr) -> Result<bool, IpcError> {
        let mut options = self.dns_options();
        let before = options.custom_addresses.len();
        options
            .custom_addresses
            .retain(|address| address.parse::<IpAddr>().ok() != Some(server));

        if options.custom_addresses.len() == before {
            return Ok(false);
        }

        self.connection.send(Request::SetDnsOptions(options))?;

        Ok(true)
    }
}

impl FeatureCache for CustomDns {
    fn name(&self) -> &'static str {
        "custom dns"
    }
}
