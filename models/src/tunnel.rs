//! Tunnel state as reported by the VPN service.

use crate::location::GeoIpLocation;

/// Phase of the tunnel state machine running inside the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum TunnelStateKind {
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
    Disconnecting = 3,
    Error = 4,
}

/// What the service does once a disconnect completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ActionAfterDisconnect {
    Nothing = 0,
    Block = 1,
    Reconnect = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum TransportProtocol {
    Udp = 0,
    Tcp = 1,
}

/// Remote end of the tunnel.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TunnelEndpoint {
    #[prost(string, tag = "1")]
    pub address: String,
    #[prost(enumeration = "TransportProtocol", tag = "2")]
    pub protocol: i32,
    #[prost(bool, tag = "3")]
    pub quantum_resistant: bool,
}

/// Complete snapshot of the tunnel state. The service always sends the whole
/// snapshot, never a delta.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TunnelState {
    #[prost(enumeration = "TunnelStateKind", tag = "1")]
    pub kind: i32,
    #[prost(message, optional, tag = "2")]
    pub endpoint: Option<TunnelEndpoint>,
    #[prost(message, optional, tag = "3")]
    pub location: Option<GeoIpLocation>,
    #[prost(enumeration = "ActionAfterDisconnect", tag = "4")]
    pub action_after_disconnect: i32,
    #[prost(string, optional, tag = "5")]
    pub error_cause: Option<String>,
    /// Only meaningful in the error state: whether traffic is blocked.
    #[prost(bool, tag = "6")]
    pub blocking: bool,
}

impl TunnelState {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connecting(endpoint: Option<TunnelEndpoint>, location: Option<GeoIpLocation>) -> Self {
        Self {
            kind: TunnelStateKind::Connecting as i32,
            endpoint,
            location,
            ..Self::default()
        }
    }

    pub fn connected(endpoint: TunnelEndpoint, location: Option<GeoIpLocation>) -> Self {
        Self {
            kind: TunnelStateKind::Connected as i32,
            endpoint: Some(endpoint),
            location,
            ..Self::default()
        }
    }

    pub fn disconnecting(action: ActionAfterDisconnect) -> Self {
        Self {
            kind: TunnelStateKind::Disconnecting as i32,
            action_after_disconnect: action as i32,
            ..Self::default()
        }
    }

    pub fn error(cause: impl Into<String>, blocking: bool) -> Self {
        Self {
            kind: TunnelStateKind::Error as i32,
            error_cause: Some(cause.into()),
            blocking,
            ..Self::default()
        }
    }

    pub fn is_connected(&self) -> bool {
        self.kind() == TunnelStateKind::Connected
    }

    /// True when traffic cannot leak: connected, connecting, or a blocking error.
    pub fn is_secured(&self) -> bool {
        match self.kind() {
            TunnelStateKind::Connected | TunnelStateKind::Connecting => true,
            TunnelStateKind::Error => self.blocking,
            TunnelStateKind::Disconnecting => {
                self.action_after_disconnect() != ActionAfterDisconnect::Nothing
            }
            TunnelStateKind::Disconnected => false,
        }
    }
}
