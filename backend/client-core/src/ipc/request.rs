use crate::error::ipc::IpcError;
use crate::ipc::channel::ReplyEndpoint;
use crate::proto::ipc_request_message::Payload;
use crate::proto::{
    IpcEmpty, IpcRegisterListener, IpcRemoveDevice, IpcRequestMessage, IpcSetWireGuardMtu,
};

use common::{ErrorLocation, RedactedSecret};
use models::{DnsOptions, LocationConstraint, WireguardConstraints};

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;

use prost::Message as ProstMessage;

/// Listener identity issued by the service in `ListenerReady`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

impl Display for ListenerId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "{}", self.0)
    }
}

/// Every message the client can send to the service.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    RegisterListener(ReplyEndpoint),
    UnregisterListener(ListenerId),

    Connect,
    Disconnect,
    Reconnect,

    CreateAccount,
    Login(RedactedSecret),
    Logout,
    FetchAccountExpiry,
    FetchAccountHistory,
    ClearAccountHistory,
    FetchAuthToken,

    RefreshDeviceState,
    GetDeviceList(RedactedSecret),
    RemoveDevice {
        account: RedactedSecret,
        device_id: String,
    },

    SubmitVoucher(String),

    SetAllowLan(bool),
    SetAutoConnect(bool),
    SetWireGuardMtu(Option<u32>),
    SetRelayLocation(LocationConstraint),
    SetWireguardConstraints(WireguardConstraints),
    SetDnsOptions(DnsOptions),

    SetEnableSplitTunneling(bool),
    ExcludeApp(String),
    IncludeApp(String),
    PersistExcludedApps,

    VpnPermissionResponse(bool),
}

impl Request {
    /// Serialize into exactly one outbound payload.
    pub fn encode(&self) -> Vec<u8> {
        self.to_message().encode_to_vec()
    }

    /// Parse an outbound payload. Used by service-side tooling and tests.
    #[track_caller]
    pub fn decode(raw: &[u8]) -> Result<Self, IpcError> {
        let message = IpcRequestMessage::decode(raw)?;
        let payload = message.payload.ok_or_else(|| IpcError::ProtobufDecode {
            message: String::from("Request envelope without a known payload"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self::from_payload(payload))
    }

    pub fn to_message(&self) -> IpcRequestMessage {
        let payload = match self {
            Request::RegisterListener(endpoint) => Payload::RegisterListener(IpcRegisterListener {
                endpoint: endpoint.as_str().to_string(),
            }),
            Request::UnregisterListener(listener_id) => Payload::UnregisterListener(listener_id.0),
            Request::Connect => Payload::Connect(IpcEmpty {}),
            Request::Disconnect => Payload::Disconnect(IpcEmpty {}),
            Request::Reconnect => Payload::Reconnect(IpcEmpty {}),
            Request::CreateAccount => Payload::CreateAccount(IpcEmpty {}),
            Request::Login(account) => Payload::Login(account.expose().to_string()),
            Request::Logout => Payload::Logout(IpcEmpty {}),
            Request::FetchAccountExpiry => Payload::FetchAccountExpiry(IpcEmpty {}),
            Request::FetchAccountHistory => Payload::FetchAccountHistory(IpcEmpty {}),
            Request::ClearAccountHistory => Payload::ClearAccountHistory(IpcEmpty {}),
            Request::FetchAuthToken => Payload::FetchAuthToken(IpcEmpty {}),
            Request::RefreshDeviceState => Payload::RefreshDeviceState(IpcEmpty {}),
            Request::GetDeviceList(account) => Payload::GetDeviceList(account.expose().to_string()),
            Request::RemoveDevice { account, device_id } => {
                Payload::RemoveDevice(IpcRemoveDevice {
                    account_number: account.expose().to_string(),
                    device_id: device_id.clone(),
                })
            }
            Request::SubmitVoucher(code) => Payload::SubmitVoucher(code.clone()),
            Request::SetAllowLan(allow) => Payload::SetAllowLan(*allow),
            Request::SetAutoConnect(auto_connect) => Payload::SetAutoConnect(*auto_connect),
            Request::SetWireGuardMtu(mtu) => {
                Payload::SetWireGuardMtu(IpcSetWireGuardMtu { mtu: *mtu })
            }
            Request::SetRelayLocation(location) => Payload::SetRelayLocation(location.clone()),
            Request::SetWireguardConstraints(constraints) => {
                Payload::SetWireguardConstraints(constraints.clone())
            }
            Request::SetDnsOptions(options) => Payload::SetDnsOptions(options.clone()),
            Request::SetEnableSplitTunneling(enabled) => Payload::SetEnableSplitTunneling(*enabled),
            Request::ExcludeApp(app) => Payload::ExcludeApp(app.clone()),
            Request::IncludeApp(app) => Payload::IncludeApp(app.clone()),
            Request::PersistExcludedApps => Payload::PersistExcludedApps(IpcEmpty {}),
            Request::VpnPermissionResponse(granted) => Payload::VpnPermissionResponse(*granted),
        };

        IpcRequestMessage {
            payload: Some(payload),
        }
    }

    fn from_payload(payload: Payload) -> Self {
        match payload {
            Payload::RegisterListener(register) => {
                Request::RegisterListener(ReplyEndpoint::new(register.endpoint))
            }
            Payload::UnregisterListener(listener_id) => {
                Request::UnregisterListener(ListenerId(listener_id))
            }
            Payload::Connect(_) => Request::Connect,
            Payload::Disconnect(_) => Request::Disconnect,
            Payload::Reconnect(_) => Request::Reconnect,
            Payload::CreateAccount(_) => Request::CreateAccount,
            Payload::Login(account) => Request::Login(RedactedSecret::new(account)),
            Payload::Logout(_) => Request::Logout,
            Payload::FetchAccountExpiry(_) => Request::FetchAccountExpiry,
            Payload::FetchAccountHistory(_) => Request::FetchAccountHistory,
            Payload::ClearAccountHistory(_) => Request::ClearAccountHistory,
            Payload::FetchAuthToken(_) => Request::FetchAuthToken,
            Payload::RefreshDeviceState(_) => Request::RefreshDeviceState,
            Payload::GetDeviceList(account) => Request::GetDeviceList(RedactedSecret::new(account)),
            Payload::RemoveDevice(remove) => Request::RemoveDevice {
                account: RedactedSecret::new(remove.account_number),
                device_id: remove.device_id,
            },
            Payload::SubmitVoucher(code) => Request::SubmitVoucher(code),
            Payload::SetAllowLan(allow) => Request::SetAllowLan(allow),
            Payload::SetAutoConnect(auto_connect) => Request::SetAutoConnect(auto_connect),
            Payload::SetWireGuardMtu(mtu) => Request::SetWireGuardMtu(mtu.mtu),
            Payload::SetRelayLocation(location) => Request::SetRelayLocation(location),
            Payload::SetWireguardConstraints(constraints) => {
                Request::SetWireguardConstraints(constraints)
            }
            Payload::SetDnsOptions(options) => Request::SetDnsOptions(options),
            Payload::SetEnableSplitTunneling(enabled) => Request::SetEnableSplitTunneling(enabled),
            Payload::ExcludeApp(app) => Request::ExcludeApp(app),
            Payload::IncludeApp(app) => Request::IncludeApp(app),
            Payload::PersistExcludedApps(_) => Request::PersistExcludedApps,
            Payload::VpnPermissionResponse(granted) => Request::VpnPermissionResponse(granted),
        }
    }
}
