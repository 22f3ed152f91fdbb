//! Wire envelopes exchanged with the VPN service.
//!
//! Every outbound request is one `IpcRequestMessage` and every inbound event is
//! one `IpcEventMessage`. The payload is a protobuf oneof; an envelope whose
//! payload tag is unknown to this build decodes with `payload: None`.

use models::{
    AccountCreationResult, AccountExpiry, AccountHistory, AppVersionInfo, DeviceList, DeviceState,
    DnsOptions, GeoIpLocation, LocationConstraint, LoginResult, RelayList, RemovedDevice, Settings,
    SplitTunnelSettings, TunnelState, VoucherSubmissionResult, WireguardConstraints,
};

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct IpcEmpty {}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct IpcRegisterListener {
    /// Endpoint the service delivers events to.
    #[prost(string, tag = "1")]
    pub endpoint: String,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct IpcRemoveDevice {
    #[prost(string, tag = "1")]
    pub account_number: String,
    #[prost(string, tag = "2")]
    pub device_id: String,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct IpcSetWireGuardMtu {
    #[prost(uint32, optional, tag = "1")]
    pub mtu: Option<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IpcNewLocation {
    #[prost(message, optional, tag = "1")]
    pub location: Option<GeoIpLocation>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IpcRequestMessage {
    #[prost(
        oneof = "ipc_request_message::Payload",
        tags = "1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27"
    )]
    pub payload: Option<ipc_request_message::Payload>,
}

pub mod ipc_request_message {
    use super::{
        DnsOptions, IpcEmpty, IpcRegisterListener, IpcRemoveDevice, IpcSetWireGuardMtu,
        LocationConstraint, WireguardConstraints,
    };

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "1")]
        RegisterListener(IpcRegisterListener),
        #[prost(uint32, tag = "2")]
        UnregisterListener(u32),
        #[prost(message, tag = "3")]
        Connect(IpcEmpty),
        #[prost(message, tag = "4")]
        Disconnect(IpcEmpty),
        #[prost(message, tag = "5")]
        Reconnect(IpcEmpty),
        #[prost(message, tag = "6")]
        CreateAccount(IpcEmpty),
        #[prost(string, tag = "7")]
        Login(String),
        #[prost(message, tag = "8")]
        Logout(IpcEmpty),
        #[prost(message, tag = "9")]
        FetchAccountExpiry(IpcEmpty),
        #[prost(message, tag = "10")]
        FetchAccountHistory(IpcEmpty),
        #[prost(message, tag = "11")]
        ClearAccountHistory(IpcEmpty),
        #[prost(message, tag = "12")]
        FetchAuthToken(IpcEmpty),
        #[prost(message, tag = "13")]
        RefreshDeviceState(IpcEmpty),
        #[prost(string, tag = "14")]
        GetDeviceList(String),
        #[prost(message, tag = "15")]
        RemoveDevice(IpcRemoveDevice),
        #[prost(string, tag = "16")]
        SubmitVoucher(String),
        #[prost(bool, tag = "17")]
        SetAllowLan(bool),
        #[prost(bool, tag = "18")]
        SetAutoConnect(bool),
        #[prost(message, tag = "19")]
        SetWireGuardMtu(IpcSetWireGuardMtu),
        #[prost(message, tag = "20")]
        SetRelayLocation(LocationConstraint),
        #[prost(message, tag = "21")]
        SetWireguardConstraints(WireguardConstraints),
        #[prost(bool, tag = "22")]
        SetEnableSplitTunneling(bool),
        #[prost(string, tag = "23")]
        ExcludeApp(String),
        #[prost(string, tag = "24")]
        IncludeApp(String),
        #[prost(message, tag = "25")]
        PersistExcludedApps(IpcEmpty),
        #[prost(bool, tag = "26")]
        VpnPermissionResponse(bool),
        #[prost(message, tag = "27")]
        SetDnsOptions(DnsOptions),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IpcEventMessage {
    #[prost(
        oneof = "ipc_event_message::Payload",
        tags = "1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18"
    )]
    pub payload: Option<ipc_event_message::Payload>,
}

pub mod ipc_event_message {
    use super::{
        AccountCreationResult, AccountExpiry, AccountHistory, AppVersionInfo, DeviceList,
        DeviceState, IpcEmpty, IpcNewLocation, LoginResult, RelayList, RemovedDevice, Settings,
        SplitTunnelSettings, TunnelState, VoucherSubmissionResult,
    };

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(uint32, tag = "1")]
        ListenerReady(u32),
        #[prost(message, tag = "2")]
        TunnelStateChange(TunnelState),
        #[prost(message, tag = "3")]
        SettingsUpdate(Settings),
        #[prost(message, tag = "4")]
        DeviceStateEvent(DeviceState),
        #[prost(message, tag = "5")]
        DeviceListUpdate(DeviceList),
        #[prost(message, tag = "6")]
        DeviceRemoval(RemovedDevice),
        #[prost(message, tag = "7")]
        NewRelayList(RelayList),
        #[prost(message, tag = "8")]
        AppVersionInfo(AppVersionInfo),
        #[prost(string, tag = "9")]
        CurrentVersion(String),
        #[prost(string, tag = "10")]
        AuthToken(String),
        #[prost(message, tag = "11")]
        AccountCreation(AccountCreationResult),
        #[prost(message, tag = "12")]
        LoginResult(LoginResult),
        #[prost(message, tag = "13")]
        AccountExpiry(AccountExpiry),
        #[prost(message, tag = "14")]
        AccountHistory(AccountHistory),
        #[prost(message, tag = "15")]
        VoucherSubmissionResult(VoucherSubmissionResult),
        #[prost(message, tag = "16")]
        SplitTunnelingUpdate(SplitTunnelSettings),
        #[prost(message, tag = "17")]
        NewLocation(IpcNewLocation),
        #[prost(message, tag = "18")]
        VpnPermissionRequest(IpcEmpty),
    }
}
