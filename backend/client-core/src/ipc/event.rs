//! Inbound service events.

use crate::error::ipc::IpcError;
use crate::ipc::request::ListenerId;
use crate::proto::ipc_event_message::Payload;
use crate::proto::{IpcEmpty, IpcEventMessage, IpcNewLocation};

use common::RedactedSecret;
use models::{
    AccountCreationResult, AccountExpiry, AccountHistory, AppVersionInfo, DeviceList, DeviceState,
    GeoIpLocation, LoginResult, LoginStatus, RelayList, RemovedDevice, Settings,
    SplitTunnelSettings, TunnelState, VoucherSubmissionResult,
};

use prost::Message as ProstMessage;

/// Outcome of a `CreateAccount` request.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountCreation {
    Created(RedactedSecret),
    Failed,
}

/// Every message the service can deliver to a registered listener.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ListenerReady(ListenerId),
    TunnelStateChange(TunnelState),
    SettingsUpdate(Settings),
    DeviceStateEvent(DeviceState),
    DeviceListUpdate(DeviceList),
    DeviceRemoval(RemovedDevice),
    NewRelayList(RelayList),
    AppVersionInfo(AppVersionInfo),
    CurrentVersion(String),
    AuthToken(RedactedSecret),
    AccountCreation(AccountCreation),
    LoginResult(LoginStatus),
    AccountExpiry(Option<String>),
    AccountHistory(Option<RedactedSecret>),
    VoucherSubmissionResult(VoucherSubmissionResult),
    SplitTunnelingUpdate(SplitTunnelSettings),
    NewLocation(Option<GeoIpLocation>),
    VpnPermissionRequest,
    /// The envelope decoded but carried a payload this build does not know.
    Unrecognized,
}

/// Fieldless tag of every recognized [`Event`] variant. Handlers register
/// against a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ListenerReady,
    TunnelStateChange,
    SettingsUpdate,
    DeviceStateEvent,
    DeviceListUpdate,
    DeviceRemoval,
    NewRelayList,
    AppVersionInfo,
    CurrentVersion,
    AuthToken,
    AccountCreation,
    LoginResult,
    AccountExpiry,
    AccountHistory,
    VoucherSubmissionResult,
    SplitTunnelingUpdate,
    NewLocation,
    VpnPermissionRequest,
}

impl EventKind {
    pub const ALL: [EventKind; 18] = [
        EventKind::ListenerReady,
        EventKind::TunnelStateChange,
        EventKind::SettingsUpdate,
        EventKind::DeviceStateEvent,
        EventKind::DeviceListUpdate,
        EventKind::DeviceRemoval,
        EventKind::NewRelayList,
        EventKind::AppVersionInfo,
        EventKind::CurrentVersion,
        EventKind::AuthToken,
        EventKind::AccountCreation,
        EventKind::LoginResult,
        EventKind::AccountExpiry,
        EventKind::AccountHistory,
        EventKind::VoucherSubmissionResult,
        EventKind::SplitTunnelingUpdate,
        EventKind::NewLocation,
        EventKind::VpnPermissionRequest,
    ];
}

impl Event {
    /// `None` only for [`Event::Unrecognized`].
    pub fn kind(&self) -> Option<EventKind> {
        let kind = match self {
            Event::ListenerReady(_) => EventKind::ListenerReady,
            Event::TunnelStateChange(_) => EventKind::TunnelStateChange,
            Event::SettingsUpdate(_) => EventKind::SettingsUpdate,
            Event::DeviceStateEvent(_) => EventKind::DeviceStateEvent,
            Event::DeviceListUpdate(_) => EventKind::DeviceListUpdate,
            Event::DeviceRemoval(_) => EventKind::DeviceRemoval,
            Event::NewRelayList(_) => EventKind::NewRelayList,
            Event::AppVersionInfo(_) => EventKind::AppVersionInfo,
            Event::CurrentVersion(_) => EventKind::CurrentVersion,
            Event::AuthToken(_) => EventKind::AuthToken,
            Event::AccountCreation(_) => EventKind::AccountCreation,
            Event::LoginResult(_) => EventKind::LoginResult,
            Event::AccountExpiry(_) => EventKind::AccountExpiry,
            Event::AccountHistory(_) => EventKind::AccountHistory,
            Event::VoucherSubmissionResult(_) => EventKind::VoucherSubmissionResult,
            Event::SplitTunnelingUpdate(_) => EventKind::SplitTunnelingUpdate,
            Event::NewLocation(_) => EventKind::NewLocation,
            Event::VpnPermissionRequest => EventKind::VpnPermissionRequest,
            Event::Unrecognized => return None,
        };

        Some(kind)
    }

    /// Decode one inbound payload. A corrupt payload is an error; a valid
    /// envelope with an unknown payload is [`Event::Unrecognized`].
    #[track_caller]
    pub fn decode(raw: &[u8]) -> Result<Self, IpcError> {
        let message = IpcEventMessage::decode(raw)?;

        Ok(message.payload.map_or(Event::Unrecognized, Self::from_payload))
    }

    /// Encode as the service would. `Unrecognized` encodes to an empty envelope.
    pub fn encode(&self) -> Vec<u8> {
        IpcEventMessage {
            payload: self.to_payload(),
        }
        .encode_to_vec()
    }

    fn from_payload(payload: Payload) -> Self {
        match payload {
            Payload::ListenerReady(id) => Event::ListenerReady(ListenerId(id)),
            Payload::TunnelStateChange(state) => Event::TunnelStateChange(state),
            Payload::SettingsUpdate(settings) => Event::SettingsUpdate(settings),
            Payload::DeviceStateEvent(state) => Event::DeviceStateEvent(state),
            Payload::DeviceListUpdate(list) => Event::DeviceListUpdate(list),
            Payload::DeviceRemoval(removed) => Event::DeviceRemoval(removed),
            Payload::NewRelayList(list) => Event::NewRelayList(list),
            Payload::AppVersionInfo(info) => Event::AppVersionInfo(info),
            Payload::CurrentVersion(version) => Event::CurrentVersion(version),
            Payload::AuthToken(token) => Event::AuthToken(RedactedSecret::new(token)),
            Payload::AccountCreation(result) => Event::AccountCreation(
                result
                    .account_number
                    .map_or(AccountCreation::Failed, |number| {
                        AccountCreation::Created(RedactedSecret::new(number))
                    }),
            ),
            Payload::LoginResult(result) => Event::LoginResult(result.status()),
            Payload::AccountExpiry(expiry) => Event::AccountExpiry(expiry.expiry),
            Payload::AccountHistory(history) => {
                Event::AccountHistory(history.account_number.map(RedactedSecret::new))
            }
            Payload::VoucherSubmissionResult(result) => Event::VoucherSubmissionResult(result),
            Payload::SplitTunnelingUpdate(split) => Event::SplitTunnelingUpdate(split),
            Payload::NewLocation(location) => Event::NewLocation(location.location),
            Payload::VpnPermissionRequest(_) => Event::VpnPermissionRequest,
        }
    }

    fn to_payload(&self) -> Option<Payload> {
        let payload = match self {
            Event::ListenerReady(id) => Payload::ListenerReady(id.0),
            Event::TunnelStateChange(state) => Payload::TunnelStateChange(state.clone()),
            Event::SettingsUpdate(settings) => Payload::SettingsUpdate(settings.clone()),
            Event::DeviceStateEvent(state) => Payload::DeviceStateEvent(state.clone()),
            Event::DeviceListUpdate(list) => Payload::DeviceListUpdate(list.clone()),
            Event::DeviceRemoval(removed) => Payload::DeviceRemoval(removed.clone()),
            Event::NewRelayList(list) => Payload::NewRelayList(list.clone()),
            Event::AppVersionInfo(info) => Payload::AppVersionInfo(info.clone()),
            Event::CurrentVersion(version) => Payload::CurrentVersion(version.clone()),
            Event::AuthToken(token) => Payload::AuthToken(token.expose().to_string()),
            Event::AccountCreation(creation) => Payload::AccountCreation(AccountCreationResult {
                account_number: match creation {
                    AccountCreation::Created(number) => Some(number.expose().to_string()),
                    AccountCreation::Failed => None,
                },
            }),
            Event::LoginResult(status) => Payload::LoginResult(LoginResult {
                status: *status as i32,
            }),
            Event::AccountExpiry(expiry) => Payload::AccountExpiry(AccountExpiry {
                expiry: expiry.clone(),
            }),
            Event::AccountHistory(history) => Payload::AccountHistory(AccountHistory {
                account_number: history.as_ref().map(|number| number.expose().to_string()),
            }),
            Event::VoucherSubmissionResult(result) => {
                Payload::VoucherSubmissionResult(result.clone())
            }
            Event::SplitTunnelingUpdate(split) => Payload::SplitTunnelingUpdate(split.clone()),
            Event::NewLocation(location) => Payload::NewLocation(IpcNewLocation {
                location: location.clone(),
            }),
            Event::VpnPermissionRequest => Payload::VpnPermissionRequest(IpcEmpty {}),
            Event::Unrecognized => return None,
        };

        Some(payload)
    }
}
