use crate::cache::{FeatureCache, subscribe_latest};
use crate::error::ipc::IpcError;
use crate::ipc::{DispatchingHandler, Event, EventKind, Request, WeakConnection};

use models::Settings;

use tokio::sync::watch;

/// Latest settings snapshot. Nothing is requested up front: the service pushes
/// settings to every newly registered listener.
#[derive(Clone)]
pub struct SettingsListener {
    connection: WeakConnection,
    settings: watch::Receiver<Option<Settings>>,
}

impl SettingsListener {
    pub fn new(connection: WeakConnection, dispatcher: &mut DispatchingHandler) -> Self {
        let settings = subscribe_latest(dispatcher, EventKind::SettingsUpdate, None, |event| {
            match event {
                Event::SettingsUpdate(settings) => Some(Some(settings.clone())),
                _ => None,
            }
        });

        Self {
            connection,
            settings,
        }
    }

    pub fn current(&self) -> Option<Settings> {
        self.settings.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Settings>> {
        self.settings.clone()
    }

    pub fn set_allow_lan(&self, allow: bool) -> Result<(), IpcError> {
        self.connection.send(Request::SetAllowLan(allow))
    }

    pub fn set_auto_connect(&self, auto_connect: bool) -> Result<(), IpcError> {
        self.connection.send(Request::SetAutoConnect(auto_connect))
    }

    /// `None` restores the automatic MTU.
    pub fn set_wireguard_mtu(&self, mtu: Option<u32>) -> Result<(), IpcError> {
        self.connection.send(Request::SetWireGuardMtu(mtu))
    }
}

impl FeatureCache for SettingsListener {
    fn name(&self) -> &'static str {
        "settings listener"
    }
}
