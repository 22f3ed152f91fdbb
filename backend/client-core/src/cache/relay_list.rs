use crate::cache::{FeatureCache, SettingsListener, subscribe_latest};
use crate::error::ipc::IpcError;
use crate::ipc::{DispatchingHandler, Event, EventKind, Request, WeakConnection};

use models::{LocationConstraint, RelayList, WireguardConstraints};

use tokio::sync::watch;

/// Relay list plus the location currently selected in settings.
#[derive(Clone)]
pub struct RelayListListener {
    connection: WeakConnection,
    relay_list: watch::Receiver<Option<RelayList>>,
    settings: SettingsListener,
}

impl RelayListListener {
    pub fn new(
        connection: WeakConnection,
        dispatcher: &mut DispatchingHandler,
        settings: SettingsListener,
    ) -> Self {
        let relay_list = subscribe_latest(dispatcher, EventKind::NewRelayList, None, |event| {
            match event {
                Event::NewRelayList(list) => Some(Some(list.clone())),
                _ => None,
            }
        });

        Self {
            connection,
            relay_list,
            settings,
        }
    }

    pub fn relay_list(&self) -> Option<RelayList> {
        self.relay_list.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<RelayList>> {
        self.relay_list.clone()
    }

    pub fn selected_location(&self) -> Option<LocationConstraint> {
        self.settings
            .current()
            .and_then(|settings| settings.selected_location().cloned())
    }

    /// Whether the selected location has an active relay in the current list.
    /// `false` when either is unknown.
    pub fn selected_location_available(&self) -> bool {
        let Some(location) = self.selected_location() else {
            return false;
        };

        self.relay_list
            .borrow()
            .as_ref()
            .is_some_and(|list| list.has_active_relay(&location))
    }

    pub fn select_location(&self, location: LocationConstraint) -> Result<(), IpcError> {
        self.connection.send(Request::SetRelayLocation(location))
    }

    pub fn set_wireguard_constraints(
        &self,
        constraints: WireguardConstraints,
    ) -> Result<(), IpcError> {
        self.connection
            .send(Request::SetWireguardConstraints(constraints))
    }
}

impl FeatureCache for RelayListListener {
    fn name(&self) -> &'static str {
        "relay list listener"
    }
}
