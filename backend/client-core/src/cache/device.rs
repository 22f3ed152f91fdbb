use crate::cache::FeatureCache;
use crate::error::ipc::IpcError;
use crate::ipc::{DispatchingHandler, Event, EventKind, Request, WeakConnection};

use common::RedactedSecret;
use models::{DeviceList, DeviceState, DeviceStateKind, RemovedDevice};

use std::sync::Arc;

use log::info;
use tokio::sync::watch;

/// Device state of this client, the account's device list and the last
/// removal.
///
/// A `DeviceRemoval` also replaces the device list with the devices that
/// remain on the account.
#[derive(Clone)]
pub struct DeviceDataSource {
    connection: WeakConnection,
    state: watch::Receiver<Option<DeviceState>>,
    devices: watch::Receiver<Option<DeviceList>>,
    last_removal: watch::Receiver<Option<RemovedDevice>>,
}

impl DeviceDataSource {
    pub fn new(connection: WeakConnection, dispatcher: &mut DispatchingHandler) -> Self {
        let (state_tx, state) = watch::channel(None);
        let devices_tx = Arc::new(watch::Sender::new(None));
        let devices = devices_tx.subscribe();
        let (removal_tx, last_removal) = watch::channel(None);

        dispatcher.register_handler(EventKind::DeviceStateEvent, move |event| {
            let Event::DeviceStateEvent(device_state) = event else {
                return;
            };
            if device_state.kind() == DeviceStateKind::Revoked {
                info!("Device revoked by the service");
            }
            state_tx.send_replace(Some(device_state.clone()));
        });

        let list_tx = Arc::clone(&devices_tx);
        dispatcher.register_handler(EventKind::DeviceListUpdate, move |event| {
            if let Event::DeviceListUpdate(list) = event {
                list_tx.send_replace(Some(list.clone()));
            }
        });

        dispatcher.register_handler(EventKind::DeviceRemoval, move |event| {
            if let Event::DeviceRemoval(removed) = event {
                devices_tx.send_replace(Some(DeviceList {
                    devices: removed.remaining.clone(),
                }));
                removal_tx.send_replace(Some(removed.clone()));
            }
        });

        Self {
            connection,
            state,
            devices,
            last_removal,
        }
    }

    pub fn device_state(&self) -> Option<DeviceState> {
        self.state.borrow().clone()
    }

    pub fn device_list(&self) -> Option<DeviceList> {
        self.devices.borrow().clone()
    }

    pub fn last_removal(&self) -> Option<RemovedDevice> {
        self.last_removal.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<Option<DeviceState>> {
        self.state.clone()
    }

    pub fn subscribe_devices(&self) -> watch::Receiver<Option<DeviceList>> {
        self.devices.clone()
    }

    pub fn refresh_device(&self) -> Result<(), IpcError> {
        self.connection.send(Request::RefreshDeviceState)
    }

    pub fn get_device_list(&self, account_number: RedactedSecret) -> Result<(), IpcError> {
        self.connection.send(Request::GetDeviceList(account_number))
    }

    pub fn remove_device(
        &self,
        account_number: RedactedSecret,
        device_id: impl Into<String>,
    ) -> Result<(), IpcError> {
        self.connection.send(Request::RemoveDevice {
            account: account_number,
            device_id: device_id.into(),
        })
    }
}

impl FeatureCache for DeviceDataSource {
    fn name(&self) -> &'static str {
        "device data source"
    }

    fn prime(&self) -> Result<(), IpcError> {
        self.refresh_device()
    }
}
