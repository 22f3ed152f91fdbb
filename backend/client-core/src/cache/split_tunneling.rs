use crate::cache::FeatureCache;
use crate::error::ipc::IpcError;
use crate::ipc::{DispatchingHandler, Event, EventKind, Request, WeakConnection};

use models::{Settings, SplitTunnelSettings};

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::watch;

/// Split tunneling state. Fed by `SplitTunnelingUpdate` and by the
/// split-tunnel section of every settings snapshot.
#[derive(Clone)]
pub struct SplitTunneling {
    connection: WeakConnection,
    state: watch::Receiver<SplitTunnelSettings>,
}

impl SplitTunneling {
    pub fn new(connection: WeakConnection, dispatcher: &mut DispatchingHandler) -> Self {
        let state_tx = Arc::new(watch::Sender::new(SplitTunnelSettings::default()));
        let state = state_tx.subscribe();

        let update_tx = Arc::clone(&state_tx);
        dispatcher.register_handler(EventKind::SplitTunnelingUpdate, move |event| {
            if let Event::SplitTunnelingUpdate(split) = event {
                update_tx.send_replace(split.clone());
            }
        });

        dispatcher.register_handler(EventKind::SettingsUpdate, move |event| {
            if let Event::SettingsUpdate(Settings {
                split_tunnel: Some(split),
                ..
            }) = event
            {
                state_tx.send_replace(split.clone());
            }
        });

        Self { connection, state }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    pub fn excluded_apps(&self) -> BTreeSet<String> {
        self.state.borrow().excluded_apps.iter().cloned().collect()
    }

    pub fn subscribe(&self) -> watch::Receiver<SplitTunnelSettings> {
        self.state.clone()
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<(), IpcError> {
        self.connection.send(Request::SetEnableSplitTunneling(enabled))
    }

    pub fn exclude_app(&self, app: impl Into<String>) -> Result<(), IpcError> {
        self.connection.send(Request::ExcludeApp(app.into()))
    }

    pub fn include_app(&self, app: impl Into<String>) -> Result<(), IpcError> {
        self.connection.send(Request::IncludeApp(app.into()))
    }

    /// Ask the service to write the excluded app list to disk.
    pub fn persist(&self) -> Result<(), IpcError> {
        self.connection.send(Request::PersistExcludedApps)
    }
}

impl FeatureCache for SplitTunneling {
    fn name(&self) -> &'static str {
        "split tunneling"
    }
}
