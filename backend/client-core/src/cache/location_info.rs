use crate::cache::FeatureCache;
use crate::ipc::{DispatchingHandler, Event, EventKind};

use models::{GeoIpLocation, TunnelStateKind};

use std::sync::Arc;

use tokio::sync::watch;

/// Geographic location of the current exit IP.
///
/// While the tunnel is connecting or disconnecting the location is unknown.
/// A connected tunnel state or a `NewLocation` event replaces it.
#[derive(Clone)]
pub struct LocationInfoCache {
    location: watch::Receiver<Option<GeoIpLocation>>,
}

impl LocationInfoCache {
    pub fn new(dispatcher: &mut DispatchingHandler) -> Self {
        let location_tx = Arc::new(watch::Sender::new(None));
        let location = location_tx.subscribe();

        let tunnel_tx = Arc::clone(&location_tx);
        dispatcher.register_handler(EventKind::TunnelStateChange, move |event| {
            let Event::TunnelStateChange(state) = event else {
                return;
            };

            match state.kind() {
                TunnelStateKind::Connecting | TunnelStateKind::Disconnecting => {
                    tunnel_tx.send_replace(None);
                }
                TunnelStateKind::Connected => {
                    if let Some(location) = &state.location {
                        tunnel_tx.send_replace(Some(location.clone()));
                    }
                }
                TunnelStateKind::Disconnected | TunnelStateKind::Error => {}
            }
        });

        dispatcher.register_handler(EventKind::NewLocation, move |event| {
            if let Event::NewLocation(location) = event {
                location_tx.send_replace(location.clone());
            }
        });

        Self { location }
    }

    pub fn current(&self) -> Option<GeoIpLocation> {
        self.location.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<GeoIpLocation>> {
        self.location.clone()
    }
}

impl FeatureCache for LocationInfoCache {
    fn name(&self) -> &'static str {
        "location info cache"
    }
}
