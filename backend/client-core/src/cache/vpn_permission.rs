use crate::cache::FeatureCache;
use crate::error::ipc::IpcError;
use crate::ipc::{DispatchingHandler, Event, EventKind, Request, WeakConnection};

use std::sync::{Arc, Weak};

use log::{debug, info};
use tokio::sync::watch;

/// Invoked on the dispatch context whenever the service asks for permission
/// to create the VPN interface.
pub type VpnPermissionCallback = Box<dyn FnMut() + Send>;

/// Pending VPN permission requests.
///
/// The pending flag's sender is owned by the dispatcher handler; handles keep
/// only a weak reference, so subscribers see the channel close at dispatcher
/// teardown.
#[derive(Clone)]
pub struct VpnPermission {
    connection: WeakConnection,
    pending_tx: Weak<watch::Sender<bool>>,
    pending: watch::Receiver<bool>,
}

impl VpnPermission {
    pub fn new(
        connection: WeakConnection,
        dispatcher: &mut DispatchingHandler,
        mut on_request: VpnPermissionCallback,
    ) -> Self {
        let pending_tx = Arc::new(watch::Sender::new(false));
        let pending = pending_tx.subscribe();

        let weak_tx = Arc::downgrade(&pending_tx);
        dispatcher.register_handler(EventKind::VpnPermissionRequest, move |event| {
            if matches!(event, Event::VpnPermissionRequest) {
                info!("Service requested VPN permission");
                pending_tx.send_replace(true);
                on_request();
            }
        });

        Self {
            connection,
            pending_tx: weak_tx,
            pending,
        }
    }

    /// Whether a request is waiting for [`grant`](Self::grant).
    pub fn is_pending(&self) -> bool {
        *self.pending.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.pending.clone()
    }

    /// Answer the outstanding request. Does nothing if none is pending.
    pub fn grant(&self, granted: bool) -> Result<(), IpcError> {
        if !self.is_pending() {
            debug!("No VPN permission request pending, not responding");
            return Ok(());
        }

        self.connection.send(Request::VpnPermissionResponse(granted))?;
        if let Some(pending_tx) = self.pending_tx.upgrade() {
            pending_tx.send_replace(false);
        }
        Ok(())
    }
}

impl FeatureCache for VpnPermission {
    fn name(&self) -> &'static str {
        "vpn permission"
    }
}
