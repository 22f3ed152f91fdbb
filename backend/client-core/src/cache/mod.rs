//! Feature caches.
//!
//! Each cache keeps the last observed value for one facet of service state.
//! It subscribes to the dispatcher when constructed, replaces its value from
//! inside the handler (no merging), and publishes through a
//! [`tokio::sync::watch`] channel so readers on any context see a consistent
//! snapshot.
//!
//! Caches are cheap `Clone` handles: a [`WeakConnection`](crate::ipc::WeakConnection)
//! for outbound requests plus watch receivers. The container owns the
//! connection; a cache that outlives it fails its sends with
//! [`IpcError::Disconnected`].

mod account;
mod app_version;
mod auth_token;
mod connection_proxy;
mod custom_dns;
mod device;
mod location_info;
mod relay_list;
mod settings;
mod split_tunneling;
mod voucher;
mod vpn_permission;

pub use account::AccountDataSource;
pub use app_version::{AppVersionInfoCache, AppVersionStatus};
pub use auth_token::AuthTokenCache;
pub use connection_proxy::ConnectionProxy;
pub use custom_dns::CustomDns;
pub use device::DeviceDataSource;
pub use location_info::LocationInfoCache;
pub use relay_list::RelayListListener;
pub use settings::SettingsListener;
pub use split_tunneling::SplitTunneling;
pub use voucher::VoucherRedeemer;
pub use vpn_permission::{VpnPermission, VpnPermissionCallback};

use crate::error::ipc::IpcError;
use crate::ipc::{DispatchingHandler, Event, EventKind};

use common::ErrorLocation;

use std::panic::Location;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;

/// Lifecycle hooks the container drives on every cache.
pub trait FeatureCache {
    fn name(&self) -> &'static str;

    /// Request initial state once the listener is registered.
    fn prime(&self) -> Result<(), IpcError> {
        Ok(())
    }

    /// Release owned resources such as pending reply waiters.
    fn on_destroy(&mut self) -> Result<(), IpcError> {
        Ok(())
    }
}

/// Register a handler for `kind` that publishes whatever `extract` returns.
pub(crate) fn subscribe_latest<T, F>(
    dispatcher: &mut DispatchingHandler,
    kind: EventKind,
    initial: T,
    mut extract: F,
) -> watch::Receiver<T>
where
    T: Send + Sync + 'static,
    F: FnMut(&Event) -> Option<T> + Send + 'static,
{
    let (tx, rx) = watch::channel(initial);

    dispatcher.register_handler(kind, move |event| {
        if let Some(value) = extract(event) {
            tx.send_replace(value);
        }
    });

    rx
}

#[track_caller]
pub(crate) fn lock_pending<T>(pending: &Mutex<T>) -> Result<MutexGuard<'_, T>, IpcError> {
    pending.lock().map_err(|_| IpcError::Lock {
        message: String::from("Pending reply table poisoned"),
        location: ErrorLocation::from(Location::caller()),
    })
}
