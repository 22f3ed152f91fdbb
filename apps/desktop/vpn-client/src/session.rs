//! Service session: connect, drive the container, reconnect on loss.
//!
//! Every (re)connection builds a fresh [`ServiceConnectionContainer`]; nothing
//! carries over between connections. Reconnect attempts are spaced by an
//! exponential backoff that resets after each successful connection.

use crate::error::VpnClientError;

use vpn_client_core::cache::{ConnectionProxy, VpnPermission};
use vpn_client_core::config::{ClientConfig, ReconnectConfig};
use vpn_client_core::container::{DriveOutcome, ServiceConnectionContainer};
use vpn_client_core::ipc::Connection;
use vpn_client_core::transport::WebSocketChannel;

use common::ErrorLocation;

use std::panic::Location;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::ExponentialBackoffBuilder;
use backoff::backoff::Backoff;
use log::{error, info, warn};
use tokio::sync::watch;

/// Backoff policy for reconnect attempts. A `max_elapsed_secs` of zero never
/// gives up.
pub fn reconnect_policy(reconnect: &ReconnectConfig) -> ExponentialBackoff {
    let max_elapsed = (reconnect.max_elapsed_secs > 0)
        .then(|| Duration::from_secs(reconnect.max_elapsed_secs));

    ExponentialBackoffBuilder::new()
        .with_initial_interval(Duration::from_millis(reconnect.initial_interval_ms))
        .with_max_interval(Duration::from_millis(reconnect.max_interval_ms))
        .with_max_elapsed_time(max_elapsed)
        .build()
}

/// Run sessions until `shutdown` is set.
///
/// # Errors
///
/// Returns [`VpnClientError::Connect`] once the backoff policy gives up.
pub async fn run(
    config: &ClientConfig,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), VpnClientError> {
    let url = config.daemon.ipc_url.as_str();
    let mut policy = reconnect_policy(&config.reconnect);

    loop {
        if *shutdown.borrow() {
            return Ok(());
        }

        let (channel, inbound) = match WebSocketChannel::connect(url).await {
            Ok(connected) => connected,
            Err(connect_error) => {
                let Some(delay) = policy.next_backoff() else {
                    return Err(VpnClientError::Connect {
                        message: format!("Giving up on {url}: {connect_error}"),
                        location: ErrorLocation::from(Location::caller()),
                    });
                };

                warn!("Service unreachable ({connect_error}), retrying in {delay:?}");
                if wait_or_shutdown(delay, &mut shutdown).await {
                    return Ok(());
                }
                continue;
            }
        };
        policy.reset();

        let container = ServiceConnectionContainer::new(
            Connection::new(channel),
            |container: &ServiceConnectionContainer| match container.listener_id() {
                Some(id) => info!("Service ready, listener {id}"),
                None => warn!("Service ready without a listener id"),
            },
            || info!("VPN permission requested"),
        );
        spawn_tunnel_logger(container.connection_proxy().clone());
        spawn_permission_granter(container.vpn_permission().clone());

        match container.drive(inbound, shutdown.clone()).await {
            DriveOutcome::Shutdown => return Ok(()),
            DriveOutcome::ChannelClosed => warn!("Lost connection to service, reconnecting"),
        }
    }
}

/// Sleep for `delay`. Returns `true` if shutdown was requested meanwhile.
async fn wait_or_shutdown(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(delay) => false,
        changed = shutdown.changed() => changed.is_err() || *shutdown.borrow(),
    }
}

/// Log tunnel transitions until the container goes away.
fn spawn_tunnel_logger(proxy: ConnectionProxy) {
    let mut updates = proxy.subscribe();

    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            match state.error_cause.as_deref() {
                Some(cause) => warn!("Tunnel {:?}: {cause}", state.kind()),
                None => info!("Tunnel {:?}", state.kind()),
            }
        }
    });
}

/// The desktop service creates its own interface, so requests are granted
/// as they arrive.
fn spawn_permission_granter(permission: VpnPermission) {
    let mut pending = permission.subscribe();

    tokio::spawn(async move {
        while pending.changed().await.is_ok() {
            if !*pending.borrow_and_update() {
                continue;
            }
            if let Err(grant_error) = permission.grant(true) {
                error!("Failed to answer VPN permission request: {grant_error}");
            }
        }
    });
}
