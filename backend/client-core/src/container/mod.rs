//! Service connection container.
//!
//! Owns the connection, the dispatcher, the listener registration and every
//! feature cache, and fixes the order they are created and destroyed in.
//!
//! # Lifecycle
//!
//! Creation: dispatcher, then the feature caches (settings before the caches
//! that read it), then the `ListenerReady` subscription, then
//! `RegisterListener` is sent.
//!
//! When the service answers with `ListenerReady`, the caches are primed and
//! the ready callback runs once with the container.
//!
//! Teardown: `UnregisterListener` (only if an id was issued), dispatcher
//! teardown, ready signal abandoned, then each cache's `on_destroy` in
//! construction order. Every step runs even if an earlier one fails.

mod driver;
mod teardown;

pub use driver::DriveOutcome;
pub use teardown::{TeardownChain, TeardownReport};

use crate::cache::{
    AccountDataSource, AppVersionInfoCache, AuthTokenCache, ConnectionProxy, CustomDns,
    DeviceDataSource, FeatureCache, LocationInfoCache, RelayListListener, SettingsListener,
    SplitTunneling, VoucherRedeemer, VpnPermission, VpnPermissionCallback,
};
use crate::ipc::{
    Connection, DispatchingHandler, ListenerId, ListenerRegistration, ReadyCallback, ReadySignal,
    RegistrationState,
};

use log::{debug, info, warn};
use tokio::sync::oneshot;

/// Every feature cache, in construction order.
struct FeatureCaches {
    account: AccountDataSource,
    auth_token: AuthTokenCache,
    connection_proxy: ConnectionProxy,
    device: DeviceDataSource,
    location_info: LocationInfoCache,
    settings: SettingsListener,
    split_tunneling: SplitTunneling,
    voucher_redeemer: VoucherRedeemer,
    vpn_permission: VpnPermission,
    app_version: AppVersionInfoCache,
    custom_dns: CustomDns,
    relay_list: RelayListListener,
}

impl FeatureCaches {
    fn new(
        connection: &Connection,
        dispatcher: &mut DispatchingHandler,
        on_vpn_permission_request: VpnPermissionCallback,
    ) -> Self {
        let account = AccountDataSource::new(connection.downgrade(), dispatcher);
        let auth_token = AuthTokenCache::new(connection.downgrade(), dispatcher);
        let connection_proxy = ConnectionProxy::new(connection.downgrade(), dispatcher);
        let device = DeviceDataSource::new(connection.downgrade(), dispatcher);
        let location_info = LocationInfoCache::new(dispatcher);
        let settings = SettingsListener::new(connection.downgrade(), dispatcher);
        let split_tunneling = SplitTunneling::new(connection.downgrade(), dispatcher);
        let voucher_redeemer = VoucherRedeemer::new(connection.downgrade(), dispatcher);
        let vpn_permission =
            VpnPermission::new(connection.downgrade(), dispatcher, on_vpn_permission_request);
        let app_version = AppVersionInfoCache::new(dispatcher, &settings);
        let custom_dns = CustomDns::new(connection.downgrade(), settings.clone());
        let relay_list =
            RelayListListener::new(connection.downgrade(), dispatcher, settings.clone());

        Self {
            account,
            auth_token,
            connection_proxy,
            device,
            location_info,
            settings,
            split_tunneling,
            voucher_redeemer,
            vpn_permission,
            app_version,
            custom_dns,
            relay_list,
        }
    }

    fn in_order(&self) -> [&dyn FeatureCache; 12] {
        [
            &self.account,
            &self.auth_token,
            &self.connection_proxy,
            &self.device,
            &self.location_info,
            &self.settings,
            &self.split_tunneling,
            &self.voucher_redeemer,
            &self.vpn_permission,
            &self.app_version,
            &self.custom_dns,
            &self.relay_list,
        ]
    }

    fn in_order_mut(&mut self) -> [&mut dyn FeatureCache; 12] {
        [
            &mut self.account,
            &mut self.auth_token,
            &mut self.connection_proxy,
            &mut self.device,
            &mut self.location_info,
            &mut self.settings,
            &mut self.split_tunneling,
            &mut self.voucher_redeemer,
            &mut self.vpn_permission,
            &mut self.app_version,
            &mut self.custom_dns,
            &mut self.relay_list,
        ]
    }

    fn prime_all(&self) {
        for cache in self.in_order() {
            if let Err(prime_error) = cache.prime() {
                warn!("Failed to prime {}: {prime_error}", cache.name());
            }
        }
    }
}

pub struct ServiceConnectionContainer {
    connection: Connection,
    dispatcher: DispatchingHandler,
    registration: ListenerRegistration,
    ready: ReadySignal<ServiceConnectionContainer>,
    caches: FeatureCaches,
    torn_down: bool,
}

impl ServiceConnectionContainer {
    /// Build every component and send `RegisterListener`.
    ///
    /// `on_service_ready` runs exactly once, on the dispatch context, when the
    /// service acknowledges the registration. It never runs if the container
    /// is torn down first.
    pub fn new<R, P>(connection: Connection, on_service_ready: R, on_vpn_permission_request: P) -> Self
    where
        R: FnOnce(&ServiceConnectionContainer) + Send + 'static,
        P: FnMut() + Send + 'static,
    {
        let mut dispatcher = DispatchingHandler::new();
        let caches = FeatureCaches::new(
            &connection,
            &mut dispatcher,
            Box::new(on_vpn_permission_request),
        );
        let mut registration = ListenerRegistration::new(&mut dispatcher);
        let ready: ReadySignal<ServiceConnectionContainer> =
            ReadySignal::new(Box::new(on_service_ready) as ReadyCallback<_>);

        registration.register(&connection);

        Self {
            connection,
            dispatcher,
            registration,
            ready,
            caches,
            torn_down: false,
        }
    }

    /// Deliver one inbound payload. Ignored after teardown.
    pub fn dispatch(&mut self, raw: &[u8]) {
        if self.torn_down {
            debug!("Container torn down, dropping {} byte payload", raw.len());
            return;
        }

        self.dispatcher.dispatch(raw);

        if let Some(id) = self.registration.poll_ready() {
            self.caches.prime_all();

            if let Some(callback) = self.ready.settle(id) {
                info!("Service ready, listener {id}");
                callback(&*self);
            }
        }
    }

    /// Resolves with the listener id once the service is ready. Closed
    /// without a value if the container is torn down first.
    pub fn wait_ready(&mut self) -> oneshot::Receiver<ListenerId> {
        self.ready.waiter()
    }

    pub fn listener_id(&self) -> Option<ListenerId> {
        self.registration.listener_id()
    }

    pub fn registration_state(&self) -> RegistrationState {
        self.registration.state()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Tear everything down in order. Idempotent; also run on drop.
    pub fn on_destroy(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        let connection = &self.connection;
        let registration = &mut self.registration;
        let dispatcher = &mut self.dispatcher;
        let ready = &mut self.ready;

        let mut chain = TeardownChain::new()
            .then("unregister listener", move || {
                registration.unregister(connection);
                Ok(())
            })
            .then("dispatcher", move || {
                dispatcher.teardown();
                Ok(())
            })
            .then("ready signal", move || {
                ready.abandon();
                Ok(())
            });

        for cache in self.caches.in_order_mut() {
            chain = chain.then(cache.name(), move || cache.on_destroy());
        }

        let report = chain.run();
        if report.is_clean() {
            info!("Service connection torn down");
        } else {
            warn!(
                "Service connection torn down with {} failed step(s)",
                report.failed.len()
            );
        }
    }

    pub fn account(&self) -> &AccountDataSource {
        &self.caches.account
    }

    pub fn auth_token(&self) -> &AuthTokenCache {
        &self.caches.auth_token
    }

    pub fn connection_proxy(&self) -> &ConnectionProxy {
        &self.caches.connection_proxy
    }

    pub fn device(&self) -> &DeviceDataSource {
        &self.caches.device
    }

    pub fn location_info(&self) -> &LocationInfoCache {
        &self.caches.location_info
    }

    pub fn settings(&self) -> &SettingsListener {
        &self.caches.settings
    }

    pub fn split_tunneling(&self) -> &SplitTunneling {
        &self.caches.split_tunneling
    }

    pub fn voucher_redeemer(&self) -> &VoucherRedeemer {
        &self.caches.voucher_redeemer
    }

    pub fn vpn_permission(&self) -> &VpnPermission {
        &self.caches.vpn_permission
    }

    pub fn app_version(&self) -> &AppVersionInfoCache {
        &self.caches.app_version
    }

    pub fn custom_dns(&self) -> &CustomDns {
        &self.caches.custom_dns
    }

    pub fn relay_list(&self) -> &RelayListListener {
        &self.caches.relay_list
    }
}

impl Drop for ServiceConnectionContainer {
    fn drop(&mut self) {
        self.on_destroy();
    }
}
