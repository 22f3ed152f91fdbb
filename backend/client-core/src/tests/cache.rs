use crate::cache::{
    AccountDataSource, AppVersionInfoCache, AuthTokenCache, CustomDns, DeviceDataSource,
    FeatureCache, LocationInfoCache, RelayListListener, SettingsListener, VoucherRedeemer,
};
use crate::error::ipc::IpcError;
use crate::ipc::{DispatchingHandler, Event, Request};
use crate::tests::helpers::RecordingChannel;

use common::RedactedSecret;
use models::{
    AppVersionInfo, Device, DeviceList, DeviceState, DeviceStateKind, DnsOptions, DnsState, GeoIpLocation, LocationConstraint,
    Relay, RelayCity, RelayCountry, RelayList, RelaySettings, RemovedDevice, Settings,
    TunnelEndpoint, TunnelOptions, TunnelState, VoucherStatus, VoucherSubmissionResult,
};

use std::net::IpAddr;

fn device(id: &str) -> Device {
    Device {
        id: id.to_string(),
        name: format!("device {id}"),
        created: String::from("2024-01-01T00:00:00Z"),
    }
}

fn location(country: &str) -> GeoIpLocation {
    GeoIpLocation {
        country: country.to_string(),
        ..GeoIpLocation::default()
    }
}

/// **VALUE**: Verifies auth tokens settle waiters first-in, first-out and
/// skip waiters that gave up.
///
/// **WHY THIS MATTERS**: Tokens are single-use. Handing one to a caller that
/// already dropped its receiver would starve the next caller.
///
/// **BUG THIS CATCHES**: LIFO settlement, or stopping at a closed waiter.
#[test]
fn given_three_token_requests_with_one_abandoned_when_tokens_arrive_then_fifo_to_live_waiters() {
    // GIVEN: Three token requests, the first abandoned
    let channel = RecordingChannel::default();
    let connection = channel.connection();
    let mut dispatcher = DispatchingHandler::new();
    let cache = AuthTokenCache::new(connection.downgrade(), &mut dispatcher);
    let abandoned = cache.fetch_auth_token().unwrap();
    let mut second = cache.fetch_auth_token().unwrap();
    let mut third = cache.fetch_auth_token().unwrap();
    drop(abandoned);

    // WHEN: Two tokens arrive
    dispatcher.dispatch_event(&Event::AuthToken(RedactedSecret::new("token-a")));
    dispatcher.dispatch_event(&Event::AuthToken(RedactedSecret::new("token-b")));

    // THEN: Live waiters got them in order; three requests were sent
    assert_eq!(second.try_recv().unwrap().expose(), "token-a");
    assert_eq!(third.try_recv().unwrap().expose(), "token-b");
    assert_eq!(cache.latest().map(|token| token.expose().to_string()), Some(String::from("token-b")));
    assert_eq!(channel.count(|request| *request == Request::FetchAuthToken), 3);
}

/// **VALUE**: Verifies destroying a cache closes pending waiters.
///
/// **WHY THIS MATTERS**: Callers awaiting a token must be released when the
/// connection goes away, not hang forever.
///
/// **BUG THIS CATCHES**: `on_destroy` leaving senders alive in the table.
#[test]
fn given_pending_token_request_when_cache_destroyed_then_waiter_closed() {
    // GIVEN: A pending token request
    let channel = RecordingChannel::default();
    let connection = channel.connection();
    let mut dispatcher = DispatchingHandler::new();
    let mut cache = AuthTokenCache::new(connection.downgrade(), &mut dispatcher);
    let mut waiter = cache.fetch_auth_token().unwrap();

    // WHEN: The cache is destroyed
    cache.on_destroy().unwrap();

    // THEN: The waiter sees a closed channel
    assert_eq!(cache.pending_count(), 0);
    assert!(waiter.try_recv().is_err());
}

/// **VALUE**: Verifies a failed send does not leave a waiter behind.
///
/// **WHY THIS MATTERS**: The next token would otherwise be routed to the
/// failed request instead of a live one.
///
/// **BUG THIS CATCHES**: Waiter pushed but never cleaned up on send error.
#[test]
fn given_failing_channel_when_fetching_token_then_error_and_no_pending() {
    // GIVEN: A channel refusing every payload
    let channel = RecordingChannel::failing();
    let connection = channel.connection();
    let mut dispatcher = DispatchingHandler::new();
    let cache = AuthTokenCache::new(connection.downgrade(), &mut dispatcher);

    // WHEN: Requesting a token
    let result = cache.fetch_auth_token();

    // THEN: Send error, nothing pending
    assert!(matches!(result, Err(IpcError::Send { .. })));
    assert_eq!(cache.pending_count(), 0);
}

/// **VALUE**: Verifies cache sends fail cleanly once the connection is gone.
///
/// **WHY THIS MATTERS**: UI code may keep a cache handle after the container
/// was destroyed. Using it must report an error, not panic.
///
/// **BUG THIS CATCHES**: Caches holding a strong reference to the channel.
#[test]
fn given_dropped_connection_when_cache_sends_then_disconnected_error() {
    // GIVEN: A cache whose connection was dropped
    let channel = RecordingChannel::default();
    let connection = channel.connection();
    let mut dispatcher = DispatchingHandler::new();
    let account = AccountDataSource::new(connection.downgrade(), &mut dispatcher);
    drop(connection);

    // WHEN: Logging in
    let result = account.login(RedactedSecret::new("1234123412341234"));

    // THEN: Disconnected error and nothing recorded
    assert!(matches!(result, Err(IpcError::Disconnected { .. })));
    assert!(channel.requests().is_empty());
}

/// **VALUE**: Verifies voucher results are matched to submissions by code.
///
/// **WHY THIS MATTERS**: Two vouchers can be in flight. Showing the result of
/// one for the other would misreport added time.
///
/// **BUG THIS CATCHES**: Settling the oldest waiter regardless of code.
#[test]
fn given_two_vouchers_when_second_result_arrives_then_only_second_settled() {
    // GIVEN: Two submitted vouchers
    let channel = RecordingChannel::default();
    let connection = channel.connection();
    let mut dispatcher = DispatchingHandler::new();
    let redeemer = VoucherRedeemer::new(connection.downgrade(), &mut dispatcher);
    let mut first = redeemer.submit("AAAA").unwrap();
    let mut second = redeemer.submit("BBBB").unwrap();

    // WHEN: The result for the second voucher arrives
    let result = VoucherSubmissionResult {
        voucher: String::from("BBBB"),
        status: VoucherStatus::Ok as i32,
        seconds_added: 2_592_000,
        new_expiry: Some(String::from("2025-01-01T00:00:00Z")),
    };
    dispatcher.dispatch_event(&Event::VoucherSubmissionResult(result.clone()));

    // THEN: Only the second is settled
    assert_eq!(second.try_recv().unwrap(), result);
    assert!(first.try_recv().is_err());
    assert_eq!(redeemer.pending_count(), 1);
}

/// **VALUE**: Verifies a device removal also replaces the device list.
///
/// **WHY THIS MATTERS**: The device management screen reads the list; it must
/// not keep showing the removed device.
///
/// **BUG THIS CATCHES**: Removal only recorded, list left stale.
#[test]
fn given_device_list_when_removal_arrives_then_list_is_remaining_devices() {
    // GIVEN: A device list with two devices
    let mut dispatcher = DispatchingHandler::new();
    let channel = RecordingChannel::default();
    let connection = channel.connection();
    let cache = DeviceDataSource::new(connection.downgrade(), &mut dispatcher);
    dispatcher.dispatch_event(&Event::DeviceListUpdate(DeviceList {
        devices: vec![device("a"), device("b")],
    }));

    // WHEN: Device "a" is removed
    dispatcher.dispatch_event(&Event::DeviceRemoval(RemovedDevice {
        device_id: String::from("a"),
        remaining: vec![device("b")],
    }));

    // THEN: Only "b" remains and the removal is recorded
    assert_eq!(cache.device_list().unwrap().devices, vec![device("b")]);
    assert_eq!(cache.last_removal().unwrap().device_id, "a");
}

/// **VALUE**: Verifies each device state event replaces the cached state,
/// including revocation.
///
/// **WHY THIS MATTERS**: A revoked device must be shown as such immediately;
/// the login screen keys off this value.
///
/// **BUG THIS CATCHES**: Only logged-in states stored, or the revoked branch
/// returning before the state is published.
#[test]
fn given_logged_in_device_when_revoked_then_state_is_revoked() {
    // GIVEN: A logged-in device
    let mut dispatcher = DispatchingHandler::new();
    let channel = RecordingChannel::default();
    let connection = channel.connection();
    let cache = DeviceDataSource::new(connection.downgrade(), &mut dispatcher);
    dispatcher.dispatch_event(&Event::DeviceStateEvent(DeviceState::logged_in(device("a"))));
    let before = cache.device_state().unwrap().kind();

    // WHEN: The service revokes it
    dispatcher.dispatch_event(&Event::DeviceStateEvent(DeviceState::revoked()));

    // THEN: Latest state is revoked with no device
    let after = cache.device_state().unwrap();
    assert_eq!(before, DeviceStateKind::LoggedIn);
    assert_eq!(after.kind(), DeviceStateKind::Revoked);
    assert!(after.device.is_none());
}

/// **VALUE**: Verifies location is cleared while connecting and replaced when
/// connected.
///
/// **WHY THIS MATTERS**: Showing the old exit location while the tunnel
/// changes tells the user they are somewhere they are not.
///
/// **BUG THIS CATCHES**: Stale location kept through a reconnect.
#[test]
fn given_known_location_when_tunnel_reconnects_then_cleared_then_replaced() {
    // GIVEN: A known location
    let mut dispatcher = DispatchingHandler::new();
    let cache = LocationInfoCache::new(&mut dispatcher);
    dispatcher.dispatch_event(&Event::NewLocation(Some(location("se"))));

    // WHEN: Connecting, then connected in another country
    dispatcher.dispatch_event(&Event::TunnelStateChange(TunnelState::connecting(None, None)));
    let while_connecting = cache.current();
    dispatcher.dispatch_event(&Event::TunnelStateChange(TunnelState::connected(
        TunnelEndpoint::default(),
        Some(location("de")),
    )));

    // THEN: Unknown while connecting, new location after
    assert_eq!(while_connecting, None);
    assert_eq!(cache.current().map(|location| location.country), Some(String::from("de")));
}

/// **VALUE**: Verifies upgrade suggestions follow the beta preference.
///
/// **WHY THIS MATTERS**: Users who opted out of betas must only be offered
/// stable releases.
///
/// **BUG THIS CATCHES**: Ignoring `show_beta_releases` from settings.
#[test]
fn given_version_info_when_beta_preference_toggles_then_upgrade_follows() {
    // GIVEN: Version info with a beta and a stable upgrade, betas hidden
    let channel = RecordingChannel::default();
    let connection = channel.connection();
    let mut dispatcher = DispatchingHandler::new();
    let settings = SettingsListener::new(connection.downgrade(), &mut dispatcher);
    let cache = AppVersionInfoCache::new(&mut dispatcher, &settings);
    dispatcher.dispatch_event(&Event::CurrentVersion(String::from("2024.1")));
    dispatcher.dispatch_event(&Event::AppVersionInfo(AppVersionInfo {
        supported: true,
        suggested_upgrade: Some(String::from("2024.3-beta1")),
        latest_stable: Some(String::from("2024.2")),
    }));
    let stable = cache.current().upgrade_version().map(str::to_string);

    // WHEN: Betas are enabled in settings
    dispatcher.dispatch_event(&Event::SettingsUpdate(Settings {
        show_beta_releases: true,
        ..Settings::default()
    }));

    // THEN: The beta is offered instead
    assert_eq!(stable.as_deref(), Some("2024.2"));
    assert_eq!(cache.current().upgrade_version(), Some("2024.3-beta1"));
    assert!(cache.current().is_supported());
}

/// **VALUE**: Verifies custom DNS edits are sent as full option sets built
/// from the latest settings.
///
/// **WHY THIS MATTERS**: A partial update would wipe other servers.
///
/// **BUG THIS CATCHES**: Sending only the new address.
#[test]
fn given_custom_dns_server_when_adding_another_then_both_sent() {
    // GIVEN: Settings with one custom server
    let channel = RecordingChannel::default();
    let connection = channel.connection();
    let mut dispatcher = DispatchingHandler::new();
    let settings = SettingsListener::new(connection.downgrade(), &mut dispatcher);
    let dns = CustomDns::new(connection.downgrade(), settings.clone());
    let options = DnsOptions {
        state: DnsState::Custom as i32,
        default_options: None,
        custom_addresses: vec![String::from("10.0.0.1")],
    };
    dispatcher.dispatch_event(&Event::SettingsUpdate(Settings {
        tunnel_options: Some(TunnelOptions {
            dns_options: Some(options.clone()),
            ..TunnelOptions::default()
        }),
        ..Settings::default()
    }));
    let first: IpAddr = "10.0.0.1".parse().unwrap();
    let second: IpAddr = "10.0.0.2".parse().unwrap();

    // WHEN: Adding the existing server and a new one
    let duplicate = dns.add_server(first).unwrap();
    let added = dns.add_server(second).unwrap();

    // THEN: Only one request, carrying both servers
    assert!(dns.is_enabled());
    assert!(!duplicate);
    assert!(added);
    let expected = DnsOptions {
        custom_addresses: vec![String::from("10.0.0.1"), String::from("10.0.0.2")],
        ..options
    };
    assert_eq!(channel.requests(), vec![Request::SetDnsOptions(expected)]);
}

/// **VALUE**: Verifies the selected location is checked against the relay
/// list.
///
/// **WHY THIS MATTERS**: The UI warns when the chosen location has no active
/// relay.
///
/// **BUG THIS CATCHES**: Reading the selection from a stale copy of settings.
#[test]
fn given_selected_location_when_relay_list_arrives_then_availability_reflects_it() {
    // GIVEN: Settings selecting Sweden
    let channel = RecordingChannel::default();
    let connection = channel.connection();
    let mut dispatcher = DispatchingHandler::new();
    let settings = SettingsListener::new(connection.downgrade(), &mut dispatcher);
    let relays = RelayListListener::new(connection.downgrade(), &mut dispatcher, settings);
    dispatcher.dispatch_event(&Event::SettingsUpdate(Settings {
        relay_settings: Some(RelaySettings {
            location: Some(LocationConstraint {
                country: String::from("se"),
                city: None,
                hostname: None,
            }),
            wireguard_constraints: None,
        }),
        ..Settings::default()
    }));
    let before_list = relays.selected_location_available();

    // WHEN: A relay list with an active Swedish relay arrives
    dispatcher.dispatch_event(&Event::NewRelayList(RelayList {
        countries: vec![RelayCountry {
            name: String::from("Sweden"),
            code: String::from("se"),
            cities: vec![RelayCity {
                name: String::from("Gothenburg"),
                code: String::from("got"),
                latitude: 57.7,
                longitude: 11.9,
                relays: vec![Relay {
                    hostname: String::from("se-got-wg-001"),
                    active: true,
                    owned: true,
                    provider: String::from("provider"),
                }],
            }],
        }],
    }));

    // THEN: Unavailable before the list, available after
    assert!(!before_list);
    assert!(relays.selected_location_available());
    assert_eq!(relays.selected_location().unwrap().country, "se");
}
