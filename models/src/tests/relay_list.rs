use crate::{LocationConstraint, Relay, RelayCity, RelayCountry, RelayList};

fn relay_list() -> RelayList {
    RelayList {
        countries: vec![RelayCountry {
            name: String::from("Sweden"),
            code: String::from("se"),
            cities: vec![RelayCity {
                name: String::from("Gothenburg"),
                code: String::from("got"),
                latitude: 57.7,
                longitude: 11.97,
                relays: vec![
                    Relay {
                        hostname: String::from("se-got-wg-001"),
                        active: false,
                        owned: true,
                        provider: String::from("31173"),
                    },
                    Relay {
                        hostname: String::from("se-got-wg-002"),
                        active: true,
                        owned: true,
                        provider: String::from("31173"),
                    },
                ],
            }],
        }],
    }
}

/// **VALUE**: Verifies relay lookup honours every level of the constraint.
///
/// **WHY THIS MATTERS**: The relay list cache uses this to flag a selected location that has
/// no active relay, which otherwise surfaces only as an endless "connecting" state.
///
/// **BUG THIS CATCHES**: Would catch if the hostname or city filter is ignored.
#[test]
fn given_relay_list_when_matching_constraints_then_only_active_relays_count() {
    // GIVEN: One inactive and one active relay in Gothenburg
    let list = relay_list();

    // WHEN/THEN: Country and city match through the active relay
    let city = LocationConstraint {
        country: String::from("se"),
        city: Some(String::from("got")),
        hostname: None,
    };
    assert!(list.has_active_relay(&city));

    // WHEN/THEN: Pinning the inactive host finds nothing
    let inactive_host = LocationConstraint {
        hostname: Some(String::from("se-got-wg-001")),
        ..city.clone()
    };
    assert!(!list.has_active_relay(&inactive_host));

    // WHEN/THEN: Unknown country finds nothing
    let elsewhere = LocationConstraint {
        country: String::from("no"),
        city: None,
        hostname: None,
    };
    assert!(!list.has_active_relay(&elsewhere));
    assert_eq!(list.relay_count(), 2);
}
