use crate::{ModelError, RelayLocationBuilder};

/// **VALUE**: Verifies that a full country/city/hostname constraint builds.
///
/// **WHY THIS MATTERS**: Location selection sends the constraint to the service as-is; the
/// builder is the only place a malformed constraint can be caught before it is sent.
///
/// **BUG THIS CATCHES**: Would catch if valid fields are dropped or reordered during build.
#[test]
fn given_country_city_hostname_when_building_then_returns_constraint() {
    // GIVEN: A fully specified location
    let builder = RelayLocationBuilder::default()
        .with_country("se")
        .with_city("got")
        .with_hostname("se-got-wg-001");

    // WHEN: Building
    let constraint = builder.build().expect("valid constraint");

    // THEN: All levels are kept
    assert_eq!(constraint.country, "se");
    assert_eq!(constraint.city.as_deref(), Some("got"));
    assert_eq!(constraint.hostname.as_deref(), Some("se-got-wg-001"));
}

/// **VALUE**: Verifies that a constraint without a country is rejected.
///
/// **WHY THIS MATTERS**: The service interprets a blank country as "any location", which is
/// not what a user selecting a relay asked for.
///
/// **BUG THIS CATCHES**: Would catch if the required-field check is removed.
#[test]
fn given_missing_country_when_building_then_returns_validation_error() {
    // GIVEN: Builder without country
    let builder = RelayLocationBuilder::default().with_city("got");

    // WHEN: Building
    let result = builder.build();

    // THEN: Validation error names the missing field
    match result {
        Err(ModelError::Validation { message, .. }) => assert_eq!(message, "Country is required"),
        Ok(constraint) => panic!("Expected validation error, got {constraint:?}"),
    }
}

/// **VALUE**: Verifies that country codes must be two lowercase letters.
///
/// **WHY THIS MATTERS**: Relay lists key countries by ISO code; "SE" or "sweden" never
/// matches and the tunnel would fail to find a relay.
///
/// **BUG THIS CATCHES**: Would catch a loosened country code check.
#[test]
fn given_malformed_country_code_when_building_then_returns_validation_error() {
    for code in ["SE", "swe", "", "s1"] {
        // GIVEN: Builder with a malformed code
        let builder = RelayLocationBuilder::default().with_country(code);

        // WHEN: Building
        let result = builder.build();

        // THEN: Rejected
        assert!(result.is_err(), "Country code {code:?} should be rejected");
    }
}

/// **VALUE**: Verifies that a hostname without a city is rejected.
///
/// **WHY THIS MATTERS**: Constraints narrow strictly; a hostname constraint without its city
/// cannot be represented in the relay selector.
///
/// **BUG THIS CATCHES**: Would catch if the hierarchy check is removed.
#[test]
fn given_hostname_without_city_when_building_then_returns_validation_error() {
    // GIVEN: Country and hostname only
    let builder = RelayLocationBuilder::default()
        .with_country("se")
        .with_hostname("se-got-wg-001");

    // WHEN: Building
    let result = builder.build();

    // THEN: Validation error
    match result {
        Err(ModelError::Validation { message, .. }) => {
            assert!(message.contains("requires a city"), "Unexpected message: {message}")
        }
        Ok(constraint) => panic!("Expected validation error, got {constraint:?}"),
    }
}
