use crate::location::LocationConstraint;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Relay {
    #[prost(string, tag = "1")]
    pub hostname: String,
    #[prost(bool, tag = "2")]
    pub active: bool,
    #[prost(bool, tag = "3")]
    pub owned: bool,
    #[prost(string, tag = "4")]
    pub provider: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RelayCity {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub code: String,
    #[prost(double, tag = "3")]
    pub latitude: f64,
    #[prost(double, tag = "4")]
    pub longitude: f64,
    #[prost(message, repeated, tag = "5")]
    pub relays: Vec<Relay>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RelayCountry {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub code: String,
    #[prost(message, repeated, tag = "3")]
    pub cities: Vec<RelayCity>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RelayList {
    #[prost(message, repeated, tag = "1")]
    pub countries: Vec<RelayCountry>,
}

impl RelayList {
    /// Whether at least one active relay satisfies the constraint.
    pub fn has_active_relay(&self, constraint: &LocationConstraint) -> bool {
        self.countries
            .iter()
            .filter(|country| country.code == constraint.country)
            .flat_map(|country| country.cities.iter())
            .filter(|city| constraint.city.as_ref().is_none_or(|code| &city.code == code))
            .flat_map(|city| city.relays.iter())
            .filter(|relay| {
                constraint
                    .hostname
                    .as_ref()
                    .is_none_or(|hostname| &relay.hostname == hostname)
            })
            .any(|relay| relay.active)
    }

    pub fn relay_count(&self) -> usize {
        self.countries
            .iter()
            .flat_map(|country| country.cities.iter())
            .map(|city| city.relays.len())
            .sum()
    }
}
