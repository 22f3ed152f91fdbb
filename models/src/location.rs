/// Geographic location of the exit IP, as resolved by the service.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GeoIpLocation {
    #[prost(string, optional, tag = "1")]
    pub ipv4: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub ipv6: Option<String>,
    #[prost(string, tag = "3")]
    pub country: String,
    #[prost(string, optional, tag = "4")]
    pub city: Option<String>,
    #[prost(double, tag = "5")]
    pub latitude: f64,
    #[prost(double, tag = "6")]
    pub longitude: f64,
    #[prost(string, optional, tag = "7")]
    pub hostname: Option<String>,
}

/// Relay selection constraint: a country, optionally narrowed to a city and a host.
///
/// Build validated instances with [`RelayLocationBuilder`](crate::RelayLocationBuilder).
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct LocationConstraint {
    #[prost(string, tag = "1")]
    pub country: String,
    #[prost(string, optional, tag = "2")]
    pub city: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub hostname: Option<String>,
}
