/// Version information published by the service.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct AppVersionInfo {
    /// Whether the running version is still supported.
    #[prost(bool, tag = "1")]
    pub supported: bool,
    /// Version the user should upgrade to, if any (may be a beta).
    #[prost(string, optional, tag = "2")]
    pub suggested_upgrade: Option<String>,
    /// Latest stable release, used when beta releases are hidden.
    #[prost(string, optional, tag = "3")]
    pub latest_stable: Option<String>,
}
