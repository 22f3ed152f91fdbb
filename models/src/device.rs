#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum DeviceStateKind {
    Unknown = 0,
    LoggedIn = 1,
    LoggedOut = 2,
    Revoked = 3,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct Device {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    /// RFC 3339 creation timestamp.
    #[prost(string, tag = "3")]
    pub created: String,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct DeviceState {
    #[prost(enumeration = "DeviceStateKind", tag = "1")]
    pub kind: i32,
    /// Present only when logged in.
    #[prost(message, optional, tag = "2")]
    pub device: Option<Device>,
}

impl DeviceState {
    pub fn logged_in(device: Device) -> Self {
        Self {
            kind: DeviceStateKind::LoggedIn as i32,
            device: Some(device),
        }
    }

    pub fn logged_out() -> Self {
        Self {
            kind: DeviceStateKind::LoggedOut as i32,
            device: None,
        }
    }

    pub fn revoked() -> Self {
        Self {
            kind: DeviceStateKind::Revoked as i32,
            device: None,
        }
    }
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct DeviceList {
    #[prost(message, repeated, tag = "1")]
    pub devices: Vec<Device>,
}

/// Outcome of a device removal: the removed id and the devices left on the account.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct RemovedDevice {
    #[prost(string, tag = "1")]
    pub device_id: String,
    #[prost(message, repeated, tag = "2")]
    pub remaining: Vec<Device>,
}
