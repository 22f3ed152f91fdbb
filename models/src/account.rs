//! Account and voucher results.

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct AccountExpiry {
    /// RFC 3339 expiry, `None` when unknown.
    #[prost(string, optional, tag = "1")]
    pub expiry: Option<String>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct AccountHistory {
    #[prost(string, optional, tag = "1")]
    pub account_number: Option<String>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct AccountCreationResult {
    /// `None` when the service failed to create an account.
    #[prost(string, optional, tag = "1")]
    pub account_number: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum LoginStatus {
    Ok = 0,
    InvalidAccount = 1,
    MaxDevicesReached = 2,
    RpcError = 3,
    OtherError = 4,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct LoginResult {
    #[prost(enumeration = "LoginStatus", tag = "1")]
    pub status: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum VoucherStatus {
    Ok = 0,
    InvalidVoucher = 1,
    VoucherAlreadyUsed = 2,
    RpcError = 3,
    OtherError = 4,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct VoucherSubmissionResult {
    #[prost(string, tag = "1")]
    pub voucher: String,
    #[prost(enumeration = "VoucherStatus", tag = "2")]
    pub status: i32,
    #[prost(uint64, tag = "3")]
    pub seconds_added: u64,
    #[prost(string, optional, tag = "4")]
    pub new_expiry: Option<String>,
}
