//! Endpoint identities of the two API generations
//!
//! Header and operation names are part of the remote contract and must be
//! sent exactly as written here.

use std::fmt;

/// Default URL of the V1 service (WSStatus 1.1.7)
pub const V1_URL: &str = "https://subscribe.pcspublink.com/WSStatus_v1_1_7/WSStatus_v1_1_7.asmx";

/// Default URL of the V2 service (WSStatus 1.1.6)
pub const V2_URL: &str = "https://subscribe.pcspublink.com/WSStatus_v1_1_6/WSStatus_v1_1_6.asmx";

pub const PROFILE_AUTH_HEADER: &str = "ProfileAuthenticationHeader";
pub const EMAIL_AUTH_HEADER: &str = "EmailAuthenticationHeader";

pub const AUTHENTICATE_OPERATION: &str = "GetIssuesFromProfile";

/// API generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// WSStatus 1.1.7: explicit `Status`/`errMsg` failures
    V1,
    /// WSStatus 1.1.6: sentinel values, no error messages
    V2,
}

impl ApiVersion {
    pub fn default_url(self) -> &'static str {
        match self {
            ApiVersion::V1 => V1_URL,
            ApiVersion::V2 => V2_URL,
        }
    }

    /// Section name under `publink` in the configuration
    pub fn config_key(self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }

    /// Operation resolving customer number(s) from an email
    pub fn customer_numbers_operation(self) -> &'static str {
        match self {
            ApiVersion::V1 => "GetCustomerNumbersFromEmail",
            ApiVersion::V2 => "GetCustomerNumberFromEmail",
        }
    }

    /// Operation fetching account info by customer number
    pub fn customer_info_operation(self) -> &'static str {
        match self {
            ApiVersion::V1 => "GetStatusAndCustInfo",
            ApiVersion::V2 => "GetStatusExpDateIssRem",
        }
    }

    /// Header expected by [`Self::customer_info_operation`]
    pub fn customer_info_header(self) -> &'static str {
        match self {
            ApiVersion::V1 => "svc7CustInetAuthHeader",
            ApiVersion::V2 => "svc6CustInetAuthHeader",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

/// A service endpoint: API generation plus the URL it is reached at
///
/// The URL doubles as the target namespace of the authentication headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    version: ApiVersion,
    url: String,
}

impl Endpoint {
    pub fn new(version: ApiVersion, url: impl Into<String>) -> Self {
        Self {
            version,
            url: url.into(),
        }
    }

    pub fn v1() -> Self {
        Self::new(ApiVersion::V1, V1_URL)
    }

    pub fn v2() -> Self {
        Self::new(ApiVersion::V2, V2_URL)
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn wsdl_url(&self) -> String {
        format!("{}?WSDL", self.url)
    }
}
