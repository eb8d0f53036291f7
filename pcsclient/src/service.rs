use crate::auth::Credentials;
use crate::client::StatusClient;
use crate::endpoint::{ApiVersion, Endpoint};
use crate::error::Result;
use crate::legacy::LegacyStatusClient;
use crate::normalize::Node;
use pcsconfig::try_get_config;
use pcssoap::{HttpSoapTransport, SoapTransport};

/// Operations shared by both API generations
///
/// Each implementation applies its own failure policy: V1 raises service
/// errors, V2 answers with sentinel values.
pub trait SubscriptionStatus {
    fn api_version(&self) -> ApiVersion;

    fn is_user_active(&self, email: &str, password: &str) -> Result<bool>;

    /// Customer number attached to `email` (V2 answers `"0"` when none)
    fn customer_number(&self, email: &str) -> Result<String>;

    fn user_info_by_customer_number(&self, customer_number: &str) -> Result<Node>;

    fn user_info_by_email(&self, email: &str) -> Result<Node> {
        let customer_number = self.customer_number(email)?;
        self.user_info_by_customer_number(&customer_number)
    }
}

impl<T: SoapTransport> SubscriptionStatus for StatusClient<T> {
    fn api_version(&self) -> ApiVersion {
        ApiVersion::V1
    }

    fn is_user_active(&self, email: &str, password: &str) -> Result<bool> {
        StatusClient::is_user_active(self, email, password)
    }

    fn customer_number(&self, email: &str) -> Result<String> {
        self.get_customer_number(email)
    }

    fn user_info_by_customer_number(&self, customer_number: &str) -> Result<Node> {
        self.get_user_info_from_customer_number(customer_number)
    }
}

impl<T: SoapTransport> SubscriptionStatus for LegacyStatusClient<T> {
    fn api_version(&self) -> ApiVersion {
        ApiVersion::V2
    }

    fn is_user_active(&self, email: &str, password: &str) -> Result<bool> {
        LegacyStatusClient::is_user_active(self, email, password)
    }

    fn customer_number(&self, email: &str) -> Result<String> {
        self.get_customer_number(email)
    }

    fn user_info_by_customer_number(&self, customer_number: &str) -> Result<Node> {
        self.get_user_info_from_customer_number(customer_number)
    }
}

/// HTTP-backed client for `endpoint`, whichever generation it is
pub fn connect(credentials: Credentials, endpoint: &Endpoint) -> Box<dyn SubscriptionStatus> {
    let transport = HttpSoapTransport::new(endpoint.url());
    match endpoint.version() {
        ApiVersion::V1 => Box::new(StatusClient::with_transport(
            credentials,
            endpoint.url(),
            transport,
        )),
        ApiVersion::V2 => Box::new(LegacyStatusClient::with_transport(
            credentials,
            endpoint.url(),
            transport,
        )),
    }
}

/// Client for `version` built from the global configuration
pub fn connect_from_config(version: ApiVersion) -> Result<Box<dyn SubscriptionStatus>> {
    let config = try_get_config()?;
    Ok(match version {
        ApiVersion::V1 => Box::new(StatusClient::from_config_with(&config)?),
        ApiVersion::V2 => Box::new(LegacyStatusClient::from_config_with(&config)?),
    })
}
