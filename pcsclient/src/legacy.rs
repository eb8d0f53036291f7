//! V2 status client (WSStatus 1.1.6)
//!
//! This generation never reports business failures as errors: activity is
//! the loose truth value of `Status`, and a missing customer number reads
//! as `0`.

use crate::auth::{AuthHeaderBuilder, Credentials};
use crate::config_ext::PublinkConfigExt;
use crate::endpoint::{
    ApiVersion, AUTHENTICATE_OPERATION, EMAIL_AUTH_HEADER, Endpoint, PROFILE_AUTH_HEADER,
};
use crate::error::Result;
use crate::gateway::SoapGateway;
use crate::normalize::Node;
use pcsconfig::{Config, try_get_config};
use pcssoap::{HttpSoapTransport, SoapTransport};
use tracing::{debug, info};

/// Customer number reported when the service has none
pub const NO_CUSTOMER_NUMBER: &str = "0";

/// Client for the legacy generation of the status service
pub struct LegacyStatusClient<T = HttpSoapTransport> {
    endpoint: Endpoint,
    headers: AuthHeaderBuilder,
    gateway: SoapGateway<T>,
}

impl LegacyStatusClient<HttpSoapTransport> {
    /// Client on the default V2 URL
    pub fn new(publisher_code: &str, password: &str) -> Self {
        let endpoint = Endpoint::v2();
        let transport = HttpSoapTransport::new(endpoint.url());
        Self::with_transport(
            Credentials::new(publisher_code, password),
            endpoint.url(),
            transport,
        )
    }

    pub fn from_config() -> Result<Self> {
        Self::from_config_with(&*try_get_config()?)
    }

    pub fn from_config_with(config: &Config) -> Result<Self> {
        let credentials = config.get_publink_credentials()?;
        let endpoint = config.get_publink_endpoint(ApiVersion::V2)?;
        let transport = config.build_publink_transport(&endpoint)?;

        info!(url = %endpoint.url(), "Using V2 status endpoint");
        Ok(Self::with_transport(credentials, endpoint.url(), transport))
    }
}

impl<T: SoapTransport> LegacyStatusClient<T> {
    pub fn with_transport(credentials: Credentials, url: impl Into<String>, transport: T) -> Self {
        let endpoint = Endpoint::new(ApiVersion::V2, url);
        Self {
            headers: AuthHeaderBuilder::new(credentials, endpoint.url()),
            gateway: SoapGateway::new(transport),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn gateway(&self) -> &SoapGateway<T> {
        &self.gateway
    }

    /// Truth value of the profile response's `Status`
    pub fn is_user_active(&self, email: &str, password: &str) -> Result<bool> {
        let header = self.headers.build(
            PROFILE_AUTH_HEADER,
            &[("UserName", email), ("UserPassword", password)],
        );

        let response = self
            .gateway
            .call_normalized(AUTHENTICATE_OPERATION, &header)?;

        Ok(response.get("Status").is_some_and(Node::is_truthy))
    }

    /// Customer number for `email`, or [`NO_CUSTOMER_NUMBER`]
    ///
    /// A numeric value is returned as sent (trimmed), leading zeros and
    /// length included.
    pub fn get_customer_number(&self, email: &str) -> Result<String> {
        let header = self
            .headers
            .build(EMAIL_AUTH_HEADER, &[("EmailAddr", email)]);

        let response = self
            .gateway
            .call_normalized(ApiVersion::V2.customer_numbers_operation(), &header)?;

        let number = response
            .get("CustomerNumber")
            .and_then(Node::as_str)
            .map(str::trim)
            .filter(|raw| is_numeric(raw));

        match number {
            Some(n) => Ok(n.to_string()),
            None => {
                debug!(email, "No numeric customer number in response");
                Ok(NO_CUSTOMER_NUMBER.to_string())
            }
        }
    }

    /// Account info for the customer number attached to `email`
    ///
    /// An email without customer number is looked up as number `0`.
    pub fn get_user_info_from_email(&self, email: &str) -> Result<Node> {
        let customer_number = self.get_customer_number(email)?;
        self.get_user_info_from_customer_number(&customer_number)
    }

    /// Status, expiration date and issues remaining for a customer number
    pub fn get_user_info_from_customer_number(&self, customer_number: &str) -> Result<Node> {
        let header = self.headers.build(
            ApiVersion::V2.customer_info_header(),
            &[("CustomerInetNumber", customer_number)],
        );

        self.gateway
            .call_normalized(ApiVersion::V2.customer_info_operation(), &header)
    }
}

/// Decimal number with optional sign, fraction and exponent (`12`, `-0.5`,
/// `1e3`). No length limit.
fn is_numeric(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (unsigned, None),
    };

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let mantissa_ok = !(int_part.is_empty() && frac_part.is_empty())
        && all_digits(int_part)
        && all_digits(frac_part);

    let exponent_ok = match exponent {
        None => true,
        Some(e) => {
            let digits = e.strip_prefix(['+', '-']).unwrap_or(e);
            !digits.is_empty() && all_digits(digits)
        }
    };

    mantissa_ok && exponent_ok
}
