//! V1 status client (WSStatus 1.1.7)
//!
//! Failures are explicit: responses carry `Status` (`Success` or `Failed`)
//! and an `errMsg`, which is surfaced as a sentence-cased [`ServiceError`].

use crate::auth::{AuthHeaderBuilder, Credentials};
use crate::config_ext::PublinkConfigExt;
use crate::endpoint::{
    ApiVersion, AUTHENTICATE_OPERATION, EMAIL_AUTH_HEADER, Endpoint, PROFILE_AUTH_HEADER,
};
use crate::error::{PcsError, Result, ServiceError};
use crate::gateway::SoapGateway;
use crate::normalize::{Node, error_message, resolve_customer_numbers};
use pcsconfig::{Config, try_get_config};
use pcssoap::{HttpSoapTransport, SoapTransport};
use tracing::{debug, info, warn};

const STATUS_SUCCESS: &str = "Success";
const STATUS_FAILED: &str = "Failed";

/// Client for the current generation of the status service
pub struct StatusClient<T = HttpSoapTransport> {
    endpoint: Endpoint,
    headers: AuthHeaderBuilder,
    gateway: SoapGateway<T>,
}

impl StatusClient<HttpSoapTransport> {
    /// Client on the default V1 URL
    pub fn new(publisher_code: &str, password: &str) -> Self {
        let endpoint = Endpoint::v1();
        let transport = HttpSoapTransport::new(endpoint.url());
        Self::with_transport(
            Credentials::new(publisher_code, password),
            endpoint.url(),
            transport,
        )
    }

    /// Client built from the global configuration
    pub fn from_config() -> Result<Self> {
        Self::from_config_with(&*try_get_config()?)
    }

    /// Client built from the `publink` section of `config`
    pub fn from_config_with(config: &Config) -> Result<Self> {
        let credentials = config.get_publink_credentials()?;
        let endpoint = config.get_publink_endpoint(ApiVersion::V1)?;
        let transport = config.build_publink_transport(&endpoint)?;

        info!(url = %endpoint.url(), "Using V1 status endpoint");
        Ok(Self::with_transport(credentials, endpoint.url(), transport))
    }
}

impl<T: SoapTransport> StatusClient<T> {
    /// Client over any transport; `url` is also the header namespace
    pub fn with_transport(credentials: Credentials, url: impl Into<String>, transport: T) -> Self {
        let endpoint = Endpoint::new(ApiVersion::V1, url);
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

    /// Whether the subscriber's login is accepted
    ///
    /// A service failure reads as `false`; transport and shape errors still
    /// propagate.
    pub fn is_user_active(&self, email: &str, password: &str) -> Result<bool> {
        match self.authenticate_user(email, password) {
            Ok(response) => {
                Ok(response.get("Status").and_then(Node::as_str) == Some(STATUS_SUCCESS))
            }
            Err(PcsError::Service(err)) => {
                debug!(email, reason = %err, "User is not active");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Authenticates a subscriber and returns the full profile response
    ///
    /// # Errors
    ///
    /// * `PcsError::Service` - the service answered `Status` = `Failed`
    pub fn authenticate_user(&self, email: &str, password: &str) -> Result<Node> {
        let header = self.headers.build(
            PROFILE_AUTH_HEADER,
            &[("UserName", email), ("UserPassword", password)],
        );

        let response = self
            .gateway
            .call_normalized(AUTHENTICATE_OPERATION, &header)?;
        ensure_success(&response)?;

        Ok(response)
    }

    /// First customer number attached to `email`
    pub fn get_customer_number(&self, email: &str) -> Result<String> {
        let numbers = self.get_customer_numbers(email)?;
        if numbers.len() > 1 {
            debug!(email, count = numbers.len(), "Several customer numbers, using the first");
        }

        numbers
            .into_iter()
            .next()
            .ok_or_else(|| PcsError::unexpected_shape("empty customer number list"))
    }

    /// Every customer number attached to `email`, in service order
    pub fn get_customer_numbers(&self, email: &str) -> Result<Vec<String>> {
        let header = self
            .headers
            .build(EMAIL_AUTH_HEADER, &[("EmailAddr", email)]);

        let response = self
            .gateway
            .call_normalized(ApiVersion::V1.customer_numbers_operation(), &header)?;
        ensure_success(&response)?;

        resolve_customer_numbers(&response)
    }

    /// Account info of the first customer number attached to `email`
    pub fn get_user_info_from_email(&self, email: &str) -> Result<Node> {
        let customer_number = self.get_customer_number(email)?;
        self.get_user_info_from_customer_number(&customer_number)
    }

    /// Status and customer info for a customer number
    pub fn get_user_info_from_customer_number(&self, customer_number: &str) -> Result<Node> {
        let header = self.headers.build(
            ApiVersion::V1.customer_info_header(),
            &[("CustomerInetNumber", customer_number)],
        );

        self.gateway
            .call_normalized(ApiVersion::V1.customer_info_operation(), &header)
    }
}

fn ensure_success(response: &Node) -> Result<()> {
    if response.get("Status").and_then(Node::as_str) == Some(STATUS_FAILED) {
        let message = error_message(response);
        warn!(%message, "Service reported a failure");
        return Err(ServiceError::new(message).into());
    }
    Ok(())
}
