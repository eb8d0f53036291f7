use crate::{
    AuthHeader, RawEnvelope, SoapFault, SoapParseError, build_soap_request, parse_soap_response,
};
use std::time::Duration;
use tracing::{debug, warn};
use ureq::Agent;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport-level failures: connection, HTTP, SOAP fault, malformed envelope.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("SOAP fault {0}")]
    Fault(SoapFault),

    #[error("Malformed SOAP envelope: {0}")]
    Envelope(#[from] SoapParseError),

    #[error("Failed to serialize SOAP XML: {0}")]
    Xml(#[from] xmltree::Error),
}

/// Issues a named remote operation carrying an authentication header.
///
/// Operations take no ordinary arguments: everything travels in the header.
pub trait SoapTransport {
    fn invoke(&self, operation: &str, header: &AuthHeader) -> Result<RawEnvelope, TransportError>;
}

impl<T: SoapTransport + ?Sized> SoapTransport for &T {
    fn invoke(&self, operation: &str, header: &AuthHeader) -> Result<RawEnvelope, TransportError> {
        (**self).invoke(operation, header)
    }
}

impl<T: SoapTransport + ?Sized> SoapTransport for Box<T> {
    fn invoke(&self, operation: &str, header: &AuthHeader) -> Result<RawEnvelope, TransportError> {
        (**self).invoke(operation, header)
    }
}

/// Blocking SOAP 1.1 over HTTP POST.
#[derive(Clone)]
pub struct HttpSoapTransport {
    endpoint_url: String,
    action_namespace: String,
    timeout: Duration,
    agent: Agent,
}

impl HttpSoapTransport {
    /// Transport bound to `endpoint_url`; the operation namespace defaults
    /// to the endpoint URL itself.
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        let endpoint_url = endpoint_url.into();
        Self {
            action_namespace: endpoint_url.clone(),
            endpoint_url,
            timeout: DEFAULT_TIMEOUT,
            agent: build_agent(DEFAULT_TIMEOUT),
        }
    }

    /// Overrides the namespace used for the operation element and the
    /// `SOAPAction` header.
    pub fn with_action_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.action_namespace = namespace.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.agent = build_agent(timeout);
        self
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    pub fn action_namespace(&self) -> &str {
        &self.action_namespace
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Quoted `SOAPAction` header value: `"namespace/Operation"`.
    pub fn soap_action(&self, operation: &str) -> String {
        format!(
            r#""{}/{}""#,
            self.action_namespace.trim_end_matches('/'),
            operation
        )
    }
}

impl std::fmt::Debug for HttpSoapTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSoapTransport")
            .field("endpoint_url", &self.endpoint_url)
            .field("action_namespace", &self.action_namespace)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// 4xx/5xx must not be turned into errors: SOAP faults come back as HTTP 500
// and their body still has to be read.
fn build_agent(timeout: Duration) -> Agent {
    let config = Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(timeout))
        .build();

    config.into()
}

impl SoapTransport for HttpSoapTransport {
    fn invoke(&self, operation: &str, header: &AuthHeader) -> Result<RawEnvelope, TransportError> {
        let body_xml = build_soap_request(&self.action_namespace, operation, header)?;
        let soap_action = self.soap_action(operation);

        debug!(
            url = %self.endpoint_url,
            operation,
            header = %header.name,
            "Sending SOAP request"
        );

        let mut response = self
            .agent
            .post(&self.endpoint_url)
            .header("Content-Type", r#"text/xml; charset="utf-8""#)
            .header("SOAPAction", &soap_action)
            .send(body_xml)?;

        let status = response.status();
        let raw_body = response.body_mut().read_to_string()?;

        debug!(
            operation,
            status = status.as_u16(),
            bytes = raw_body.len(),
            "SOAP response received"
        );

        match parse_soap_response(&raw_body, operation) {
            Ok(envelope) if status.is_success() => Ok(envelope),
            Err(TransportError::Fault(fault)) => {
                warn!(operation, %fault, "SOAP fault returned by service");
                Err(TransportError::Fault(fault))
            }
            Err(err) if status.is_success() => Err(err),
            _ => {
                warn!(operation, status = status.as_u16(), "SOAP call failed");
                Err(TransportError::Status {
                    status: status.as_u16(),
                    body: raw_body,
                })
            }
        }
    }
}
