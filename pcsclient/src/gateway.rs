use crate::error::{PcsError, Result};
use crate::normalize::{Node, normalize};
use pcssoap::{AuthHeader, SoapTransport};
use tracing::debug;

/// Issues one remote operation and pulls its `<Operation>Result` payload.
#[derive(Debug, Clone)]
pub struct SoapGateway<T> {
    transport: T,
}

impl<T: SoapTransport> SoapGateway<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Raw XML result of `operation`.
    ///
    /// Transport failures propagate untouched. A response lacking the result
    /// field is an [`PcsError::UnexpectedShape`].
    pub fn call(&self, operation: &str, header: &AuthHeader) -> Result<String> {
        debug!(
            operation,
            header = %header.name,
            args = ?header.args.keys().collect::<Vec<_>>(),
            "Calling remote operation"
        );

        let envelope = self.transport.invoke(operation, header)?;

        let result_field = format!("{}Result", operation);
        envelope
            .field(&result_field)
            .map(str::to_string)
            .ok_or_else(|| {
                PcsError::unexpected_shape(format!("response has no {} field", result_field))
            })
    }

    /// [`Self::call`] followed by [`normalize`].
    pub fn call_normalized(&self, operation: &str, header: &AuthHeader) -> Result<Node> {
        let raw = self.call(operation, header)?;
        normalize(&raw)
    }
}
