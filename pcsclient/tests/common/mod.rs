//! In-memory transport shared by the integration tests

use pcsclient::{AuthHeader, RawEnvelope, SoapTransport, TransportError};
use std::cell::RefCell;
use std::collections::HashMap;

pub const URL: &str = "https://status.test/WSStatus.asmx";

/// Answers each operation with a canned `<Operation>Result` and records the
/// calls it receives.
#[derive(Default)]
pub struct StubTransport {
    results: HashMap<String, String>,
    raw: HashMap<String, RawEnvelope>,
    calls: RefCell<Vec<(String, AuthHeader)>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned XML result for `operation`
    pub fn with_result(mut self, operation: &str, xml: &str) -> Self {
        self.results.insert(operation.to_string(), xml.to_string());
        self
    }

    /// Canned envelope for `operation`, used as is
    pub fn with_envelope(mut self, operation: &str, envelope: RawEnvelope) -> Self {
        self.raw.insert(operation.to_string(), envelope);
        self
    }

    pub fn calls(&self) -> Vec<(String, AuthHeader)> {
        self.calls.borrow().clone()
    }

    pub fn operations(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(op, _)| op.clone()).collect()
    }
}

impl SoapTransport for StubTransport {
    fn invoke(&self, operation: &str, header: &AuthHeader) -> Result<RawEnvelope, TransportError> {
        self.calls
            .borrow_mut()
            .push((operation.to_string(), header.clone()));

        if let Some(envelope) = self.raw.get(operation) {
            return Ok(envelope.clone());
        }

        match self.results.get(operation) {
            Some(xml) => Ok(RawEnvelope::new(operation)
                .with_field(format!("{}Result", operation), xml.as_str())),
            None => Err(TransportError::Status {
                status: 500,
                body: format!("no stub for {}", operation),
            }),
        }
    }
}
