//! Error handling for the PCS Publink client

use pcssoap::TransportError;
use thiserror::Error;

/// Result alias for pcsclient
pub type Result<T> = std::result::Result<T, PcsError>;

/// Business failure reported by the service (`Status` = `Failed`)
///
/// The message is already sentence-cased.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors raised by the status clients
#[derive(Error, Debug)]
pub enum PcsError {
    /// Connection, HTTP, SOAP fault or malformed envelope
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response does not have the shape the operation expects
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// The service answered with a failed status
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Missing or invalid client configuration
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

impl PcsError {
    pub fn unexpected_shape(reason: impl Into<String>) -> Self {
        Self::UnexpectedShape(reason.into())
    }

    pub fn is_service_error(&self) -> bool {
        matches!(self, PcsError::Service(_))
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, PcsError::Transport(_))
    }

    /// Message of a service failure, if this is one
    pub fn service_message(&self) -> Option<&str> {
        match self {
            PcsError::Service(err) => Some(&err.message),
            _ => None,
        }
    }
}
