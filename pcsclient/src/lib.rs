//! # pcsclient - PCS Publink subscription-status client
//!
//! Client for the PCS Publink `WSStatus` SOAP service: authenticate a
//! subscriber, resolve the customer numbers attached to an email, and fetch
//! the account info of a customer.
//!
//! ## Overview
//!
//! Two generations of the service are supported:
//!
//! - [`StatusClient`] (V1, WSStatus 1.1.7): failed calls carry
//!   `Status = Failed` and an `errMsg`, surfaced as [`PcsError::Service`]
//!   with a sentence-cased message.
//! - [`LegacyStatusClient`] (V2, WSStatus 1.1.6): no error messages;
//!   activity is the truth value of `Status` and a missing customer number
//!   reads as `0`.
//!
//! Both implement [`SubscriptionStatus`] for callers that do not care about
//! the generation.
//!
//! Every call follows the same pipeline:
//!
//! ```text
//! Credentials ─► AuthHeaderBuilder ─► SoapGateway ─► normalize ─► result / error
//!                                      (transport)
//! ```
//!
//! The result payload of each operation is an XML string which is decoded
//! into a [`Node`] tree. A repeated element decodes to a list and a single
//! one to a record; [`resolve_customer_numbers`] always returns a flat list.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pcsclient::StatusClient;
//!
//! let client = StatusClient::new("PUBCODE", "publisher-password");
//!
//! if client.is_user_active("reader@example.com", "reader-password")? {
//!     let numbers = client.get_customer_numbers("reader@example.com")?;
//!     let info = client.get_user_info_from_customer_number(&numbers[0])?;
//!     println!("{}", serde_json::to_string_pretty(&info).unwrap());
//! }
//! # Ok::<(), pcsclient::PcsError>(())
//! ```
//!
//! ### Configuration
//!
//! ```rust,no_run
//! use pcsclient::{ApiVersion, SubscriptionStatus, connect_from_config};
//!
//! // Reads publink.pubcode / publink.password / publink.v2.url from pcsconfig
//! let client = connect_from_config(ApiVersion::V2)?;
//! let number = client.customer_number("reader@example.com")?;
//! # Ok::<(), pcsclient::PcsError>(())
//! ```
//!
//! ## Errors
//!
//! ```rust,ignore
//! match client.authenticate_user(email, password) {
//!     Ok(profile) => println!("{:?}", profile.get("Issues")),
//!     Err(PcsError::Service(err)) => println!("Rejected: {}", err.message),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```
//!
//! Nothing is cached or retried; a timeout is the transport's business.

pub mod auth;
pub mod client;
pub mod config_ext;
pub mod endpoint;
pub mod error;
pub mod gateway;
pub mod legacy;
pub mod normalize;
pub mod service;

pub use auth::{AuthHeaderBuilder, Credentials};
pub use client::StatusClient;
pub use config_ext::PublinkConfigExt;
pub use endpoint::{ApiVersion, Endpoint};
pub use error::{PcsError, Result, ServiceError};
pub use gateway::SoapGateway;
pub use legacy::{LegacyStatusClient, NO_CUSTOMER_NUMBER};
pub use normalize::{Node, format_error_message, normalize, resolve_customer_numbers};
pub use service::{SubscriptionStatus, connect, connect_from_config};

/// Ré-exporte la couche SOAP
pub use pcssoap::{AuthHeader, HttpSoapTransport, RawEnvelope, SoapTransport, TransportError};
