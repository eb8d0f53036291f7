//! # pcssoap - SOAP 1.1 pour les services PCS Publink
//!
//! Cette crate implémente la couche SOAP utilisée par `pcsclient` : construction
//! des requêtes avec en-tête d'authentification, décodage des réponses et des
//! faults, et transport HTTP bloquant.
//!
//! ## Architecture
//!
//! - [`AuthHeader`] : en-tête SOAP nommé portant les credentials et les arguments
//! - [`RawEnvelope`] : champs de l'élément `<Operation>Response` d'une réponse
//! - [`SoapFault`] : erreur SOAP renvoyée par le service
//! - [`SoapTransport`] : point d'extension pour émettre une opération distante
//! - [`HttpSoapTransport`] : implémentation HTTP basée sur `ureq`
//!
//! ## Example
//!
//! ```no_run
//! use indexmap::IndexMap;
//! use pcssoap::{AuthHeader, HttpSoapTransport, SoapTransport};
//!
//! let url = "https://subscribe.pcspublink.com/WSStatus_v1_1_7/WSStatus_v1_1_7.asmx";
//! let transport = HttpSoapTransport::new(url);
//!
//! let mut args = IndexMap::new();
//! args.insert("PubCode".to_string(), "PUB".to_string());
//! args.insert("Password".to_string(), "secret".to_string());
//! args.insert("EmailAddr".to_string(), "a@b.com".to_string());
//! let header = AuthHeader::new(url, "EmailAuthenticationHeader", args);
//!
//! let envelope = transport.invoke("GetCustomerNumbersFromEmail", &header)?;
//! println!("{:?}", envelope.field("GetCustomerNumbersFromEmailResult"));
//! # Ok::<(), pcssoap::TransportError>(())
//! ```

mod builder;
mod envelope;
mod fault;
mod parser;
mod transport;

pub use builder::build_soap_request;
pub use envelope::{AuthHeader, RawEnvelope, SoapBody, SoapEnvelope};
pub use fault::{SoapFault, build_soap_fault};
pub use parser::{SoapParseError, parse_soap_envelope, parse_soap_response};
pub use transport::{HttpSoapTransport, SoapTransport, TransportError};

/// Namespace de l'enveloppe SOAP 1.1
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
