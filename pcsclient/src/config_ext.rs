//! Extension pour lire la configuration Publink depuis pcsconfig
//!
//! Ce module fournit le trait `PublinkConfigExt` qui ajoute à
//! `pcsconfig::Config` les accesseurs des credentials et des endpoints.
//!
//! ```yaml
//! publink:
//!   pubcode: PUB
//!   password: secret
//!   v1:
//!     url: https://subscribe.pcspublink.com/WSStatus_v1_1_7/WSStatus_v1_1_7.asmx
//!     namespace: http://tempuri.org/   # optionnel, défaut = url
//! ```

use crate::auth::Credentials;
use crate::endpoint::{ApiVersion, Endpoint};
use anyhow::{anyhow, Result};
use pcsconfig::Config;
use pcssoap::HttpSoapTransport;
use serde_yaml::Value;
use std::time::Duration;

/// Trait d'extension pour gérer la configuration Publink dans pcsconfig
///
/// # Exemple
///
/// ```rust,ignore
/// use pcsconfig::get_config;
/// use pcsclient::PublinkConfigExt;
///
/// let config = get_config();
/// let credentials = config.get_publink_credentials()?;
/// println!("Publisher: {}", credentials.publisher_code());
/// ```
pub trait PublinkConfigExt {
    /// Code éditeur (`publink.pubcode`)
    ///
    /// # Errors
    ///
    /// Retourne une erreur si le code n'est pas configuré
    fn get_publink_pubcode(&self) -> Result<String>;

    fn set_publink_pubcode(&self, pubcode: &str) -> Result<()>;

    /// Mot de passe éditeur (`publink.password`)
    fn get_publink_password(&self) -> Result<String>;

    fn set_publink_password(&self, password: &str) -> Result<()>;

    /// Credentials complets (code + mot de passe)
    fn get_publink_credentials(&self) -> Result<Credentials>;

    /// Endpoint configuré pour une génération d'API
    ///
    /// Utilise l'URL par défaut de la génération si `publink.<version>.url`
    /// est absent ou vide.
    fn get_publink_endpoint(&self, version: ApiVersion) -> Result<Endpoint>;

    /// Namespace SOAPAction optionnel (`publink.<version>.namespace`)
    fn get_publink_action_namespace(&self, version: ApiVersion) -> Result<Option<String>>;

    /// Transport HTTP pour `endpoint`, avec timeout et namespace configurés
    fn build_publink_transport(&self, endpoint: &Endpoint) -> Result<HttpSoapTransport>;
}

impl PublinkConfigExt for Config {
    fn get_publink_pubcode(&self) -> Result<String> {
        required_string(self, &["publink", "pubcode"])
    }

    fn set_publink_pubcode(&self, pubcode: &str) -> Result<()> {
        self.set_value(&["publink", "pubcode"], Value::String(pubcode.to_string()))
    }

    fn get_publink_password(&self) -> Result<String> {
        required_string(self, &["publink", "password"])
    }

    fn set_publink_password(&self, password: &str) -> Result<()> {
        self.set_value(&["publink", "password"], Value::String(password.to_string()))
    }

    fn get_publink_credentials(&self) -> Result<Credentials> {
        Ok(Credentials::new(
            self.get_publink_pubcode()?,
            self.get_publink_password()?,
        ))
    }

    fn get_publink_endpoint(&self, version: ApiVersion) -> Result<Endpoint> {
        let url = optional_string(self, &["publink", version.config_key(), "url"])?
            .unwrap_or_else(|| version.default_url().to_string());
        Ok(Endpoint::new(version, url))
    }

    fn get_publink_action_namespace(&self, version: ApiVersion) -> Result<Option<String>> {
        optional_string(self, &["publink", version.config_key(), "namespace"])
    }

    fn build_publink_transport(&self, endpoint: &Endpoint) -> Result<HttpSoapTransport> {
        let timeout = Duration::from_secs(self.get_http_timeout_secs()?);
        let mut transport = HttpSoapTransport::new(endpoint.url()).with_timeout(timeout);

        if let Some(namespace) = self.get_publink_action_namespace(endpoint.version())? {
            transport = transport.with_action_namespace(namespace);
        }

        Ok(transport)
    }
}

fn required_string(config: &Config, path: &[&str]) -> Result<String> {
    optional_string(config, path)?
        .ok_or_else(|| anyhow!("{} is not configured", path.join(".")))
}

fn optional_string(config: &Config, path: &[&str]) -> Result<Option<String>> {
    match config.get_value(path) {
        Ok(Value::Null) | Err(_) => Ok(None),
        Ok(_) => {
            let value = config.get_string(path)?;
            Ok(Some(value).filter(|v| !v.trim().is_empty()))
        }
    }
}
