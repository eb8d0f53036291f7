//! Publisher credentials and authentication headers

use indexmap::IndexMap;
use pcssoap::AuthHeader;
use std::fmt;

/// Header key carrying the publisher code
pub const PUBCODE_KEY: &str = "PubCode";
/// Header key carrying the publisher password
pub const PASSWORD_KEY: &str = "Password";

/// Publisher identity sent with every call
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    publisher_code: String,
    password: String,
}

impl Credentials {
    pub fn new(publisher_code: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            publisher_code: publisher_code.into(),
            password: password.into(),
        }
    }

    pub fn publisher_code(&self) -> &str {
        &self.publisher_code
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("publisher_code", &self.publisher_code)
            .field("password", &"***")
            .finish()
    }
}

/// Builds the named authentication headers of an endpoint
///
/// Credentials are merged first and call arguments second. A call argument
/// reusing a credential key replaces its value in place.
#[derive(Debug, Clone)]
pub struct AuthHeaderBuilder {
    credentials: Credentials,
    namespace: String,
}

impl AuthHeaderBuilder {
    pub fn new(credentials: Credentials, namespace: impl Into<String>) -> Self {
        Self {
            credentials,
            namespace: namespace.into(),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn build(&self, header_name: &str, call_args: &[(&str, &str)]) -> AuthHeader {
        let mut args = IndexMap::with_capacity(2 + call_args.len());
        args.insert(
            PUBCODE_KEY.to_string(),
            self.credentials.publisher_code.clone(),
        );
        args.insert(PASSWORD_KEY.to_string(), self.credentials.password.clone());

        for (key, value) in call_args {
            args.insert((*key).to_string(), (*value).to_string());
        }

        AuthHeader::new(self.namespace.clone(), header_name, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> AuthHeaderBuilder {
        AuthHeaderBuilder::new(Credentials::new("PUB", "secret"), "urn:pcs")
    }

    #[test]
    fn test_credentials_come_first() {
        let header = builder().build(
            "ProfileAuthenticationHeader",
            &[("UserName", "a@b.com"), ("UserPassword", "pw")],
        );

        assert_eq!(header.name, "ProfileAuthenticationHeader");
        assert_eq!(header.namespace, "urn:pcs");
        assert_eq!(
            header.args.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["PubCode", "Password", "UserName", "UserPassword"]
        );
        assert_eq!(header.arg("PubCode"), Some("PUB"));
        assert_eq!(header.arg("UserPassword"), Some("pw"));
    }

    #[test]
    fn test_empty_call_args() {
        let header = builder().build("EmailAuthenticationHeader", &[]);
        assert_eq!(header.args.len(), 2);
        assert_eq!(header.arg("Password"), Some("secret"));
    }

    #[test]
    fn test_call_args_win_on_collision() {
        let header = builder().build("EmailAuthenticationHeader", &[("PubCode", "OTHER")]);
        assert_eq!(header.args.len(), 2);
        assert_eq!(header.arg("PubCode"), Some("OTHER"));
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let header = builder().build("svc7CustInetAuthHeader", &[("Whatever", "x")]);
        assert_eq!(header.arg("Whatever"), Some("x"));
    }

    #[test]
    fn test_debug_hides_password() {
        let debug = format!("{:?}", Credentials::new("PUB", "secret"));
        assert!(debug.contains("PUB"));
        assert!(!debug.contains("secret"));
    }
}
