//! Structures de l'enveloppe SOAP

use indexmap::IndexMap;
use xmltree::Element;

/// Enveloppe SOAP décodée
#[derive(Debug, Clone)]
pub struct SoapEnvelope {
    /// Contenu XML brut de l'en-tête, s'il existe
    pub header: Option<Element>,

    /// Corps SOAP contenant la réponse ou le fault
    pub body: SoapBody,
}

/// Corps SOAP
#[derive(Debug, Clone)]
pub struct SoapBody {
    /// Contenu XML brut du corps
    pub content: Element,
}

/// En-tête d'authentification attaché à une opération
///
/// Les arguments sont émis dans l'ordre d'insertion, un élément enfant par
/// clé.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeader {
    /// Namespace de l'élément d'en-tête
    pub namespace: String,

    /// Nom de l'en-tête (ex: "ProfileAuthenticationHeader")
    pub name: String,

    /// Champs de l'en-tête
    pub args: IndexMap<String, String>,
}

impl AuthHeader {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        args: IndexMap<String, String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            args,
        }
    }

    /// Valeur d'un champ de l'en-tête
    pub fn arg(&self, key: &str) -> Option<&str> {
        self.args.get(key).map(String::as_str)
    }
}

/// Réponse d'une opération : les enfants de `<Operation>Response`
///
/// Chaque champ est conservé sous forme de texte. Un champ dont le contenu
/// est lui-même du XML est re-sérialisé en chaîne.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEnvelope {
    operation: String,
    fields: IndexMap<String, String>,
}

impl RawEnvelope {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            fields: IndexMap::new(),
        }
    }

    /// Ajoute un champ (builder)
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Nom de l'opération qui a produit cette réponse
    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}
