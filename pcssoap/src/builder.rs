//! Construction des requêtes SOAP

use crate::{AuthHeader, SOAP_ENV_NS};
use xmltree::{Element, XMLNode};

fn text_element(name: &str, text: &str) -> Element {
    let mut elem = Element::new(name);
    elem.children.push(XMLNode::Text(text.to_string()));
    elem
}

fn header_element(header: &AuthHeader) -> Element {
    let mut elem = Element::new(&header.name);
    elem.attributes
        .insert("xmlns".to_string(), header.namespace.clone());

    for (key, value) in &header.args {
        elem.children
            .push(XMLNode::Element(text_element(key, value)));
    }

    elem
}

/// Construit une requête SOAP 1.1 avec en-tête d'authentification
///
/// Le corps ne contient que l'élément vide de l'opération : toutes les
/// données de l'appel voyagent dans l'en-tête.
///
/// # Arguments
///
/// * `namespace` - Namespace de l'opération
/// * `operation` - Nom de l'opération (ex: "GetIssuesFromProfile")
/// * `header` - En-tête d'authentification
pub fn build_soap_request(
    namespace: &str,
    operation: &str,
    header: &AuthHeader,
) -> Result<String, xmltree::Error> {
    let mut soap_header = Element::new("soap:Header");
    soap_header
        .children
        .push(XMLNode::Element(header_element(header)));

    let mut operation_elem = Element::new(operation);
    operation_elem
        .attributes
        .insert("xmlns".to_string(), namespace.to_string());

    let mut body = Element::new("soap:Body");
    body.children.push(XMLNode::Element(operation_elem));

    let mut envelope = Element::new("soap:Envelope");
    envelope
        .attributes
        .insert("xmlns:soap".to_string(), SOAP_ENV_NS.to_string());
    envelope.children.push(XMLNode::Element(soap_header));
    envelope.children.push(XMLNode::Element(body));

    let mut buf = Vec::new();
    let config = xmltree::EmitterConfig::new()
        .write_document_declaration(true)
        .perform_indent(true)
        .indent_string("  ");
    envelope.write_with_config(&mut buf, config)?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}
