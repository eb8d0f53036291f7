//! SOAP Faults

use crate::SOAP_ENV_NS;
use std::fmt;
use xmltree::{Element, XMLNode};

/// Erreur SOAP (Fault) renvoyée par le service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    /// Code d'erreur (ex: "soap:Client", "soap:Server")
    pub fault_code: String,

    /// Description de l'erreur
    pub fault_string: String,

    /// Texte du bloc `detail`, s'il existe
    pub detail: Option<String>,
}

impl SoapFault {
    /// Crée un fault SOAP simple
    pub fn new(fault_code: impl Into<String>, fault_string: impl Into<String>) -> Self {
        Self {
            fault_code: fault_code.into(),
            fault_string: fault_string.into(),
            detail: None,
        }
    }

    /// Extrait un fault du corps SOAP s'il en contient un
    ///
    /// Reconnaît la forme SOAP 1.1 (`faultcode`/`faultstring`) et la forme
    /// SOAP 1.2 (`Code/Value`, `Reason/Text`).
    pub fn from_body(body: &Element) -> Option<Self> {
        let fault = find_child(body, "Fault")?;

        let fault_code = find_child(fault, "faultcode")
            .or_else(|| find_child(fault, "Code").and_then(|c| find_child(c, "Value")))
            .map(element_text)
            .unwrap_or_default();

        let fault_string = find_child(fault, "faultstring")
            .or_else(|| find_child(fault, "Reason").and_then(|r| find_child(r, "Text")))
            .map(element_text)
            .unwrap_or_default();

        let detail = find_child(fault, "detail")
            .or_else(|| find_child(fault, "Detail"))
            .map(element_text)
            .filter(|d| !d.is_empty());

        Some(Self {
            fault_code,
            fault_string,
            detail,
        })
    }
}

impl fmt::Display for SoapFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.fault_code, self.fault_string)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

fn find_child<'a>(parent: &'a Element, suffix: &str) -> Option<&'a Element> {
    parent.children.iter().find_map(|node| match node {
        XMLNode::Element(elem) if elem.name.ends_with(suffix) => Some(elem),
        _ => None,
    })
}

/// Texte concaténé de l'élément et de ses descendants
fn element_text(elem: &Element) -> String {
    fn collect(elem: &Element, out: &mut String) {
        for child in &elem.children {
            match child {
                XMLNode::Text(t) | XMLNode::CData(t) => out.push_str(t),
                XMLNode::Element(e) => collect(e, out),
                _ => {}
            }
        }
    }

    let mut out = String::new();
    collect(elem, &mut out);
    out.trim().to_string()
}

/// Construit un SOAP Fault 1.1 complet
///
/// # Arguments
///
/// * `fault_code` - Code du fault (ex: "soap:Client")
/// * `fault_string` - Message d'erreur
/// * `detail` - Détail optionnel
pub fn build_soap_fault(
    fault_code: &str,
    fault_string: &str,
    detail: Option<&str>,
) -> Result<String, xmltree::Error> {
    let mut fault = Element::new("soap:Fault");

    let mut faultcode_elem = Element::new("faultcode");
    faultcode_elem
        .children
        .push(XMLNode::Text(fault_code.to_string()));
    fault.children.push(XMLNode::Element(faultcode_elem));

    let mut faultstring_elem = Element::new("faultstring");
    faultstring_elem
        .children
        .push(XMLNode::Text(fault_string.to_string()));
    fault.children.push(XMLNode::Element(faultstring_elem));

    if let Some(detail) = detail {
        let mut detail_elem = Element::new("detail");
        detail_elem.children.push(XMLNode::Text(detail.to_string()));
        fault.children.push(XMLNode::Element(detail_elem));
    }

    let mut body = Element::new("soap:Body");
    body.children.push(XMLNode::Element(fault));

    let mut envelope = Element::new("soap:Envelope");
    envelope
        .attributes
        .insert("xmlns:soap".to_string(), SOAP_ENV_NS.to_string());
    envelope.children.push(XMLNode::Element(body));

    let mut buf = Vec::new();
    let config = xmltree::EmitterConfig::new()
        .perform_indent(true)
        .indent_string("  ");
    envelope.write_with_config(&mut buf, config)?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}
