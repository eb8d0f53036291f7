//! Parser des réponses SOAP

use crate::{RawEnvelope, SoapBody, SoapEnvelope, SoapFault, TransportError};
use std::io::BufReader;
use xmltree::{Element, XMLNode};

/// Erreur de parsing SOAP
#[derive(Debug, thiserror::Error)]
pub enum SoapParseError {
    #[error("XML parse error: {0}")]
    XmlError(#[from] xmltree::ParseError),

    #[error("Missing SOAP Envelope")]
    MissingEnvelope,

    #[error("Missing SOAP Body")]
    MissingBody,

    #[error("No {0} element found in SOAP Body")]
    MissingResponse(String),
}

/// Parse une enveloppe SOAP complète
pub fn parse_soap_envelope(xml: &[u8]) -> Result<SoapEnvelope, SoapParseError> {
    let reader = BufReader::new(xml);
    let root = Element::parse(reader)?;

    if !root.name.ends_with("Envelope") {
        return Err(SoapParseError::MissingEnvelope);
    }

    let header = child_elements(&root)
        .find(|e| e.name.ends_with("Header"))
        .cloned();

    let body_elem = child_elements(&root)
        .find(|e| e.name.ends_with("Body"))
        .ok_or(SoapParseError::MissingBody)?;

    Ok(SoapEnvelope {
        header,
        body: SoapBody {
            content: body_elem.clone(),
        },
    })
}

/// Décode la réponse d'une opération
///
/// Un `Fault` présent dans le corps devient [`TransportError::Fault`].
/// Sinon, chaque enfant de `<Operation>Response` devient un champ de
/// l'enveloppe.
pub fn parse_soap_response(xml: &str, operation: &str) -> Result<RawEnvelope, TransportError> {
    let envelope = parse_soap_envelope(xml.as_bytes())?;

    if let Some(fault) = SoapFault::from_body(&envelope.body.content) {
        return Err(TransportError::Fault(fault));
    }

    let response_name = format!("{}Response", operation);
    let response = child_elements(&envelope.body.content)
        .find(|e| e.name == response_name)
        .ok_or(SoapParseError::MissingResponse(response_name))?;

    let mut raw = RawEnvelope::new(operation);
    for field in child_elements(response) {
        raw.insert(field.name.clone(), field_value(field)?);
    }

    Ok(raw)
}

fn child_elements(parent: &Element) -> impl Iterator<Item = &Element> {
    parent.children.iter().filter_map(XMLNode::as_element)
}

/// Texte d'un champ, ou son contenu XML re-sérialisé
///
/// Tous les nœuds enfants sont conservés, dans l'ordre du document.
fn field_value(field: &Element) -> Result<String, TransportError> {
    if child_elements(field).next().is_none() {
        return Ok(field
            .get_text()
            .map(|t| t.into_owned())
            .unwrap_or_default());
    }

    let mut out = String::new();
    for node in &field.children {
        match node {
            XMLNode::Element(elem) => {
                let mut buf = Vec::new();
                let config = xmltree::EmitterConfig::new().write_document_declaration(false);
                elem.write_with_config(&mut buf, config)?;
                out.push_str(&String::from_utf8_lossy(&buf));
            }
            XMLNode::Text(text) => out.push_str(&escape_text(text)),
            XMLNode::CData(text) => {
                out.push_str("<![CDATA[");
                out.push_str(text);
                out.push_str("]]>");
            }
            _ => {}
        }
    }

    Ok(out)
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <GetIssuesFromProfileResponse xmlns="urn:pcs">
      <GetIssuesFromProfileResult>&lt;Response&gt;&lt;Status&gt;Success&lt;/Status&gt;&lt;/Response&gt;</GetIssuesFromProfileResult>
    </GetIssuesFromProfileResponse>
  </soap:Body>
</soap:Envelope>"#;

    #[test]
    fn test_parse_escaped_result() {
        let raw = parse_soap_response(RESPONSE, "GetIssuesFromProfile").unwrap();
        assert_eq!(raw.operation(), "GetIssuesFromProfile");
        assert_eq!(
            raw.field("GetIssuesFromProfileResult"),
            Some("<Response><Status>Success</Status></Response>")
        );
    }

    #[test]
    fn test_parse_inline_xml_result() {
        let xml = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <GetStatusAndCustInfoResponse xmlns="urn:pcs">
      <GetStatusAndCustInfoResult><Response><Status>Success</Status></Response></GetStatusAndCustInfoResult>
    </GetStatusAndCustInfoResponse>
  </soap:Body>
</soap:Envelope>"#;

        let raw = parse_soap_response(xml, "GetStatusAndCustInfo").unwrap();
        let result = raw.field("GetStatusAndCustInfoResult").unwrap();
        assert!(result.starts_with("<Response"));
        assert!(result.contains("Success</Status>"));
    }

    #[test]
    fn test_parse_inline_siblings_are_kept() {
        let xml = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <GetStatusAndCustInfoResponse>
      <GetStatusAndCustInfoResult><Status>Success</Status><CustInfo>x &amp; y</CustInfo></GetStatusAndCustInfoResult>
    </GetStatusAndCustInfoResponse>
  </soap:Body>
</soap:Envelope>"#;

        let raw = parse_soap_response(xml, "GetStatusAndCustInfo").unwrap();
        let result = raw.field("GetStatusAndCustInfoResult").unwrap();

        let status = result.find("Success</Status>").unwrap();
        let info = result.find("x &amp; y</CustInfo>").unwrap();
        assert!(result.starts_with("<Status"));
        assert!(status < info);
    }

    #[test]
    fn test_parse_empty_result() {
        let xml = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <GetIssuesFromProfileResponse xmlns="urn:pcs">
      <GetIssuesFromProfileResult />
    </GetIssuesFromProfileResponse>
  </soap:Body>
</soap:Envelope>"#;

        let raw = parse_soap_response(xml, "GetIssuesFromProfile").unwrap();
        assert_eq!(raw.field("GetIssuesFromProfileResult"), Some(""));
    }

    #[test]
    fn test_missing_response_element() {
        let xml = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body><SomethingElse/></soap:Body>
</soap:Envelope>"#;

        let err = parse_soap_response(xml, "GetIssuesFromProfile").unwrap_err();
        assert!(matches!(
            err,
            TransportError::Envelope(SoapParseError::MissingResponse(ref name))
                if name == "GetIssuesFromProfileResponse"
        ));
    }

    #[test]
    fn test_fault_is_reported() {
        let xml = crate::build_soap_fault("soap:Client", "Bad credentials", None).unwrap();
        let err = parse_soap_response(&xml, "GetIssuesFromProfile").unwrap_err();
        match err {
            TransportError::Fault(fault) => {
                assert_eq!(fault.fault_code, "soap:Client");
                assert_eq!(fault.fault_string, "Bad credentials");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_not_an_envelope() {
        let err = parse_soap_envelope(b"<html><body/></html>").unwrap_err();
        assert!(matches!(err, SoapParseError::MissingEnvelope));
    }

    #[test]
    fn test_missing_body() {
        let xml = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Header/>
</soap:Envelope>"#;
        let err = parse_soap_envelope(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, SoapParseError::MissingBody));
    }
}
