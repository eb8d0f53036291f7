//! Client calls over HTTP against a local mock server

use mockito::Matcher;
use pcsclient::{
    Credentials, HttpSoapTransport, LegacyStatusClient, PcsError, StatusClient, TransportError,
};

fn envelope(operation: &str, escaped_result: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <{op}Response xmlns="http://tempuri.org/">
      <{op}Result>{result}</{op}Result>
    </{op}Response>
  </soap:Body>
</soap:Envelope>"#,
        op = operation,
        result = escaped_result
    )
}

#[test]
fn test_v1_customer_numbers_over_http() {
    let mut server = mockito::Server::new();
    let url = format!("{}/WSStatus_v1_1_7.asmx", server.url());

    let mock = server
        .mock("POST", "/WSStatus_v1_1_7.asmx")
        .match_header("soapaction", Matcher::Regex("GetCustomerNumbersFromEmail".to_string()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("<PubCode>PUB</PubCode>".to_string()),
            Matcher::Regex("<EmailAddr>reader@example.com</EmailAddr>".to_string()),
        ]))
        .with_status(200)
        .with_body(envelope(
            "GetCustomerNumbersFromEmail",
            "&lt;Response&gt;&lt;CustomerNumbers&gt;\
             &lt;Customer&gt;&lt;CustomerNumber&gt;1&lt;/CustomerNumber&gt;&lt;/Customer&gt;\
             &lt;Customer&gt;&lt;CustomerNumber&gt;2&lt;/CustomerNumber&gt;&lt;/Customer&gt;\
             &lt;/CustomerNumbers&gt;&lt;/Response&gt;",
        ))
        .create();

    let transport =
        HttpSoapTransport::new(url.as_str()).with_action_namespace("http://tempuri.org/");
    let client =
        StatusClient::with_transport(Credentials::new("PUB", "secret"), url.as_str(), transport);

    let numbers = client.get_customer_numbers("reader@example.com").unwrap();

    mock.assert();
    assert_eq!(numbers, vec!["1", "2"]);
}

#[test]
fn test_v2_status_over_http() {
    let mut server = mockito::Server::new();
    let url = format!("{}/WSStatus_v1_1_6.asmx", server.url());

    let _mock = server
        .mock("POST", "/WSStatus_v1_1_6.asmx")
        .match_body(Matcher::Regex("<ProfileAuthenticationHeader".to_string()))
        .with_status(200)
        .with_body(envelope(
            "GetIssuesFromProfile",
            "&lt;Response&gt;&lt;Status&gt;1&lt;/Status&gt;&lt;/Response&gt;",
        ))
        .create();

    let transport = HttpSoapTransport::new(url.as_str());
    let client = LegacyStatusClient::with_transport(
        Credentials::new("PUB", "secret"),
        url.as_str(),
        transport,
    );

    assert!(client.is_user_active("reader@example.com", "pw").unwrap());
}

#[test]
fn test_http_failure_is_not_demoted() {
    let mut server = mockito::Server::new();
    let url = format!("{}/WSStatus.asmx", server.url());

    let _mock = server
        .mock("POST", "/WSStatus.asmx")
        .with_status(503)
        .with_body("Service Unavailable")
        .create();

    let client = StatusClient::with_transport(
        Credentials::new("PUB", "secret"),
        url.as_str(),
        HttpSoapTransport::new(url.as_str()),
    );

    let err = client.is_user_active("reader@example.com", "pw").unwrap_err();
    assert!(matches!(
        err,
        PcsError::Transport(TransportError::Status { status: 503, .. })
    ));
}
