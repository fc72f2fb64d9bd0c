use super::*;
use crate::schema::FieldMapping;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// What the scripted transport does on its next call
enum Step {
    Respond(TransportResponse),
    Hang,
    Fail(TransportError),
}

/// Transport that replays a fixed script and records every call
struct ScriptedTransport {
    script: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
    ) -> std::result::Result<TransportResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::Fail(error)) => Err(error),
            Some(Step::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => panic!("unexpected transport call to {url}"),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn config() -> ClientConfig {
    ClientConfig::new()
        .with_base_url("https://svc.test")
        .with_endpoints(["/a", "/b"])
        .with_timeout(Duration::from_millis(50))
}

fn orchestrator(transport: &Arc<ScriptedTransport>) -> RequestOrchestrator {
    RequestOrchestrator::with_transport(config(), transport.clone())
}

#[test]
fn test_default_config() {
    let config = ClientConfig::default();

    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.endpoints, vec!["/classify", "/classify/"]);
    assert_eq!(config.timeout, Duration::from_secs(15));
    assert_eq!(config.field_mapping, FieldMapping::v2());
}

#[test]
fn test_url_joining() {
    let config = ClientConfig::new().with_base_url("https://svc.test/");
    assert_eq!(config.url_for("/classify/"), "https://svc.test/classify/");
    assert_eq!(config.url_for("classify"), "https://svc.test/classify");
    assert_eq!(config.url_for(""), "https://svc.test");
}

#[tokio::test]
async fn test_blank_description_never_reaches_network() {
    let transport = ScriptedTransport::new(vec![]);
    let orchestrator = orchestrator(&transport);

    for description in ["", "   ", "\t\n"] {
        let err = orchestrator
            .submit(&ClassificationRequest::new(description))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    // A request built by hand, bypassing the trimming constructor
    let raw = ClassificationRequest {
        product_description: "  ".to_string(),
        country_of_origin: Some("CN".to_string()),
        declared_value: None,
    };
    assert!(matches!(
        orchestrator.submit(&raw).await,
        Err(Error::Validation(_))
    ));

    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_not_found_falls_back_to_next_endpoint() {
    let transport = ScriptedTransport::new(vec![
        Step::Respond(TransportResponse::new(404, r#"{"detail":"Not Found"}"#)),
        Step::Respond(TransportResponse::new(200, r#"{"hts_code":"0901.21.00"}"#)),
    ]);

    let result = orchestrator(&transport)
        .submit(&ClassificationRequest::new("Roasted coffee beans"))
        .await
        .unwrap();

    assert_eq!(result.hts_code, "0901.21.00");
    assert_eq!(result.product, "Roasted coffee beans");

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "https://svc.test/a");
    assert_eq!(calls[1].0, "https://svc.test/b");
}

#[tokio::test]
async fn test_timeout_stops_fallback() {
    let transport = ScriptedTransport::new(vec![
        Step::Hang,
        Step::Respond(TransportResponse::new(200, "{}")),
    ]);

    let err = orchestrator(&transport)
        .submit(&ClassificationRequest::new("Leather wallet"))
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert!(matches!(err, Error::Timeout(50)));
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_transport_timeout_is_a_timeout() {
    let transport = ScriptedTransport::new(vec![Step::Fail(TransportError::Timeout)]);

    let err = orchestrator(&transport)
        .submit(&ClassificationRequest::new("Leather wallet"))
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_network_failure_is_terminal() {
    let transport = ScriptedTransport::new(vec![Step::Fail(TransportError::Network(
        "connection refused".to_string(),
    ))]);

    let err = orchestrator(&transport)
        .submit(&ClassificationRequest::new("Leather wallet"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Network(ref m) if m == "connection refused"));
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_server_error_is_terminal_and_carries_detail() {
    let transport = ScriptedTransport::new(vec![Step::Respond(TransportResponse::new(
        500,
        r#"{"detail":"Expecting value: line 1 column 1 (char 0)"}"#,
    ))]);

    let err = orchestrator(&transport)
        .submit(&ClassificationRequest::new("Leather wallet"))
        .await
        .unwrap_err();

    match err {
        Error::Service { status, detail } => {
            assert_eq!(status, 500);
            assert_eq!(detail, "Expecting value: line 1 column 1 (char 0)");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_all_endpoints_not_found_surfaces_last_error() {
    let transport = ScriptedTransport::new(vec![
        Step::Respond(TransportResponse::new(404, "")),
        Step::Respond(TransportResponse::new(404, "no route /b")),
    ]);

    let err = orchestrator(&transport)
        .submit(&ClassificationRequest::new("Leather wallet"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("no route /b"));
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test]
async fn test_no_endpoints_is_generic_failure() {
    let transport = ScriptedTransport::new(vec![]);
    let orchestrator = RequestOrchestrator::with_transport(
        config().with_endpoints(Vec::<String>::new()),
        transport.clone(),
    );

    let err = orchestrator
        .submit(&ClassificationRequest::new("Leather wallet"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "network error: request failed");
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_non_object_success_body_is_protocol_error() {
    let transport = ScriptedTransport::new(vec![Step::Respond(TransportResponse::new(
        200,
        "Service warming up",
    ))]);

    let err = orchestrator(&transport)
        .submit(&ClassificationRequest::new("Leather wallet"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Protocol(ref m) if m.contains("text")));
}

#[tokio::test]
async fn test_string_encoded_body_is_accepted() {
    let body = serde_json::to_string(r#"{"hts_code":"6109.10.00","duty_rate":"16.5%"}"#).unwrap();
    let transport = ScriptedTransport::new(vec![Step::Respond(
        TransportResponse::new(200, body).with_content_type("text/plain"),
    )]);

    let result = orchestrator(&transport)
        .submit(&ClassificationRequest::new("Cotton t-shirt"))
        .await
        .unwrap();

    assert_eq!(result.hts_code, "6109.10.00");
    assert_eq!(result.duty_rate, "16.5%");
}

#[tokio::test]
async fn test_leather_wallet_scenario() {
    let transport = ScriptedTransport::new(vec![Step::Respond(
        TransportResponse::new(
            200,
            r#"{"hts_code":"4202.31.60","duty_rate":"8%","rationale":"Classified as wallet, leather, RFID-shielded"}"#,
        )
        .with_content_type("application/json"),
    )]);

    let request = ClassificationRequest::new("Leather wallet with RFID blocking").with_country("CN");
    let result = orchestrator(&transport).submit(&request).await.unwrap();

    assert_eq!(result.hts_code, "4202.31.60");
    assert_eq!(result.duty_rate, "8%");
    assert_eq!(result.rationale, "Classified as wallet, leather, RFID-shielded");
    assert_eq!(result.vat, "");
    assert!(result.warnings.is_empty());
    assert!(result.items.is_empty());

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].1,
        json!({
            "product_description": "Leather wallet with RFID blocking",
            "country_of_origin": "CN"
        })
    );
}

#[tokio::test]
async fn test_v1_mapping_payload() {
    let transport = ScriptedTransport::new(vec![Step::Respond(TransportResponse::new(200, "{}"))]);
    let orchestrator = RequestOrchestrator::with_transport(
        config().with_field_mapping(FieldMapping::v1()),
        transport.clone(),
    );

    orchestrator
        .submit(&ClassificationRequest::new("Ceramic mug").with_country("PT"))
        .await
        .unwrap();

    assert_eq!(transport.calls()[0].1, json!({"description": "Ceramic mug"}));
}
