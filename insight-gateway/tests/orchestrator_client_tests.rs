use std::time::Duration;

use insight_gateway::config::OrchestratorConfig;
use insight_gateway::errors::OrchestratorError;
use insight_gateway::orchestrator::OrchestratorClient;
use insight_models::TriggerRequest;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(url: &str) -> OrchestratorConfig {
    OrchestratorConfig {
        url: url.trim_end_matches('/').to_string(),
        namespace: "insight.bi".to_string(),
        flow_id: "business_intelligence_engine".to_string(),
        username: Some("admin".to_string()),
        password: Some("secret".to_string()),
        trigger_timeout: Duration::from_secs(5),
        status_timeout: Duration::from_secs(2),
    }
}

fn trigger_request() -> TriggerRequest {
    TriggerRequest {
        data_source_url: "https://example.com/sales.csv".to_string(),
        decision_threshold: Some(80),
        recipient_email: None,
    }
}

fn execution_body() -> serde_json::Value {
    serde_json::json!({
        "id": "exec-42",
        "namespace": "insight.bi",
        "flowId": "business_intelligence_engine",
        "state": {
            "current": "CREATED",
            "histories": [{"state": "CREATED", "date": "2025-06-01T10:00:00Z"}]
        }
    })
}

#[tokio::test]
async fn trigger_submits_authenticated_multipart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(
            "/api/v1/executions/insight.bi/business_intelligence_engine",
        ))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(execution_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = OrchestratorClient::new(config(&server.uri())).unwrap();
    let execution =
        client.trigger_execution(&trigger_request()).await.unwrap();
    assert_eq!(execution.id, "exec-42");
    assert_eq!(execution.state.current, "CREATED");
}

#[tokio::test]
async fn trigger_maps_upstream_statuses_without_retry() {
    let cases = [
        (401, "Authentication failed. Please check orchestrator credentials."),
        (404, "Workflow not found. Please ensure the workflow is deployed."),
        (400, "Invalid workflow parameters. Please check your data source URL."),
        (500, "Orchestrator server error. Please try again later."),
        (503, "Orchestrator server error. Please try again later."),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(
                "/api/v1/executions/insight.bi/business_intelligence_engine",
            ))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&server)
            .await;

        let client = OrchestratorClient::new(config(&server.uri())).unwrap();
        let error = client
            .trigger_execution(&trigger_request())
            .await
            .unwrap_err();
        match error {
            OrchestratorError::Upstream {
                status: got,
                message,
            } => {
                assert_eq!(got, status);
                assert_eq!(message, expected);
            }
            other => panic!("unexpected error for {status}: {other:?}"),
        }
        // expect(1) verifies on drop that no retry happened.
    }
}

#[tokio::test]
async fn trigger_without_credentials_fails_fast() {
    let server = MockServer::start().await;

    let mut cfg = config(&server.uri());
    cfg.username = None;
    let client = OrchestratorClient::new(cfg).unwrap();

    let error = client
        .trigger_execution(&trigger_request())
        .await
        .unwrap_err();
    assert!(matches!(error, OrchestratorError::MissingCredentials));
    // No request reached the orchestrator.
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn trigger_timeout_is_reported_as_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(
            "/api/v1/executions/insight.bi/business_intelligence_engine",
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(execution_body())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut cfg = config(&server.uri());
    cfg.trigger_timeout = Duration::from_secs(1);
    let client = OrchestratorClient::new(cfg).unwrap();

    let error = client
        .trigger_execution(&trigger_request())
        .await
        .unwrap_err();
    assert!(matches!(error, OrchestratorError::Timeout));
    assert!(error.to_string().starts_with("Request timed out"));
}

#[tokio::test]
async fn fetch_execution_maps_missing_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/main/executions/nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = OrchestratorClient::new(config(&server.uri())).unwrap();
    let error = client.get_execution("nope").await.unwrap_err();
    match error {
        OrchestratorError::Upstream { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Execution not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn list_retries_once_with_credentials_when_unauthenticated() {
    let server = MockServer::start().await;

    // Unauthenticated attempt is rejected; the credentialed retry succeeds.
    Mock::given(method("GET"))
        .and(path("/api/v1/main/executions/search"))
        .and(query_param("namespace", "insight.bi"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"results": [execution_body()], "total": 1}),
        ))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/main/executions/search"))
        .respond_with(ResponseTemplate::new(401))
        .with_priority(5)
        .expect(1)
        .mount(&server)
        .await;

    let client = OrchestratorClient::new(config(&server.uri())).unwrap();
    let page = client.list_executions(10).await;
    assert_eq!(page.total, 1);
    assert_eq!(page.results[0].id, "exec-42");
    assert!(page.message.is_none());
}

#[tokio::test]
async fn list_degrades_to_empty_page_when_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/main/executions/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = OrchestratorClient::new(config(&server.uri())).unwrap();
    let page = client.list_executions(10).await;
    assert!(page.results.is_empty());
    assert_eq!(page.total, 0);
    assert!(
        page.message
            .as_deref()
            .unwrap()
            .contains("executions unavailable")
    );
}

#[tokio::test]
async fn list_degrades_when_both_attempts_fail() {
    let server = MockServer::start().await;

    // 401 on every attempt: unauthenticated first, then the credentialed
    // retry; after that the client gives up without erroring.
    Mock::given(method("GET"))
        .and(path("/api/v1/main/executions/search"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let client = OrchestratorClient::new(config(&server.uri())).unwrap();
    let page = client.list_executions(10).await;
    assert!(page.results.is_empty());
    assert_eq!(page.total, 0);
    assert!(page.message.is_some());
}

#[tokio::test]
async fn health_walks_fallback_paths_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/main/health"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/health"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "UP"})),
        )
        .mount(&server)
        .await;

    let client = OrchestratorClient::new(config(&server.uri())).unwrap();
    let health = client.probe_health().await;

    assert!(health.healthy);
    assert!(health.endpoint.as_deref().unwrap().ends_with("/health"));
    assert_eq!(health.data.unwrap()["status"], "UP");
    assert_eq!(health.attempts.len(), 3);
    assert_eq!(health.attempts[0].status, Some(500));
    assert_eq!(health.attempts[1].status, Some(404));
    assert_eq!(health.attempts[2].status, Some(200));
}

#[tokio::test]
async fn health_aggregates_every_failed_endpoint() {
    let server = MockServer::start().await;
    // Nothing mounted: the mock server answers 404 everywhere.

    let client = OrchestratorClient::new(config(&server.uri())).unwrap();
    let health = client.probe_health().await;

    assert!(!health.healthy);
    assert_eq!(health.attempts.len(), 5);
    assert!(health.attempts.iter().all(|a| a.status == Some(404)));
    assert_eq!(health.error.as_deref(), Some("HTTP 404"));
}

#[tokio::test]
async fn health_classifies_refused_connections() {
    // Bind-then-drop leaves a port nothing is listening on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        OrchestratorClient::new(config(&format!("http://{}", addr))).unwrap();
    let health = client.probe_health().await;

    assert!(!health.healthy);
    assert_eq!(
        health.error.as_deref(),
        Some("Orchestrator service not running")
    );
    assert!(
        health
            .attempts
            .iter()
            .all(|a| a.error.as_deref() == Some("Orchestrator service not running"))
    );
}
