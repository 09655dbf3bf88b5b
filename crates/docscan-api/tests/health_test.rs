//! Health and documentation endpoint tests.

mod helpers;

use helpers::{setup_test_app, setup_test_server, test_config};

#[tokio::test]
async fn test_health_reports_recognizer() {
    let server = setup_test_app();
    let response = server.get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["recognizer"], "configured");

    let unconfigured = setup_test_server(test_config(&[]), None);
    let body: serde_json::Value = unconfigured.get("/health").await.json();
    assert_eq!(body["recognizer"], "not_configured");
}

#[tokio::test]
async fn test_liveness_needs_no_auth() {
    let server = setup_test_app();
    let response = server.get("/live").await;
    assert_eq!(response.status_code(), 200);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let server = setup_test_app();
    let response = server.get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert!(body["paths"].get("/api/v0/scans").is_some());
}
