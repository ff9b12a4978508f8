//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics, and degraded behavior when
//! no database is available.

#[path = "api_server/test_utils.rs"]
mod test_utils;

use serde_json::Value;

use test_utils::TestApiServer;

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "ragboard-rollup-engine");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(
        body.contains("http_requests_total"),
        "Expected http_requests_total metric"
    );
    assert!(
        body.contains("rollup_evaluations_total"),
        "Expected rollup_evaluations_total metric"
    );
    assert!(
        body.contains("matrix_saves_total"),
        "Expected matrix_saves_total metric"
    );
}

#[tokio::test]
async fn objectives_endpoint_unavailable_without_database() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/objectives").await;
    assert_eq!(response.status_code(), 503);
}

#[tokio::test]
async fn objective_tree_endpoint_unavailable_without_database() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/objectives/1").await;
    assert_eq!(response.status_code(), 503);
}

#[tokio::test]
async fn breakdown_endpoint_unavailable_without_database() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/breakdown/key-result/1").await;
    assert_eq!(response.status_code(), 503);
}

#[tokio::test]
async fn matrix_endpoint_unavailable_without_database() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/matrix/1?period=2026-08").await;
    assert_eq!(response.status_code(), 503);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/strategies").await;
    assert_eq!(response.status_code(), 404);
}
