//! Integration tests for the HTTP surface
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use domain::ErrorRate;
use infrastructure::{JOBS_PROCESSED_TOTAL, PrometheusMetrics, THROUGHPUT_JOBS_PER_SECOND};
use presentation_http::{RequestIdLayer, create_router, state::AppState};
use serde_json::{Value, json};

fn create_test_server() -> (TestServer, AppState) {
    let state = AppState::new(Arc::new(PrometheusMetrics::new()));
    let app = create_router(state.clone()).layer(RequestIdLayer::new());
    (TestServer::new(app).unwrap(), state)
}

// ============================================================================
// Greeting and health
// ============================================================================

#[tokio::test]
async fn greeting_without_faults() {
    let (server, _) = create_test_server();

    let response = server.get("/").await;

    response.assert_status_ok();
    response.assert_text("Hello, Job Processor!");
}

#[tokio::test]
async fn unknown_paths_fall_back_to_greeting() {
    let (server, _) = create_test_server();

    let response = server.get("/some/other/path").await;

    response.assert_status_ok();
    response.assert_text("Hello, Job Processor!");
}

#[tokio::test]
async fn health_returns_ok() {
    let (server, _) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    response.assert_json(&json!({"status": "ok"}));
}

#[tokio::test]
async fn every_response_carries_request_id() {
    let (server, _) = create_test_server();

    let response = server.get("/health").await;
    let id = response.header("x-request-id");
    assert!(!id.is_empty());

    let response = server
        .get("/")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-123"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "trace-123");
}

// ============================================================================
// Metrics
// ============================================================================

#[tokio::test]
async fn metrics_expose_job_series() {
    let (server, _) = create_test_server();

    let response = server.get("/metrics").await;

    response.assert_status_ok();
    let content_type = response.header("content-type");
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));
    let body = response.text();
    assert!(body.contains(JOBS_PROCESSED_TOTAL));
    assert!(body.contains(THROUGHPUT_JOBS_PER_SECOND));
}

#[tokio::test]
async fn injected_errors_are_counted() {
    let (server, state) = create_test_server();
    state.policy.set_error_rate(ErrorRate::ALWAYS);

    server.get("/").await.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body = server.get("/metrics").await.text();
    assert!(body.contains(r#"job_processor_injected_faults_total{kind="error"} 1"#));
}

// ============================================================================
// Fault policy control
// ============================================================================

#[tokio::test]
async fn set_latency_is_reported() {
    let (server, _) = create_test_server();

    let response = server
        .post("/entropy/latency")
        .json(&json!({"latency": 1.5}))
        .await;
    response.assert_status_ok();
    response.assert_text("Latency set to 1.5s");

    let policy: Value = server.get("/entropy").await.json();
    assert_eq!(policy["latency"], 1.5);
    assert_eq!(policy["error_rate"], 0.0);
}

#[tokio::test]
async fn set_error_rate_is_reported() {
    let (server, _) = create_test_server();

    let response = server
        .post("/entropy/errors")
        .json(&json!({"error_rate": 0.25}))
        .await;
    response.assert_status_ok();
    response.assert_text("Error rate set to 0.25");

    let policy: Value = server.get("/entropy").await.json();
    assert_eq!(policy["error_rate"], 0.25);
}

#[tokio::test]
async fn body_without_content_type_is_accepted() {
    let (server, _) = create_test_server();

    let response = server
        .post("/entropy/errors")
        .text(r#"{"error_rate": 0.5}"#)
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn full_error_rate_fails_greeting_but_not_control_routes() {
    let (server, _) = create_test_server();

    server
        .post("/entropy/errors")
        .json(&json!({"error_rate": 1.0}))
        .await
        .assert_status_ok();

    for _ in 0..10 {
        let response = server.get("/").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_text("Internal Server Error");
    }

    server.get("/health").await.assert_status_ok();
    server.get("/metrics").await.assert_status_ok();
    server.get("/entropy").await.assert_status_ok();
}

#[tokio::test]
async fn latency_delays_greeting_only() {
    let (server, _) = create_test_server();

    server
        .post("/entropy/latency")
        .json(&json!({"latency": 0.2}))
        .await
        .assert_status_ok();

    let start = Instant::now();
    server.get("/").await.assert_status_ok();
    assert!(start.elapsed() >= Duration::from_millis(200));

    let start = Instant::now();
    server.get("/health").await.assert_status_ok();
    assert!(start.elapsed() < Duration::from_millis(200));
}

#[tokio::test]
async fn malformed_json_keeps_previous_policy() {
    let (server, _) = create_test_server();

    server
        .post("/entropy/errors")
        .json(&json!({"error_rate": 0.3}))
        .await
        .assert_status_ok();

    let response = server.post("/entropy/errors").text("{error_rate: ").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "validation_error");

    let policy: Value = server.get("/entropy").await.json();
    assert_eq!(policy["error_rate"], 0.3);
}

#[tokio::test]
async fn invalid_values_are_rejected() {
    let (server, state) = create_test_server();

    let cases = [
        ("/entropy/errors", json!({"error_rate": 1.5})),
        ("/entropy/errors", json!({"error_rate": -0.1})),
        ("/entropy/errors", json!({"error_rate": "high"})),
        ("/entropy/errors", json!({})),
        ("/entropy/latency", json!({"latency": -1})),
        ("/entropy/latency", json!({"latency": "slow"})),
        ("/entropy/latency", json!({})),
    ];

    for (path, body) in cases {
        server
            .post(path)
            .json(&body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    assert!(state.policy.get().is_inert());
}

#[tokio::test]
async fn reset_restores_inert_policy() {
    let (server, _) = create_test_server();

    server
        .post("/entropy/errors")
        .json(&json!({"error_rate": 1.0}))
        .await
        .assert_status_ok();
    server.get("/").await.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let response = server.delete("/entropy").await;
    response.assert_status_ok();
    response.assert_text("Entropy reset");

    let policy: Value = server.get("/entropy").await.json();
    assert_eq!(policy["error_rate"], 0.0);
    assert_eq!(policy["stats"]["total_calls"], 0);
    server.get("/").await.assert_status_ok();
}
