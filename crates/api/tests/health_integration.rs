//! Integration tests for health and metrics endpoints.
//!
//! Run with: cargo test --test health_integration

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{create_test_app, parse_response_body};

#[tokio::test]
async fn test_health_check_in_memory() {
    let app = create_test_app();

    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["backend"], "in_memory");
    assert_eq!(body["database"]["connected"], true);
}

#[tokio::test]
async fn test_live_and_ready() {
    let app = create_test_app();

    for (uri, status) in [("/api/health/live", "alive"), ("/api/health/ready", "ready")] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response).await;
        assert_eq!(body["status"], status);
    }
}

#[tokio::test]
async fn test_request_id_round_trip() {
    let app = create_test_app();

    let request = Request::builder()
        .uri("/api/health/live")
        .header("X-Request-ID", "trace-42")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-42");
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_test_app();

    let request = Request::builder()
        .uri("/api/v1/nothing-here")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
