//! Ingestion regression tests.
//!
//! Drives the assembled router end to end: heartbeats in, aggregated
//! counters out via the scrape endpoint, plus the rejection paths for
//! missing identity, malformed payloads, and exhausted budgets.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use fleetbeat_api::build_router;
use fleetbeat_api::ratelimit::RateLimiter;
use fleetbeat_core::Fleet;

fn test_router() -> Router {
    build_router(
        Fleet::new(Duration::from_secs(20)),
        RateLimiter::new(25, Duration::from_secs(1)),
    )
}

fn heartbeat_request(backend: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/heartbeat")
        .header("content-type", "application/json")
        .header("x-backend-id", backend)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn offline_request(backend: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/offline")
        .header("x-backend-id", backend)
        .body(Body::empty())
        .unwrap()
}

async fn scrape(router: &Router) -> String {
    let req = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn heartbeat_shows_up_in_scrape() {
    let router = test_router();

    let body = serde_json::json!({
        "playerAmount": 12.0,
        "managedServers": 3.0,
        "serverName": "velocity",
        "serverVersion": "3.3.0",
        "coreCount": 8
    });
    let resp = router.clone().oneshot(heartbeat_request("proxy-1", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let metrics = scrape(&router).await;
    assert!(metrics.contains("fleetbeat_servers{platform=\"velocity\"} 1"));
    assert!(metrics.contains("fleetbeat_players{platform=\"velocity\"} 12"));
    assert!(metrics.contains("fleetbeat_managed_servers{platform=\"velocity\"} 3"));
    assert!(metrics.contains("fleetbeat_cores{platform=\"velocity\"} 8"));
    assert!(
        metrics.contains("fleetbeat_server_version{platform=\"velocity\",value=\"3.3.0\"} 1")
    );
}

#[tokio::test]
async fn second_heartbeat_replaces_first() {
    let router = test_router();

    let first = serde_json::json!({ "playerAmount": 10.0, "serverName": "paper" });
    router.clone().oneshot(heartbeat_request("proxy-1", first)).await.unwrap();

    let second = serde_json::json!({ "playerAmount": 4.0, "serverName": "paper" });
    router.clone().oneshot(heartbeat_request("proxy-1", second)).await.unwrap();

    let metrics = scrape(&router).await;
    assert!(metrics.contains("fleetbeat_players{platform=\"paper\"} 4"));
    assert!(metrics.contains("fleetbeat_servers{platform=\"paper\"} 1"));
}

#[tokio::test]
async fn missing_identity_rejected() {
    let router = test_router();

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/heartbeat")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_payload_rejected_without_state_change() {
    let router = test_router();

    // Register a healthy report first.
    let good = serde_json::json!({ "playerAmount": 7.0, "serverName": "paper" });
    router.clone().oneshot(heartbeat_request("proxy-1", good)).await.unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/heartbeat")
        .header("content-type", "application/json")
        .header("x-backend-id", "proxy-1")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The earlier report must be untouched.
    let metrics = scrape(&router).await;
    assert!(metrics.contains("fleetbeat_players{platform=\"paper\"} 7"));
}

#[tokio::test]
async fn offline_signal_clears_series() {
    let router = test_router();

    let body = serde_json::json!({
        "playerAmount": 5.0,
        "serverName": "paper",
        "serverVersion": "1.21"
    });
    router.clone().oneshot(heartbeat_request("proxy-1", body)).await.unwrap();

    let resp = router.clone().oneshot(offline_request("proxy-1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let metrics = scrape(&router).await;
    assert!(!metrics.contains("platform=\"paper\""));
    assert!(!metrics.contains("fleetbeat_server_version"));

    // A second offline for the same key is still 200: unknown-key
    // eviction is a defined no-op.
    let resp = router.clone().oneshot(offline_request("proxy-1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn shared_label_counts_across_backends() {
    let router = test_router();

    for backend in ["proxy-1", "proxy-2"] {
        let body = serde_json::json!({
            "playerAmount": 1.0,
            "serverName": "paper",
            "serverVersion": "1.21"
        });
        router.clone().oneshot(heartbeat_request(backend, body)).await.unwrap();
    }

    let metrics = scrape(&router).await;
    assert!(metrics.contains("fleetbeat_server_version{platform=\"paper\",value=\"1.21\"} 2"));

    router.clone().oneshot(offline_request("proxy-1")).await.unwrap();
    let metrics = scrape(&router).await;
    assert!(metrics.contains("fleetbeat_server_version{platform=\"paper\",value=\"1.21\"} 1"));
}

#[tokio::test]
async fn budget_exhaustion_returns_backpressure_status() {
    let router = build_router(
        Fleet::new(Duration::from_secs(20)),
        RateLimiter::new(2, Duration::from_secs(60)),
    );

    let body = || serde_json::json!({ "playerAmount": 1.0, "serverName": "paper" });
    for _ in 0..2 {
        let resp = router.clone().oneshot(heartbeat_request("proxy-1", body())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = router.clone().oneshot(heartbeat_request("proxy-1", body())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn fleet_and_reporter_views_respond() {
    let router = test_router();

    let body = serde_json::json!({ "playerAmount": 2.0, "serverName": "paper" });
    router.clone().oneshot(heartbeat_request("proxy-1", body)).await.unwrap();

    let req = Request::builder()
        .uri("/api/v1/fleet")
        .body(Body::empty())
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let req = Request::builder()
        .uri("/api/v1/reporters")
        .body(Body::empty())
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed["data"][0]["key"], "proxy-1");
}
