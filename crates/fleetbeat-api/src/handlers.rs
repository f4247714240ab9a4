//! REST API handlers.
//!
//! The ingestion path validates identity and budget, decodes the payload,
//! and hands the core a ready `Report`; everything after that point is
//! the core's single critical section. Read handlers serve detached
//! snapshots and never block ingestion beyond that section.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use tracing::debug;

use fleetbeat_core::ReporterKey;

use crate::ApiState;
use crate::error::ApiError;
use crate::payload::HeartbeatPayload;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

/// Reporter identity from request headers: required backend id, optional
/// per-instance id.
fn reporter_identity(headers: &HeaderMap) -> Result<(String, ReporterKey), ApiError> {
    let backend = headers
        .get("x-backend-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingIdentity)?;

    let instance = headers
        .get("x-instance-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let key = match instance {
        Some(instance) => ReporterKey::with_instance(backend, instance),
        None => ReporterKey::new(backend),
    };
    Ok((backend.to_string(), key))
}

// ── Ingestion ──────────────────────────────────────────────────

/// POST /api/v1/heartbeat
pub async fn heartbeat(
    State(state): State<ApiState>,
    headers: HeaderMap,
    payload: Result<Json<HeartbeatPayload>, JsonRejection>,
) -> impl IntoResponse {
    let (backend, key) = match reporter_identity(&headers) {
        Ok(identity) => identity,
        Err(e) => return e.into_response(),
    };

    // Budget is per backend; a rejected request never touches the core.
    if !state.limiter.allow(&backend) {
        debug!(%key, "heartbeat rejected, budget exhausted");
        return ApiError::RateLimited.into_response();
    }

    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return ApiError::BadPayload(rejection.body_text()).into_response(),
    };

    state.fleet.record_heartbeat(key, payload.into_report()).await;
    ApiResponse::ok("accepted").into_response()
}

/// POST /api/v1/offline
pub async fn offline(State(state): State<ApiState>, headers: HeaderMap) -> impl IntoResponse {
    let (_, key) = match reporter_identity(&headers) {
        Ok(identity) => identity,
        Err(e) => return e.into_response(),
    };

    // Unknown keys are a defined no-op, not an error.
    let removed = state.fleet.mark_offline(&key).await;
    ApiResponse::ok(serde_json::json!({ "removed": removed })).into_response()
}

// ── Inspection ─────────────────────────────────────────────────

/// GET /api/v1/reporters
pub async fn list_reporters(State(state): State<ApiState>) -> impl IntoResponse {
    ApiResponse::ok(state.fleet.reporters().await)
}

/// GET /api/v1/fleet
pub async fn fleet_snapshot(State(state): State<ApiState>) -> impl IntoResponse {
    ApiResponse::ok(state.fleet.snapshot().await)
}

// ── Prometheus ─────────────────────────────────────────────────

/// GET /metrics
pub async fn prometheus_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let snapshot = state.fleet.snapshot().await;
    let body = fleetbeat_metrics::render_prometheus(&snapshot);
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}
