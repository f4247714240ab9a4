//! fleetbeat-api — HTTP surface for heartbeat ingestion and scraping.
//!
//! Provides axum route handlers for the reporter-facing ingestion
//! endpoints and the monitoring-facing read endpoints.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/api/v1/heartbeat` | Ingest one heartbeat (identity via `x-backend-id`/`x-instance-id` headers) |
//! | POST | `/api/v1/offline` | Explicit going-offline signal for a reporter |
//! | GET | `/api/v1/reporters` | List live reporters |
//! | GET | `/api/v1/fleet` | JSON snapshot of aggregates and labels |
//! | GET | `/metrics` | Prometheus exposition |

pub mod error;
pub mod handlers;
pub mod payload;
pub mod ratelimit;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use fleetbeat_core::Fleet;

use crate::ratelimit::RateLimiter;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub fleet: Fleet,
    pub limiter: Arc<RateLimiter>,
}

/// Build the complete router (ingestion + inspection + metrics).
pub fn build_router(fleet: Fleet, limiter: RateLimiter) -> Router {
    let state = ApiState {
        fleet,
        limiter: Arc::new(limiter),
    };

    let api_routes = Router::new()
        .route("/heartbeat", post(handlers::heartbeat))
        .route("/offline", post(handlers::offline))
        .route("/reporters", get(handlers::list_reporters))
        .route("/fleet", get(handlers::fleet_snapshot))
        .with_state(state.clone());

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::prometheus_metrics).with_state(state))
}
