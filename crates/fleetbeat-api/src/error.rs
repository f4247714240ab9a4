//! Error type for the API boundary.
//!
//! The core's steady-state operations are total and return nothing; every
//! failure the API can produce happens before the core is touched —
//! missing identity, an undecodable payload, or an exhausted request
//! budget.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Rejections produced at the ingestion boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing or empty x-backend-id header")]
    MissingIdentity,

    #[error("invalid heartbeat payload: {0}")]
    BadPayload(String),

    #[error("rate limit exceeded, try again later")]
    RateLimited,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingIdentity | Self::BadPayload(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}
