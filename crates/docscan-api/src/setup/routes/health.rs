//! Health check handlers and response types.

use crate::constants::API_VERSION;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    pub api_version: String,
    /// `configured` or `not_configured`
    pub recognizer: String,
}

/// Service health
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is healthy", body = HealthCheckResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let recognizer = if state.recognizer.is_some() {
        "configured"
    } else {
        "not_configured"
    };

    (
        StatusCode::OK,
        Json(HealthCheckResponse {
            status: "healthy".to_string(),
            api_version: API_VERSION.to_string(),
            recognizer: recognizer.to_string(),
        }),
    )
}

/// Liveness probe - process is running.
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}
