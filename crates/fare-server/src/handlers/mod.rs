//! HTTP route handlers for the fare server.

pub mod predict;

use axum::Json;
use tracing::info;

use crate::dto::HealthResponse;

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "Flight Fare Prediction API is running",
    })
}

/// Keep-alive endpoint for external cron pingers.
pub async fn ping() -> &'static str {
    info!("Ping received");
    "pong"
}
