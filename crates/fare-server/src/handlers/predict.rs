//! Fare prediction handler.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use fare_core::ItineraryRequest;
use tracing::warn;

use crate::dto::PredictResponse;
use crate::error::AppError;
use crate::services::prediction as prediction_service;
use crate::ServerState;

/// POST /predict - Predicts the fare for one itinerary.
///
/// Body rejections are reported as 400 with the uniform error shape instead
/// of Axum's default statuses.
pub async fn predict(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<ItineraryRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected prediction body: {}", rejection.body_text());
        AppError::from(rejection)
    })?;

    let fare = prediction_service::predict_fare(&state, &request)?;
    Ok(Json(PredictResponse { fare }))
}
