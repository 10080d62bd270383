//! Fare prediction service.

use fare_core::ItineraryRequest;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::ServerState;

/// Runs one prediction under its own span. Failures are logged and returned
/// as client errors; nothing is retried.
pub fn predict_fare(state: &ServerState, request: &ItineraryRequest) -> Result<f64, AppError> {
    let prediction_id = Uuid::new_v4();
    let _span = info_span!("prediction", id = %prediction_id).entered();

    match state.predictor.predict(request) {
        Ok(fare) => {
            info!(
                fare,
                "{} -> {} ({}, {} stops)",
                request.source_city, request.destination_city, request.airline, request.stops
            );
            Ok(fare)
        }
        Err(e) => {
            warn!("Prediction failed: {}", e);
            Err(e.into())
        }
    }
}
