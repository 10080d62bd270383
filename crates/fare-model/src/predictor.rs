//! Prediction handler: encode, scale, predict.

use std::path::Path;

use fare_core::{encode, FareError, ItineraryRequest};
use thiserror::Error;
use tracing::debug;

use crate::{ArtifactError, FareModel, Regressor, Scaler};

/// Per-request prediction failures. All of these are caller-facing.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Encoding(#[from] FareError),

    #[error("model produced no prediction")]
    Empty,

    #[error("model produced a non-finite prediction: {0}")]
    NonFinite(f64),
}

/// Holds the loaded model and scaler. Immutable after construction, so a
/// single instance can serve every request concurrently.
pub struct FarePredictor {
    model: Box<dyn Regressor>,
    scaler: Scaler,
}

impl FarePredictor {
    pub fn new(model: impl Regressor + 'static, scaler: Scaler) -> Self {
        Self { model: Box::new(model), scaler }
    }

    /// Loads both artifacts. Either failing is fatal for the caller.
    pub fn load(model_path: impl AsRef<Path>, scaler_path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let model = FareModel::load(model_path)?;
        let scaler = Scaler::load(scaler_path)?;
        Ok(Self::new(model, scaler))
    }

    /// Predicts the fare for one itinerary.
    pub fn predict(&self, request: &ItineraryRequest) -> Result<f64, PredictError> {
        let features = encode(request)?;
        let scaled = self.scaler.scale(&features);
        debug!(features = ?scaled.as_slice(), "scaled features");

        let fare = self
            .model
            .predict(&[scaled.as_slice()])
            .first()
            .copied()
            .ok_or(PredictError::Empty)?;

        if !fare.is_finite() {
            return Err(PredictError::NonFinite(fare));
        }
        Ok(fare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LinearModel;
    use fare_core::{Numeric, DAYS_LEFT_INDEX, DURATION_INDEX, FEATURE_COUNT};
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;

    /// Fare is the scaled duration times 1000 plus the scaled days_left.
    fn predictor() -> FarePredictor {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[DURATION_INDEX] = 1000.0;
        coefficients[DAYS_LEFT_INDEX] = 1.0;
        let model = FareModel::Linear(LinearModel { coefficients, intercept: 5000.0 });
        FarePredictor::new(model, Scaler::standard([2.0, 20.0], [0.5, 10.0]))
    }

    fn request() -> ItineraryRequest {
        ItineraryRequest {
            airline: "SpiceJet".into(),
            source_city: "Chennai".into(),
            destination_city: "Kolkata".into(),
            departure_time: "Night".into(),
            arrival_time: "Late_Night".into(),
            stops: "two_or_more".into(),
            class: "Economy".into(),
            day: "Sunday".into(),
            duration: Numeric::Number(3.0),
            days_left: Numeric::Number(30.0),
        }
    }

    #[test]
    fn test_predict_applies_scaler_before_model() {
        // duration (3 - 2) / 0.5 = 2, days_left (30 - 20) / 10 = 1
        assert_eq!(predictor().predict(&request()).unwrap(), 7001.0);
    }

    #[test]
    fn test_predict_surfaces_encoding_errors() {
        let mut req = request();
        req.day = "Someday".into();
        let err = predictor().predict(&req).unwrap_err();
        assert!(matches!(err, PredictError::Encoding(FareError::UnknownCategory { field: "day", .. })));
        assert_eq!(err.to_string(), "unknown day: 'Someday'");
    }

    #[test]
    fn test_predict_unknown_airline_still_predicts() {
        let mut req = request();
        req.airline = "Unknown_Airline".into();
        assert_eq!(predictor().predict(&req).unwrap(), 7001.0);
    }

    struct Silent;

    impl Regressor for Silent {
        fn n_features(&self) -> usize {
            FEATURE_COUNT
        }

        fn predict_row(&self, _row: &[f64]) -> f64 {
            f64::INFINITY
        }
    }

    #[test]
    fn test_non_finite_prediction_is_error() {
        let predictor = FarePredictor::new(Silent, Scaler::standard([0.0, 0.0], [1.0, 1.0]));
        assert!(matches!(predictor.predict(&request()), Err(PredictError::NonFinite(_))));
    }

    #[test]
    fn test_load_missing_artifact() {
        let err = FarePredictor::load("/nonexistent/model.json", "/nonexistent/scaler.json").err().unwrap();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }

    fn write_artifact(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("fare-model-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Fare is 100 per unit of unscaled duration plus 1.
    fn linear_artifacts(prefix: &str) -> (PathBuf, PathBuf) {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[DURATION_INDEX] = 100.0;
        let model = json!({ "kind": "linear", "coefficients": coefficients, "intercept": 1.0 });
        let scaler = json!({ "kind": "standard", "mean": [0.0, 0.0], "scale": [1.0, 1.0] });
        (
            write_artifact(&format!("{prefix}-model.json"), &model.to_string()),
            write_artifact(&format!("{prefix}-scaler.json"), &scaler.to_string()),
        )
    }

    #[test]
    fn test_load_artifacts_from_disk() {
        let (model_path, scaler_path) = linear_artifacts("valid");

        let model = FareModel::load(&model_path).unwrap();
        assert_eq!(model.n_features(), FEATURE_COUNT);
        let scaler = Scaler::load(&scaler_path).unwrap();
        assert_eq!(scaler.columns, [DURATION_INDEX, DAYS_LEFT_INDEX]);

        let predictor = FarePredictor::load(&model_path, &scaler_path).unwrap();
        assert_eq!(predictor.predict(&request()).unwrap(), 301.0);
    }

    #[test]
    fn test_load_malformed_artifact() {
        let (model_path, _) = linear_artifacts("malformed");
        let broken = write_artifact("malformed-scaler.json", "{");

        assert!(matches!(Scaler::load(&broken), Err(ArtifactError::Parse { .. })));
        assert!(matches!(FareModel::load(&broken), Err(ArtifactError::Parse { .. })));
        let err = FarePredictor::load(&model_path, &broken).err().unwrap();
        assert!(matches!(err, ArtifactError::Parse { ref path, .. } if *path == broken));
    }

    #[test]
    fn test_load_rejects_invalid_artifact() {
        let (_, scaler_path) = linear_artifacts("invalid");
        let short_model = write_artifact(
            "invalid-short-model.json",
            r#"{"kind": "linear", "coefficients": [1.0, 2.0], "intercept": 0.0}"#,
        );
        let bad_scaler = write_artifact(
            "invalid-columns-scaler.json",
            r#"{"kind": "standard", "mean": [0, 0], "scale": [1, 1], "columns": [4, 40]}"#,
        );

        assert!(matches!(FareModel::load(&short_model), Err(ArtifactError::Invalid(_))));
        assert!(matches!(Scaler::load(&bad_scaler), Err(ArtifactError::Invalid(_))));
        let err = FarePredictor::load(&short_model, &scaler_path).err().unwrap();
        assert!(matches!(err, ArtifactError::Invalid(_)));
    }
}
