use fare_config::ServiceConfig;
use fare_model::{ArtifactError, FarePredictor};
use tracing::info;

/// Shared, read-only state for every request.
pub struct ServerState {
    pub predictor: FarePredictor,
}

impl ServerState {
    pub fn new(predictor: FarePredictor) -> Self {
        Self { predictor }
    }

    /// Loads the model and scaler named in `config`.
    pub fn load(config: &ServiceConfig) -> Result<Self, ArtifactError> {
        info!(
            "Loading artifacts: model={} scaler={}",
            config.model_path.display(),
            config.scaler_path.display()
        );
        let predictor = FarePredictor::load(&config.model_path, &config.scaler_path)?;
        Ok(Self::new(predictor))
    }
}
