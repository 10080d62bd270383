//! Model artifacts and the fare prediction handler.
//!
//! Artifacts are JSON documents exported from the training environment:
//!
//! - [`Scaler`] — Fitted transform for the two continuous features
//! - [`FareModel`] — Linear, random-forest or boosted-tree regressor
//! - [`FarePredictor`] — Encode, scale and predict in one call

mod predictor;
mod regressor;
mod scaler;

pub use predictor::{FarePredictor, PredictError};
pub use regressor::{BoostedEnsemble, FareModel, LinearModel, Regressor, TreeEnsemble, TreeModel};
pub use scaler::{ScaledFeatureVector, Scaler, ScalerKind};

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from loading or validating an artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid artifact: {0}")]
    Invalid(String),
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let content = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
