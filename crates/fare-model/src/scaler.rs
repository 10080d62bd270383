//! Fitted scaler for the continuous features.

use std::path::Path;

use fare_core::{FeatureVector, DAYS_LEFT_INDEX, DURATION_INDEX, FEATURE_COUNT};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{read_json, ArtifactError};

/// Scaler artifact.
///
/// ```json
/// { "kind": "standard", "mean": [10.2, 26.0], "scale": [7.2, 13.6] }
/// ```
///
/// `columns` names the two vector positions the scaler was fit on and
/// defaults to duration and days_left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    #[serde(flatten)]
    pub kind: ScalerKind,
    #[serde(default = "default_columns")]
    pub columns: [usize; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerKind {
    /// `(x - mean) / scale`
    Standard { mean: [f64; 2], scale: [f64; 2] },
    /// Maps `[data_min, data_max]` onto `feature_range`.
    MinMax {
        data_min: [f64; 2],
        data_max: [f64; 2],
        #[serde(default = "default_feature_range")]
        feature_range: [f64; 2],
    },
}

fn default_columns() -> [usize; 2] {
    [DURATION_INDEX, DAYS_LEFT_INDEX]
}

fn default_feature_range() -> [f64; 2] {
    [0.0, 1.0]
}

/// Feature row after the scaler has been applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledFeatureVector(FeatureVector);

impl ScaledFeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }
}

impl Scaler {
    pub fn standard(mean: [f64; 2], scale: [f64; 2]) -> Self {
        Self { kind: ScalerKind::Standard { mean, scale }, columns: default_columns() }
    }

    /// Loads and validates a scaler artifact from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let scaler: Scaler = read_json(path)?;
        scaler.validate()?;
        info!("Loaded {} scaler from {}", scaler.kind.name(), path.display());
        Ok(scaler)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ArtifactError> {
        let scaler: Scaler = serde_json::from_str(json).map_err(|e| ArtifactError::Invalid(e.to_string()))?;
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        let [a, b] = self.columns;
        if a >= FEATURE_COUNT || b >= FEATURE_COUNT {
            return Err(ArtifactError::Invalid(format!(
                "scaler columns {:?} out of range for {} features",
                self.columns, FEATURE_COUNT
            )));
        }
        if a == b {
            return Err(ArtifactError::Invalid("scaler columns must be distinct".into()));
        }

        let params: Vec<f64> = match &self.kind {
            ScalerKind::Standard { mean, scale } => mean.iter().chain(scale).copied().collect(),
            ScalerKind::MinMax { data_min, data_max, feature_range } => {
                if feature_range[0] >= feature_range[1] {
                    return Err(ArtifactError::Invalid(format!(
                        "feature_range minimum must be below maximum, got {:?}",
                        feature_range
                    )));
                }
                data_min.iter().chain(data_max).chain(feature_range).copied().collect()
            }
        };
        if params.iter().any(|p| !p.is_finite()) {
            return Err(ArtifactError::Invalid("scaler parameters must be finite".into()));
        }
        Ok(())
    }

    /// Transforms the two continuous values jointly.
    pub fn transform(&self, values: [f64; 2]) -> [f64; 2] {
        match &self.kind {
            ScalerKind::Standard { mean, scale } => {
                [0, 1].map(|i| (values[i] - mean[i]) / non_zero(scale[i]))
            }
            ScalerKind::MinMax { data_min, data_max, feature_range } => [0, 1].map(|i| {
                let factor = (feature_range[1] - feature_range[0]) / non_zero(data_max[i] - data_min[i]);
                values[i] * factor + (feature_range[0] - data_min[i] * factor)
            }),
        }
    }

    /// Replaces the scaled positions of `features`; every other position is
    /// passed through untouched.
    pub fn scale(&self, features: &FeatureVector) -> ScaledFeatureVector {
        let [a, b] = self.columns;
        let mut out = *features;
        let input = [features.get(a), features.get(b)];
        if let [Some(x), Some(y)] = input {
            let [sx, sy] = self.transform([x, y]);
            out.set(a, sx);
            out.set(b, sy);
        }
        ScaledFeatureVector(out)
    }
}

impl ScalerKind {
    fn name(&self) -> &'static str {
        match self {
            ScalerKind::Standard { .. } => "standard",
            ScalerKind::MinMax { .. } => "min-max",
        }
    }
}

/// Constant features are left unscaled.
fn non_zero(scale: f64) -> f64 {
    if scale == 0.0 {
        1.0
    } else {
        scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> FeatureVector {
        let mut values = [0.0; FEATURE_COUNT];
        for (i, v) in values.iter_mut().enumerate() {
            *v = i as f64 * 0.5 + 1.0;
        }
        FeatureVector::from_array(values)
    }

    #[test]
    fn test_standard_transform() {
        let scaler = Scaler::standard([2.0, 20.0], [0.5, 10.0]);
        assert_eq!(scaler.transform([2.5, 10.0]), [1.0, -1.0]);
    }

    #[test]
    fn test_zero_scale_is_treated_as_one() {
        let scaler = Scaler::standard([1.0, 1.0], [0.0, 2.0]);
        assert_eq!(scaler.transform([3.0, 3.0]), [2.0, 1.0]);
    }

    #[test]
    fn test_min_max_transform() {
        let scaler = Scaler::from_json_str(
            r#"{"kind": "min_max", "data_min": [0.0, 1.0], "data_max": [10.0, 49.0]}"#,
        )
        .unwrap();
        let [x, y] = scaler.transform([5.0, 25.0]);
        assert!((x - 0.5).abs() < 1e-12);
        assert!((y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_scale_only_touches_continuous_positions() {
        let scaler = Scaler::standard([3.0, 1.0], [2.0, 4.0]);
        let before = features();
        let after = scaler.scale(&before);

        for (i, (b, a)) in before.as_slice().iter().zip(after.as_slice()).enumerate() {
            if i == DURATION_INDEX || i == DAYS_LEFT_INDEX {
                continue;
            }
            assert_eq!(b.to_bits(), a.to_bits(), "position {i} changed");
        }
        assert_eq!(after.as_slice()[DURATION_INDEX], 0.0);
        assert_eq!(after.as_slice()[DAYS_LEFT_INDEX], 0.625);
    }

    #[test]
    fn test_custom_columns() {
        let scaler = Scaler::from_json_str(
            r#"{"kind": "standard", "mean": [0.0, 0.0], "scale": [2.0, 2.0], "columns": [35, 36]}"#,
        )
        .unwrap();
        let before = features();
        let after = scaler.scale(&before);
        assert_eq!(after.as_slice()[DURATION_INDEX], before.as_slice()[DURATION_INDEX]);
        assert_eq!(after.as_slice()[36], before.as_slice()[36] / 2.0);
    }

    #[test]
    fn test_invalid_scalers_rejected() {
        let out_of_range = r#"{"kind": "standard", "mean": [0, 0], "scale": [1, 1], "columns": [4, 37]}"#;
        assert!(Scaler::from_json_str(out_of_range).is_err());

        let duplicate = r#"{"kind": "standard", "mean": [0, 0], "scale": [1, 1], "columns": [4, 4]}"#;
        assert!(Scaler::from_json_str(duplicate).is_err());

        let bad_range = r#"{"kind": "min_max", "data_min": [0, 0], "data_max": [1, 1], "feature_range": [1, 0]}"#;
        assert!(Scaler::from_json_str(bad_range).is_err());

        assert!(Scaler::from_json_str(r#"{"kind": "robust"}"#).is_err());
    }
}
