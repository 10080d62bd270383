//! Regressor artifacts.

use std::path::Path;

use fare_core::FEATURE_COUNT;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{read_json, ArtifactError};

/// A trained model that maps a feature row to a fare.
///
/// Implementations are immutable once loaded and shared across requests.
pub trait Regressor: Send + Sync {
    /// Number of features each row must contain.
    fn n_features(&self) -> usize;

    /// Predicts a single row. A row of the wrong width yields `NaN`.
    fn predict_row(&self, row: &[f64]) -> f64;

    /// Predicts a batch, one output per row.
    fn predict(&self, rows: &[&[f64]]) -> Vec<f64> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Model artifact
// ─────────────────────────────────────────────────────────────────────────────

/// Model artifact, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FareModel {
    Linear(LinearModel),
    /// Mean of the tree outputs.
    Forest(TreeEnsemble),
    /// `init + learning_rate * sum(tree outputs)`.
    Boosting(BoostedEnsemble),
}

impl FareModel {
    /// Loads and validates a model artifact from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let model: FareModel = read_json(path)?;
        model.validate()?;
        info!("Loaded {} model from {}", model.describe(), path.display());
        Ok(model)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ArtifactError> {
        let model: FareModel = serde_json::from_str(json).map_err(|e| ArtifactError::Invalid(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        let n_features = self.n_features();
        if n_features != FEATURE_COUNT {
            return Err(ArtifactError::Invalid(format!(
                "model expects {} features, encoder produces {}",
                n_features, FEATURE_COUNT
            )));
        }

        match self {
            FareModel::Linear(m) => m.validate(),
            FareModel::Forest(e) => validate_trees(&e.trees, e.n_features),
            FareModel::Boosting(b) => {
                if !b.learning_rate.is_finite() || !b.init.is_finite() {
                    return Err(ArtifactError::Invalid("learning_rate and init must be finite".into()));
                }
                validate_trees(&b.trees, b.n_features)
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            FareModel::Linear(_) => "linear".to_string(),
            FareModel::Forest(e) => format!("forest ({} trees)", e.trees.len()),
            FareModel::Boosting(b) => format!("boosting ({} trees)", b.trees.len()),
        }
    }
}

impl Regressor for FareModel {
    fn n_features(&self) -> usize {
        match self {
            FareModel::Linear(m) => m.coefficients.len(),
            FareModel::Forest(e) => e.n_features,
            FareModel::Boosting(b) => b.n_features,
        }
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        if row.len() != self.n_features() {
            return f64::NAN;
        }
        match self {
            FareModel::Linear(m) => m.predict_row(row),
            FareModel::Forest(e) => {
                let total: f64 = e.trees.iter().map(|t| t.predict_row(row)).sum();
                total / e.trees.len() as f64
            }
            FareModel::Boosting(b) => {
                let total: f64 = b.trees.iter().map(|t| t.predict_row(row)).sum();
                b.init + b.learning_rate * total
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Linear
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    fn validate(&self) -> Result<(), ArtifactError> {
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ArtifactError::Invalid("linear coefficients must be finite".into()));
        }
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        self.intercept + self.coefficients.iter().zip(row).map(|(c, x)| c * x).sum::<f64>()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Trees
// ─────────────────────────────────────────────────────────────────────────────

const LEAF: i64 = -1;

fn default_n_features() -> usize {
    FEATURE_COUNT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub trees: Vec<TreeModel>,
    #[serde(default = "default_n_features")]
    pub n_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostedEnsemble {
    pub trees: Vec<TreeModel>,
    pub learning_rate: f64,
    #[serde(default)]
    pub init: f64,
    #[serde(default = "default_n_features")]
    pub n_features: usize,
}

/// A single regression tree in flat parallel-array form.
///
/// Node `i` is a leaf when `children_left[i] == -1`. Otherwise the row goes
/// left when `row[feature[i]] <= threshold[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeModel {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl TreeModel {
    fn validate(&self, n_features: usize) -> Result<(), ArtifactError> {
        let n_nodes = self.children_left.len();
        if n_nodes == 0 {
            return Err(ArtifactError::Invalid("tree has no nodes".into()));
        }
        let lengths = [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ];
        if lengths.iter().any(|len| *len != n_nodes) {
            return Err(ArtifactError::Invalid("tree arrays differ in length".into()));
        }

        for node in 0..n_nodes {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                if !self.value[node].is_finite() {
                    return Err(ArtifactError::Invalid(format!("leaf {node} has non-finite value")));
                }
                continue;
            }
            // Children always follow their parent, so traversal terminates.
            let child_ok = |c: i64| c > node as i64 && (c as usize) < n_nodes;
            if !child_ok(left) || !child_ok(right) {
                return Err(ArtifactError::Invalid(format!("node {node} has invalid children")));
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(ArtifactError::Invalid(format!("node {node} splits on unknown feature {feature}")));
            }
            if self.threshold[node].is_nan() {
                return Err(ArtifactError::Invalid(format!("node {node} has NaN threshold")));
            }
        }
        Ok(())
    }

    /// Walks from the root. Malformed trees that skipped validation yield
    /// `NaN` instead of panicking or looping.
    fn predict_row(&self, row: &[f64]) -> f64 {
        let mut node = 0usize;
        for _ in 0..=self.children_left.len() {
            let Some(&left) = self.children_left.get(node) else {
                return f64::NAN;
            };
            if left == LEAF {
                return self.value.get(node).copied().unwrap_or(f64::NAN);
            }
            let split = self.feature.get(node).zip(self.threshold.get(node));
            let (Some((&feature, &threshold)), Some(&right)) = (split, self.children_right.get(node)) else {
                return f64::NAN;
            };
            let Some(&x) = usize::try_from(feature).ok().and_then(|f| row.get(f)) else {
                return f64::NAN;
            };
            let next = if x <= threshold { left } else { right };
            match usize::try_from(next) {
                Ok(next) => node = next,
                Err(_) => return f64::NAN,
            }
        }
        f64::NAN
    }
}

fn validate_trees(trees: &[TreeModel], n_features: usize) -> Result<(), ArtifactError> {
    if trees.is_empty() {
        return Err(ArtifactError::Invalid("ensemble has no trees".into()));
    }
    trees.iter().try_for_each(|t| t.validate(n_features))
}
