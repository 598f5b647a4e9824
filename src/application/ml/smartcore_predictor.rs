use super::scaler::StandardScaler;
use crate::domain::errors::{ModelError, StorageError};
use crate::domain::ml::feature_registry::{FeatureVector, feature_names};
use crate::domain::ports::SignalClassifier;
use crate::domain::signal::Signal;
use crate::infrastructure::persistence::json_file::{read_json, write_json_atomic};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::RandomForestClassifier;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::path::Path;
use tracing::info;

pub type ForestClassifier = RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Everything needed to classify a row: the fitted scaler and forest, plus
/// the feature order they were fitted with. Replaced wholesale on retrain.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    pub scaler: StandardScaler,
    pub classifier: ForestClassifier,
    pub trained_at: DateTime<Utc>,
    /// Number of labelled rows the classifier was fitted on
    pub rows: usize,
}

impl ModelArtifact {
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        write_json_atomic(path, self).map_err(|e| ModelError::Training {
            reason: e.to_string(),
        })?;
        info!(path = %path.display(), rows = self.rows, "Model artifact saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let artifact: Self = read_json(path).map_err(|e| match e {
            StorageError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ModelError::NotFound {
                    path: path.display().to_string(),
                }
            }
            other => ModelError::Prediction {
                reason: other.to_string(),
            },
        })?;

        let expected = feature_names();
        if artifact.feature_names != expected || artifact.scaler.width() != expected.len() {
            return Err(ModelError::FeatureMismatch {
                expected,
                found: artifact.feature_names,
            });
        }
        Ok(artifact)
    }
}

/// Random forest classifier behind the `SignalClassifier` port.
#[derive(Debug)]
pub struct SmartCorePredictor {
    artifact: ModelArtifact,
}

impl SmartCorePredictor {
    pub fn new(artifact: ModelArtifact) -> Self {
        Self { artifact }
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let artifact = ModelArtifact::load(path)?;
        info!(
            path = %path.display(),
            trained_at = %artifact.trained_at,
            rows = artifact.rows,
            "Loaded signal model"
        );
        Ok(Self::new(artifact))
    }

    fn scaled_matrix(&self, rows: &[FeatureVector]) -> Result<DenseMatrix<f64>, ModelError> {
        let scaled = rows
            .iter()
            .map(|row| {
                if !row.is_finite() {
                    return Err(ModelError::Prediction {
                        reason: "non-finite feature value".to_string(),
                    });
                }
                self.artifact.scaler.transform_row(&row.to_vec())
            })
            .collect::<Result<Vec<_>, _>>()?;

        DenseMatrix::from_2d_vec(&scaled).map_err(|e| ModelError::Prediction {
            reason: format!("Matrix creation failed: {}", e),
        })
    }
}

impl SignalClassifier for SmartCorePredictor {
    fn predict(&self, features: &FeatureVector) -> Result<Signal, ModelError> {
        self.predict_batch(std::slice::from_ref(features))?
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::Prediction {
                reason: "No prediction returned".to_string(),
            })
    }

    fn predict_batch(&self, rows: &[FeatureVector]) -> Result<Vec<Signal>, ModelError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let matrix = self.scaled_matrix(rows)?;
        let classes = self
            .artifact
            .classifier
            .predict(&matrix)
            .map_err(|e| ModelError::Prediction {
                reason: e.to_string(),
            })?;
        Ok(classes.into_iter().map(Signal::from_class).collect())
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }
}
