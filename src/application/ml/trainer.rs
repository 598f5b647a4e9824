//! Fits the signal classifier on every indicator file in the data directory.

use super::labeling::{LabeledSample, label_rows};
use super::scaler::StandardScaler;
use super::smartcore_predictor::{ForestClassifier, ModelArtifact};
use crate::config::MlEnvConfig;
use crate::domain::errors::ModelError;
use crate::domain::ml::feature_registry::feature_names;
use crate::infrastructure::persistence::IndicatorJsonStore;
use chrono::Utc;
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Precision/recall for one class of the held-out split.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    pub class: i32,
    pub precision: f64,
    pub recall: f64,
    pub support: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationReport {
    pub train_rows: usize,
    pub test_rows: usize,
    /// `None` when nothing was held out
    pub accuracy: Option<f64>,
    pub classes: Vec<ClassMetrics>,
}

impl ClassificationReport {
    pub fn evaluate(actual: &[i32], predicted: &[i32], train_rows: usize) -> Self {
        let test_rows = actual.len().min(predicted.len());
        if test_rows == 0 {
            return Self {
                train_rows,
                ..Self::default()
            };
        }

        let correct = actual
            .iter()
            .zip(predicted)
            .filter(|(a, p)| a == p)
            .count();

        let mut labels: Vec<i32> = actual.iter().chain(predicted).copied().collect();
        labels.sort_unstable();
        labels.dedup();

        let classes = labels
            .into_iter()
            .map(|class| {
                let support = actual.iter().filter(|a| **a == class).count();
                let predicted_count = predicted.iter().filter(|p| **p == class).count();
                let hits = actual
                    .iter()
                    .zip(predicted)
                    .filter(|(a, p)| **a == class && **p == class)
                    .count();
                ClassMetrics {
                    class,
                    precision: ratio(hits, predicted_count),
                    recall: ratio(hits, support),
                    support,
                }
            })
            .collect();

        Self {
            train_rows,
            test_rows,
            accuracy: Some(correct as f64 / test_rows as f64),
            classes,
        }
    }

    pub fn log(&self) {
        info!(
            train_rows = self.train_rows,
            test_rows = self.test_rows,
            accuracy = ?self.accuracy,
            "Classification report"
        );
        for c in &self.classes {
            info!(
                class = c.class,
                precision = %format!("{:.3}", c.precision),
                recall = %format!("{:.3}", c.recall),
                support = c.support,
                "  class"
            );
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

pub struct ModelTrainer {
    config: MlEnvConfig,
}

impl ModelTrainer {
    pub fn new(config: MlEnvConfig) -> Self {
        Self { config }
    }

    /// Labels every indicator file in the store. Files that fail to load are
    /// logged and skipped.
    pub fn collect_samples(&self, store: &IndicatorJsonStore) -> Result<Vec<LabeledSample>, ModelError> {
        let names = store.list().map_err(|e| ModelError::Training {
            reason: e.to_string(),
        })?;

        let mut samples = Vec::new();
        for name in names {
            match store.load(&name) {
                Ok(rows) => {
                    let labeled = label_rows(&rows, self.config.label_threshold);
                    info!(ticker = %name, rows = rows.len(), labeled = labeled.len(), "Loaded training rows");
                    samples.extend(labeled);
                }
                Err(e) => warn!(ticker = %name, error = %e, "Skipping indicator file"),
            }
        }
        Ok(samples)
    }

    /// Chronological split, scaler fit on the training part only, random
    /// forest fit, evaluation on the held-out tail.
    pub fn train(
        &self,
        mut samples: Vec<LabeledSample>,
    ) -> Result<(ModelArtifact, ClassificationReport), ModelError> {
        if samples.is_empty() || samples.len() < self.config.min_training_rows {
            return Err(ModelError::InsufficientData {
                rows: samples.len(),
                min: self.config.min_training_rows,
            });
        }

        samples.sort_by_key(|s| s.timestamp);
        let n = samples.len();
        let test_rows = ((n as f64) * self.config.test_fraction).floor() as usize;
        let split = n - test_rows.min(n - 1);
        let (train, test) = samples.split_at(split);

        let y_train: Vec<i32> = train.iter().map(|s| s.class).collect();
        let mut distinct: Vec<i32> = y_train.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < 2 {
            return Err(ModelError::SingleClass {
                class: distinct.first().copied().unwrap_or_default(),
            });
        }

        let x_train: Vec<Vec<f64>> = train.iter().map(|s| s.features.to_vec()).collect();
        let scaler = StandardScaler::fit(&x_train)?;
        let x_matrix = matrix(&scaler.transform(&x_train)?)?;

        let params = RandomForestClassifierParameters::default()
            .with_n_trees(self.config.n_trees.into())
            .with_max_depth(self.config.max_depth);

        info!(
            train_rows = train.len(),
            test_rows = test.len(),
            n_trees = self.config.n_trees,
            max_depth = self.config.max_depth,
            class_counts = ?class_counts(&y_train),
            "Fitting random forest"
        );

        let classifier: ForestClassifier = RandomForestClassifier::fit(&x_matrix, &y_train, params)
            .map_err(|e| ModelError::Training {
                reason: e.to_string(),
            })?;

        let report = if test.is_empty() {
            ClassificationReport::evaluate(&[], &[], train.len())
        } else {
            let x_test: Vec<Vec<f64>> = test.iter().map(|s| s.features.to_vec()).collect();
            let y_test: Vec<i32> = test.iter().map(|s| s.class).collect();
            let predicted = classifier
                .predict(&matrix(&scaler.transform(&x_test)?)?)
                .map_err(|e| ModelError::Training {
                    reason: format!("evaluation failed: {}", e),
                })?;
            ClassificationReport::evaluate(&y_test, &predicted, train.len())
        };

        let artifact = ModelArtifact {
            feature_names: feature_names(),
            scaler,
            classifier,
            trained_at: Utc::now(),
            rows: train.len(),
        };
        Ok((artifact, report))
    }
}

fn matrix(rows: &[Vec<f64>]) -> Result<DenseMatrix<f64>, ModelError> {
    DenseMatrix::from_2d_vec(&rows.to_vec()).map_err(|e| ModelError::Training {
        reason: format!("Matrix error: {}", e),
    })
}

fn class_counts(classes: &[i32]) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for c in classes {
        *counts.entry(*c).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::feature_registry::FeatureVector;
    use crate::domain::ports::SignalClassifier;
    use crate::application::ml::smartcore_predictor::SmartCorePredictor;
    use crate::domain::signal::Signal;
    use chrono::{Duration, TimeZone};

    fn sample(i: usize, class: i32) -> LabeledSample {
        let level = class as f64 * 10.0;
        LabeledSample {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(i as i64),
            features: FeatureVector {
                tenkan: level + (i % 3) as f64 * 0.1,
                kijun: level,
                senkou_a: level,
                senkou_b: level,
                chikou: level,
                rsi: 50.0 + level * 2.0,
                ema: level,
            },
            class,
        }
    }

    fn separable(n: usize) -> Vec<LabeledSample> {
        (0..n).map(|i| sample(i, [1, -1, 0][i % 3])).collect()
    }

    fn trainer() -> ModelTrainer {
        ModelTrainer::new(MlEnvConfig {
            n_trees: 10,
            max_depth: 5,
            ..MlEnvConfig::default()
        })
    }

    #[test]
    fn test_too_few_rows_is_skipped() {
        let err = trainer().train(separable(10)).unwrap_err();
        assert!(matches!(err, ModelError::InsufficientData { rows: 10, min: 50 }));
    }

    #[test]
    fn test_single_class_is_rejected() {
        let samples: Vec<LabeledSample> = (0..60).map(|i| sample(i, 1)).collect();
        let err = trainer().train(samples).unwrap_err();
        assert!(matches!(err, ModelError::SingleClass { class: 1 }));
    }

    #[test]
    fn test_learns_a_separable_problem() {
        let (artifact, report) = trainer().train(separable(120)).unwrap();

        assert_eq!(report.train_rows, 96);
        assert_eq!(report.test_rows, 24);
        assert!(report.accuracy.unwrap() > 0.9);
        assert_eq!(artifact.feature_names.len(), 7);

        let predictor = SmartCorePredictor::new(artifact);
        assert_eq!(predictor.predict(&sample(0, 1).features).unwrap(), Signal::Bullish);
        assert_eq!(predictor.predict(&sample(1, -1).features).unwrap(), Signal::Bearish);
    }

    #[test]
    fn test_report_metrics() {
        let report = ClassificationReport::evaluate(&[1, 1, -1, 0], &[1, -1, -1, 0], 10);
        assert_eq!(report.accuracy, Some(0.75));
        let bullish = report.classes.iter().find(|c| c.class == 1).unwrap();
        assert_eq!(bullish.support, 2);
        assert_eq!(bullish.recall, 0.5);
        assert_eq!(bullish.precision, 1.0);
        let bearish = report.classes.iter().find(|c| c.class == -1).unwrap();
        assert_eq!(bearish.precision, 0.5);
    }
}
