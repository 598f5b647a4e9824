//! Classifier training configuration parsing from environment variables.

use super::{Lookup, parse_or};
use anyhow::{Result, bail};
use std::path::PathBuf;

/// ML environment configuration
#[derive(Debug, Clone)]
pub struct MlEnvConfig {
    pub model_path: PathBuf,
    /// Relative move of the next close that counts as up/down (0.002 = 0.2%)
    pub label_threshold: f64,
    pub min_training_rows: usize,
    pub n_trees: u16,
    pub max_depth: u16,
    /// Share of the most recent rows held out for evaluation
    pub test_fraction: f64,
}

impl Default for MlEnvConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model/signal_model.json"),
            label_threshold: 0.002,
            min_training_rows: 50,
            n_trees: 100,
            max_depth: 10,
            test_fraction: 0.2,
        }
    }
}

impl MlEnvConfig {
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        let d = Self::default();
        let config = Self {
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(d.model_path),
            label_threshold: parse_or(lookup, "LABEL_THRESHOLD", d.label_threshold)?,
            min_training_rows: parse_or(lookup, "MIN_TRAINING_ROWS", d.min_training_rows)?,
            n_trees: parse_or(lookup, "ML_N_TREES", d.n_trees)?,
            max_depth: parse_or(lookup, "ML_MAX_DEPTH", d.max_depth)?,
            test_fraction: parse_or(lookup, "ML_TEST_FRACTION", d.test_fraction)?,
        };

        if !(0.0..1.0).contains(&config.test_fraction) {
            bail!(
                "ML_TEST_FRACTION must be in [0, 1), got {}",
                config.test_fraction
            );
        }
        if config.label_threshold < 0.0 {
            bail!("LABEL_THRESHOLD must not be negative");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::map_lookup;

    #[test]
    fn test_ml_config_defaults() {
        let config = MlEnvConfig::from_lookup(&map_lookup(&[])).unwrap();
        assert_eq!(config.label_threshold, 0.002);
        assert_eq!(config.min_training_rows, 50);
        assert_eq!(config.n_trees, 100);
    }

    #[test]
    fn test_test_fraction_bounds() {
        let lookup = map_lookup(&[("ML_TEST_FRACTION", "1.5")]);
        assert!(MlEnvConfig::from_lookup(&lookup).is_err());
    }
}
