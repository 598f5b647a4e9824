use crate::domain::market::IndicatorRow;
use serde::{Deserialize, Serialize};

/// Ordered list of classifier feature names.
/// Any change here is a breaking change for persisted models.
pub const FEATURE_NAMES: &[&str] = &[
    "tenkan", "kijun", "senkou_a", "senkou_b", "chikou", "rsi", "ema",
];

pub const FEATURE_COUNT: usize = 7;

/// The seven classifier inputs of one indicator row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub tenkan: f64,
    pub kijun: f64,
    pub senkou_a: f64,
    pub senkou_b: f64,
    pub chikou: f64,
    pub rsi: f64,
    pub ema: f64,
}

impl FeatureVector {
    /// Extracts the features of a row; `None` when any of them is undefined.
    pub fn from_row(row: &IndicatorRow) -> Option<Self> {
        Some(Self {
            tenkan: row.tenkan?,
            kijun: row.kijun?,
            senkou_a: row.senkou_a?,
            senkou_b: row.senkou_b?,
            chikou: row.chikou?,
            rsi: row.rsi?,
            ema: row.ema?,
        })
    }

    /// Values in `FEATURE_NAMES` order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.tenkan,
            self.kijun,
            self.senkou_a,
            self.senkou_b,
            self.chikou,
            self.rsi,
            self.ema,
        ]
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.to_array().to_vec()
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

pub fn feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn full_row() -> IndicatorRow {
        IndicatorRow {
            timestamp: Utc::now(),
            close: 10.0,
            tenkan: Some(1.0),
            kijun: Some(2.0),
            senkou_a: Some(3.0),
            senkou_b: Some(4.0),
            chikou: Some(5.0),
            rsi: Some(6.0),
            ema: Some(7.0),
            signal: None,
        }
    }

    #[test]
    fn test_feature_vector_length() {
        assert_eq!(FEATURE_NAMES.len(), FEATURE_COUNT);
        let fv = FeatureVector::from_row(&full_row()).unwrap();
        assert_eq!(fv.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_missing_feature_yields_none() {
        let mut row = full_row();
        row.chikou = None;
        assert!(FeatureVector::from_row(&row).is_none());
    }
}
