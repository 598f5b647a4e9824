//! Supervised targets for the signal classifier.

use crate::domain::market::IndicatorRow;
use crate::domain::ml::feature_registry::FeatureVector;
use chrono::{DateTime, Utc};

/// One training example: a row's features and the class of the next move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledSample {
    pub timestamp: DateTime<Utc>,
    pub features: FeatureVector,
    pub class: i32,
}

/// 1 when `next` closes above `close * (1 + threshold)`, -1 below
/// `close * (1 - threshold)`, 0 in between.
pub fn label_move(close: f64, next: f64, threshold: f64) -> i32 {
    if next > close * (1.0 + threshold) {
        1
    } else if next < close * (1.0 - threshold) {
        -1
    } else {
        0
    }
}

/// Labels an ordered series. The last row has no successor and rows with any
/// undefined feature are dropped.
pub fn label_rows(rows: &[IndicatorRow], threshold: f64) -> Vec<LabeledSample> {
    rows.windows(2)
        .filter_map(|pair| {
            let features = FeatureVector::from_row(&pair[0])?;
            if !features.is_finite() {
                return None;
            }
            Some(LabeledSample {
                timestamp: pair[0].timestamp,
                features,
                class: label_move(pair[0].close, pair[1].close, threshold),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn row(i: i64, close: f64, complete: bool) -> IndicatorRow {
        let v = complete.then_some(1.0);
        IndicatorRow {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(i),
            close,
            tenkan: v,
            kijun: v,
            senkou_a: v,
            senkou_b: v,
            chikou: v,
            rsi: v,
            ema: v,
            signal: None,
        }
    }

    #[test]
    fn test_label_thresholds() {
        assert_eq!(label_move(100.0, 100.3, 0.002), 1);
        assert_eq!(label_move(100.0, 99.7, 0.002), -1);
        assert_eq!(label_move(100.0, 100.1, 0.002), 0);
        assert_eq!(label_move(100.0, 99.85, 0.002), 0);
    }

    #[test]
    fn test_label_rows_drops_incomplete_and_last() {
        let rows = vec![
            row(0, 100.0, false),
            row(1, 100.0, true),
            row(2, 101.0, true),
            row(3, 99.0, true),
        ];
        let samples = label_rows(&rows, 0.002);

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].class, 1);
        assert_eq!(samples[1].class, -1);
        assert_eq!(samples[0].timestamp, rows[1].timestamp);
    }
}
