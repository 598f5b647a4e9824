use crate::domain::signal::Signal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The close of one candle together with its derived indicators. This is
/// the shape persisted for the dashboard.
///
/// Every indicator is `None` while its rolling window is unfilled or, for the
/// displaced Ichimoku lines, where the shift runs off the end of the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub tenkan: Option<f64>,
    pub kijun: Option<f64>,
    pub senkou_a: Option<f64>,
    pub senkou_b: Option<f64>,
    pub chikou: Option<f64>,
    pub rsi: Option<f64>,
    pub ema: Option<f64>,
    pub signal: Option<Signal>,
}

impl IndicatorRow {
    /// Upper cloud boundary, defined only when both spans are.
    pub fn cloud_top(&self) -> Option<f64> {
        Some(self.senkou_a?.max(self.senkou_b?))
    }

    /// Lower cloud boundary, defined only when both spans are.
    pub fn cloud_bottom(&self) -> Option<f64> {
        Some(self.senkou_a?.min(self.senkou_b?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(senkou_a: Option<f64>, senkou_b: Option<f64>) -> IndicatorRow {
        IndicatorRow {
            timestamp: Utc::now(),
            close: 1.0,
            tenkan: None,
            kijun: None,
            senkou_a,
            senkou_b,
            chikou: None,
            rsi: None,
            ema: None,
            signal: None,
        }
    }

    #[test]
    fn test_cloud_bounds() {
        let r = row(Some(2.0), Some(5.0));
        assert_eq!(r.cloud_top(), Some(5.0));
        assert_eq!(r.cloud_bottom(), Some(2.0));
    }

    #[test]
    fn test_cloud_bounds_need_both_spans() {
        let r = row(Some(2.0), None);
        assert_eq!(r.cloud_top(), None);
        assert_eq!(r.cloud_bottom(), None);
    }
}
