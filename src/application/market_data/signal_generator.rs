use crate::domain::market::IndicatorRow;
use crate::domain::signal::Signal;

/// Rule-based Ichimoku signal.
///
/// Bullish when Tenkan is above Kijun and the close is above the whole cloud,
/// bearish on the mirrored condition, neutral otherwise. With
/// `chikou_confirmation` the close must also be above (below) the close
/// `displacement` bars earlier, which is where the lagging span is plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalGenerator {
    pub chikou_confirmation: bool,
    pub displacement: usize,
}

impl Default for SignalGenerator {
    fn default() -> Self {
        Self {
            chikou_confirmation: true,
            displacement: 26,
        }
    }
}

impl SignalGenerator {
    pub fn new(chikou_confirmation: bool, displacement: usize) -> Self {
        Self {
            chikou_confirmation,
            displacement,
        }
    }

    /// Classifies one row. `lagged_close` is the close `displacement` bars
    /// back; it is only consulted when confirmation is enabled. Any missing
    /// input yields `Neutral`.
    pub fn generate_signal(&self, row: &IndicatorRow, lagged_close: Option<f64>) -> Signal {
        let (Some(tenkan), Some(kijun), Some(top), Some(bottom)) =
            (row.tenkan, row.kijun, row.cloud_top(), row.cloud_bottom())
        else {
            return Signal::Neutral;
        };

        let lagged = if self.chikou_confirmation {
            match lagged_close {
                Some(v) => Some(v),
                None => return Signal::Neutral,
            }
        } else {
            None
        };

        let close = row.close;
        let bullish = tenkan > kijun && close > top && lagged.is_none_or(|past| close > past);
        let bearish = tenkan < kijun && close < bottom && lagged.is_none_or(|past| close < past);

        if bullish {
            Signal::Bullish
        } else if bearish {
            Signal::Bearish
        } else {
            Signal::Neutral
        }
    }

    /// Fills `signal` on every row of an ordered series.
    pub fn annotate(&self, rows: &mut [IndicatorRow]) {
        let closes: Vec<f64> = rows.iter().map(|r| r.close).collect();
        for (i, row) in rows.iter_mut().enumerate() {
            let lagged = i.checked_sub(self.displacement).map(|j| closes[j]);
            row.signal = Some(self.generate_signal(row, lagged));
        }
    }
}
