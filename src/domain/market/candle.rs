use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar for a single symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// All price and volume fields are finite numbers.
    pub fn is_finite(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Sorts candles by timestamp and drops duplicate buckets, keeping the last
/// occurrence of each timestamp.
pub fn normalize_series(mut candles: Vec<Candle>) -> Vec<Candle> {
    candles.retain(Candle::is_finite);
    candles.sort_by_key(|c| c.timestamp);

    let mut out: Vec<Candle> = Vec::with_capacity(candles.len());
    for candle in candles {
        match out.last_mut() {
            Some(last) if last.timestamp == candle.timestamp => *last = candle,
            _ => out.push(candle),
        }
    }
    out
}

/// Returns the index of the first candle that is not strictly after its
/// predecessor, if any.
pub fn first_unordered_index(candles: &[Candle]) -> Option<usize> {
    candles
        .windows(2)
        .position(|w| w[1].timestamp <= w[0].timestamp)
        .map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn candle(hour: u32, close: f64) -> Candle {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap();
        Candle::new(ts, close, close, close, close, 1.0)
    }

    #[test]
    fn test_normalize_sorts_and_dedups() {
        let series = vec![candle(2, 3.0), candle(0, 1.0), candle(2, 4.0), candle(1, 2.0)];
        let out = normalize_series(series);
        let closes: Vec<f64> = out.iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 4.0]);
        assert!(first_unordered_index(&out).is_none());
    }

    #[test]
    fn test_normalize_drops_non_finite_rows() {
        let mut bad = candle(1, 2.0);
        bad.high = f64::NAN;
        let out = normalize_series(vec![candle(0, 1.0), bad]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_first_unordered_index() {
        let series = vec![candle(0, 1.0), candle(2, 1.0), candle(1, 1.0)];
        assert_eq!(first_unordered_index(&series), Some(2));
    }
}
