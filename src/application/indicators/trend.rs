//! Exponential moving average.

use crate::domain::errors::IndicatorError;
use ta::Next;
use ta::indicators::ExponentialMovingAverage;

/// EMA seeded with the first close, `alpha = 2 / (period + 1)`. Defined from
/// the first row on.
pub fn ema(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    let mut ema = ExponentialMovingAverage::new(period).map_err(|_| IndicatorError::InvalidPeriod {
        name: "ema",
        period,
    })?;
    Ok(closes.iter().map(|close| Some(ema.next(*close))).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_first_close() {
        let values = ema(&[42.0, 50.0, 60.0], 20).unwrap();
        assert_eq!(values[0], Some(42.0));
    }

    #[test]
    fn test_second_value_uses_alpha() {
        let values = ema(&[10.0, 31.0], 20).unwrap();
        let alpha = 2.0 / 21.0;
        let expected = alpha * 31.0 + (1.0 - alpha) * 10.0;
        assert!((values[1].unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_approaches_a_new_level_monotonically() {
        let mut closes = vec![10.0; 5];
        closes.extend(std::iter::repeat_n(20.0, 100));
        let values: Vec<f64> = ema(&closes, 20).unwrap().into_iter().flatten().collect();

        for pair in values[5..].windows(2) {
            assert!(pair[1] >= pair[0]);
            assert!(pair[1] <= 20.0);
        }
        assert!((values[104] - 20.0).abs() < 0.01);
    }

    #[test]
    fn test_zero_period_is_rejected() {
        assert!(ema(&[1.0], 0).is_err());
    }
}
