//! Relative Strength Index with simple-mean smoothing.

use crate::domain::errors::IndicatorError;

/// RSI over one-period close differences.
///
/// `RS = mean(gains, period) / mean(losses, period)`. The first `period`
/// entries are `None`. A flat window yields 50, a window without losses 100.
/// Each window is summed on its own, so a flat stretch is exactly flat at any
/// price scale.
pub fn rsi(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod {
            name: "rsi",
            period,
        });
    }

    let changes: Vec<f64> = closes.windows(2).map(|pair| pair[1] - pair[0]).collect();
    let mut out = vec![None; closes.len()];

    // row `end` closes the window of differences `end - period .. end`
    for end in period..=changes.len() {
        let window = &changes[end - period..end];
        let gain = window.iter().map(|c| c.max(0.0)).sum::<f64>() / period as f64;
        let loss = window.iter().map(|c| (-c).max(0.0)).sum::<f64>() / period as f64;
        out[end] = Some(rsi_from_averages(gain, loss));
    }
    Ok(out)
}

fn rsi_from_averages(gain: f64, loss: f64) -> f64 {
    match (gain > 0.0, loss > 0.0) {
        (false, false) => 50.0,
        (_, false) => 100.0,
        _ => (100.0 - 100.0 / (1.0 + gain / loss)).clamp(0.0, 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn test_first_fourteen_rows_are_null() {
        let values = rsi(&zigzag(40), 14).unwrap();
        assert_eq!(values.len(), 40);
        assert!(values[..14].iter().all(Option::is_none));
        assert!(values[14].is_some());
    }

    #[test]
    fn test_rsi_stays_within_bounds() {
        let values = rsi(&zigzag(200), 14).unwrap();
        for v in values.into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "rsi out of range: {}", v);
        }
    }

    #[test]
    fn test_monotone_rise_is_100() {
        let closes: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let values = rsi(&closes, 14).unwrap();
        assert_eq!(values[29], Some(100.0));
    }

    #[test]
    fn test_flat_series_is_50() {
        let values = rsi(&[3.0; 30], 14).unwrap();
        assert_eq!(values[20], Some(50.0));
    }

    #[test]
    fn test_flat_stretch_after_moves_is_50() {
        let mut closes = zigzag(40);
        let last = closes[39];
        closes.extend(std::iter::repeat_n(last, 20));
        let values = rsi(&closes, 14).unwrap();
        assert_eq!(values[59], Some(50.0));
    }

    #[test]
    fn test_micro_priced_series_keeps_its_moves() {
        // +2e-13 / -1e-13 alternating: RS = 2 over any even window
        let mut closes = vec![1e-9];
        for i in 0..30 {
            let step = if i % 2 == 0 { 2e-13 } else { -1e-13 };
            closes.push(closes[i] + step);
        }
        let values = rsi(&closes, 14).unwrap();
        let expected = 100.0 - 100.0 / 3.0;
        assert!((values[14].unwrap() - expected).abs() < 1e-3);
        assert!((values[30].unwrap() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_known_value() {
        // gains sum 2, losses sum 1 over a 3-period window
        let values = rsi(&[10.0, 11.0, 10.0, 11.0], 3).unwrap();
        let expected = 100.0 - 100.0 / (1.0 + 2.0);
        assert!((values[3].unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input() {
        assert!(rsi(&[], 14).unwrap().is_empty());
        assert!(rsi(&[1.0], 0).is_err());
    }
}
