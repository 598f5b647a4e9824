//! Ichimoku Kinko Hyo lines over a candle series.
//!
//! Every output vector has one entry per input candle. Rolling lines are
//! `None` until their window is filled; the displaced spans are `None` where
//! the shift runs off either end of the series.

use crate::domain::errors::IndicatorError;
use crate::domain::market::Candle;
use ta::Next;
use ta::indicators::{Maximum, Minimum};

/// Window lengths of the five Ichimoku lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IchimokuParams {
    pub tenkan: usize,
    pub kijun: usize,
    pub senkou_b: usize,
    /// Forward shift of the cloud spans and backward shift of Chikou.
    pub displacement: usize,
}

impl Default for IchimokuParams {
    fn default() -> Self {
        Self {
            tenkan: 9,
            kijun: 26,
            senkou_b: 52,
            displacement: 26,
        }
    }
}

impl IchimokuParams {
    pub fn validate(&self) -> Result<(), IndicatorError> {
        for (name, period) in [
            ("tenkan", self.tenkan),
            ("kijun", self.kijun),
            ("senkou_b", self.senkou_b),
            ("displacement", self.displacement),
        ] {
            if period == 0 {
                return Err(IndicatorError::InvalidPeriod { name, period });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IchimokuLines {
    pub tenkan: Vec<Option<f64>>,
    pub kijun: Vec<Option<f64>>,
    pub senkou_a: Vec<Option<f64>>,
    pub senkou_b: Vec<Option<f64>>,
    pub chikou: Vec<Option<f64>>,
}

pub fn ichimoku(candles: &[Candle], params: &IchimokuParams) -> Result<IchimokuLines, IndicatorError> {
    params.validate()?;

    let tenkan = midpoint("tenkan", candles, params.tenkan)?;
    let kijun = midpoint("kijun", candles, params.kijun)?;

    let span_a: Vec<Option<f64>> = tenkan
        .iter()
        .zip(&kijun)
        .map(|(t, k)| Some(((*t)? + (*k)?) / 2.0))
        .collect();
    let span_b = midpoint("senkou_b", candles, params.senkou_b)?;

    let closes: Vec<Option<f64>> = candles.iter().map(|c| Some(c.close)).collect();

    Ok(IchimokuLines {
        tenkan,
        kijun,
        senkou_a: shift_forward(&span_a, params.displacement),
        senkou_b: shift_forward(&span_b, params.displacement),
        chikou: shift_backward(&closes, params.displacement),
    })
}

/// `(highest high + lowest low) / 2` over the trailing `period` candles.
pub fn midpoint(
    name: &'static str,
    candles: &[Candle],
    period: usize,
) -> Result<Vec<Option<f64>>, IndicatorError> {
    let mut highest = Maximum::new(period).map_err(|_| IndicatorError::InvalidPeriod { name, period })?;
    let mut lowest = Minimum::new(period).map_err(|_| IndicatorError::InvalidPeriod { name, period })?;

    Ok(candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            let high = highest.next(candle.high);
            let low = lowest.next(candle.low);
            (i + 1 >= period).then_some((high + low) / 2.0)
        })
        .collect())
}

/// Value at `i` becomes the value computed at `i - shift`.
pub fn shift_forward(values: &[Option<f64>], shift: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| i.checked_sub(shift).and_then(|j| values[j]))
        .collect()
}

/// Value at `i` becomes the value observed at `i + shift`.
pub fn shift_backward(values: &[Option<f64>], shift: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| values.get(i + shift).copied().flatten())
        .collect()
}
