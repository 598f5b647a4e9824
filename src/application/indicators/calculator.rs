use crate::application::indicators::ichimoku::{IchimokuParams, ichimoku};
use crate::application::indicators::{momentum, trend};
use crate::application::market_data::signal_generator::SignalGenerator;
use crate::config::IndicatorEnvConfig;
use crate::domain::errors::IndicatorError;
use crate::domain::market::candle::first_unordered_index;
use crate::domain::market::{Candle, IndicatorRow};

/// Turns an ordered candle series into indicator rows with a rule signal.
#[derive(Debug, Clone)]
pub struct IndicatorCalculator {
    params: IchimokuParams,
    rsi_period: usize,
    ema_period: usize,
    signals: SignalGenerator,
}

impl Default for IndicatorCalculator {
    fn default() -> Self {
        Self {
            params: IchimokuParams::default(),
            rsi_period: 14,
            ema_period: 20,
            signals: SignalGenerator::default(),
        }
    }
}

impl IndicatorCalculator {
    pub fn new(
        params: IchimokuParams,
        rsi_period: usize,
        ema_period: usize,
        signals: SignalGenerator,
    ) -> Result<Self, IndicatorError> {
        params.validate()?;
        if rsi_period == 0 {
            return Err(IndicatorError::InvalidPeriod {
                name: "rsi",
                period: rsi_period,
            });
        }
        if ema_period == 0 {
            return Err(IndicatorError::InvalidPeriod {
                name: "ema",
                period: ema_period,
            });
        }
        Ok(Self {
            params,
            rsi_period,
            ema_period,
            signals,
        })
    }

    pub fn from_config(config: &IndicatorEnvConfig) -> Result<Self, IndicatorError> {
        let params = IchimokuParams {
            tenkan: config.tenkan_period,
            kijun: config.kijun_period,
            senkou_b: config.senkou_b_period,
            displacement: config.displacement,
        };
        Self::new(
            params,
            config.rsi_period,
            config.ema_period,
            SignalGenerator::new(config.chikou_confirmation, config.displacement),
        )
    }

    pub fn params(&self) -> &IchimokuParams {
        &self.params
    }

    /// One row per candle, same order. Fails on an unordered series.
    pub fn calculate(&self, candles: &[Candle]) -> Result<Vec<IndicatorRow>, IndicatorError> {
        if let Some(index) = first_unordered_index(candles) {
            return Err(IndicatorError::UnorderedSeries { index });
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let lines = ichimoku(candles, &self.params)?;
        let rsi = momentum::rsi(&closes, self.rsi_period)?;
        let ema = trend::ema(&closes, self.ema_period)?;

        let mut rows: Vec<IndicatorRow> = candles
            .iter()
            .enumerate()
            .map(|(i, candle)| IndicatorRow {
                timestamp: candle.timestamp,
                close: candle.close,
                tenkan: lines.tenkan[i],
                kijun: lines.kijun[i],
                senkou_a: lines.senkou_a[i],
                senkou_b: lines.senkou_b[i],
                chikou: lines.chikou[i],
                rsi: rsi[i],
                ema: ema[i],
                signal: None,
            })
            .collect();

        self.signals.annotate(&mut rows);
        Ok(rows)
    }
}
