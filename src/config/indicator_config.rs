//! Indicator and signal-rule configuration parsing from environment variables.

use super::{Lookup, parse_or};
use crate::domain::signal::SignalLabels;
use anyhow::Result;

/// Indicator environment configuration
#[derive(Debug, Clone)]
pub struct IndicatorEnvConfig {
    // Ichimoku
    pub tenkan_period: usize,
    pub kijun_period: usize,
    pub senkou_b_period: usize,
    pub displacement: usize,

    // Oscillators
    pub rsi_period: usize,
    pub ema_period: usize,

    // Signal rule
    pub chikou_confirmation: bool,
    pub signal_labels: SignalLabels,
}

impl Default for IndicatorEnvConfig {
    fn default() -> Self {
        Self {
            tenkan_period: 9,
            kijun_period: 26,
            senkou_b_period: 52,
            displacement: 26,
            rsi_period: 14,
            ema_period: 20,
            chikou_confirmation: true,
            signal_labels: SignalLabels::TrafficLight,
        }
    }
}

impl IndicatorEnvConfig {
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            tenkan_period: parse_or(lookup, "TENKAN_PERIOD", d.tenkan_period)?,
            kijun_period: parse_or(lookup, "KIJUN_PERIOD", d.kijun_period)?,
            senkou_b_period: parse_or(lookup, "SENKOU_B_PERIOD", d.senkou_b_period)?,
            displacement: parse_or(lookup, "DISPLACEMENT", d.displacement)?,
            rsi_period: parse_or(lookup, "RSI_PERIOD", d.rsi_period)?,
            ema_period: parse_or(lookup, "EMA_PERIOD", d.ema_period)?,
            chikou_confirmation: parse_or(lookup, "CHIKOU_CONFIRMATION", d.chikou_confirmation)?,
            signal_labels: parse_or(lookup, "SIGNAL_LABELS", d.signal_labels)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::map_lookup;

    #[test]
    fn test_indicator_config_defaults() {
        let config = IndicatorEnvConfig::from_lookup(&map_lookup(&[])).unwrap();
        assert_eq!(config.tenkan_period, 9);
        assert_eq!(config.kijun_period, 26);
        assert_eq!(config.senkou_b_period, 52);
        assert_eq!(config.displacement, 26);
        assert_eq!(config.rsi_period, 14);
        assert_eq!(config.ema_period, 20);
        assert!(config.chikou_confirmation);
    }

    #[test]
    fn test_signal_labels_override() {
        let lookup = map_lookup(&[("SIGNAL_LABELS", "spanish"), ("CHIKOU_CONFIRMATION", "false")]);
        let config = IndicatorEnvConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.signal_labels, SignalLabels::Spanish);
        assert!(!config.chikou_confirmation);
    }
}
