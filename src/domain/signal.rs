//! Signal categories attached to indicator rows.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Directional read of a single indicator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Bullish,
    Bearish,
    Neutral,
}

impl Signal {
    /// Traffic-light colour shown on the dashboard.
    pub fn color(&self) -> &'static str {
        match self {
            Signal::Bullish => "green",
            Signal::Bearish => "red",
            Signal::Neutral => "yellow",
        }
    }

    pub fn spanish(&self) -> &'static str {
        match self {
            Signal::Bullish => "alcista",
            Signal::Bearish => "bajista",
            Signal::Neutral => "neutral",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Bullish => "bullish",
            Signal::Bearish => "bearish",
            Signal::Neutral => "neutral",
        }
    }

    /// Class id used by the classifier: 1 up, -1 down, 0 flat.
    pub fn from_class(class: i32) -> Self {
        match class {
            c if c > 0 => Signal::Bullish,
            c if c < 0 => Signal::Bearish,
            _ => Signal::Neutral,
        }
    }

    /// Accepts every label style written by the pipeline.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "bullish" | "green" | "alcista" => Some(Signal::Bullish),
            "bearish" | "red" | "bajista" => Some(Signal::Bearish),
            "neutral" | "yellow" | "unknown" => Some(Signal::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Vocabulary used for the `signal` field of persisted indicator rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignalLabels {
    /// green / yellow / red
    #[default]
    TrafficLight,
    /// alcista / neutral / bajista
    Spanish,
}

impl SignalLabels {
    pub fn label(&self, signal: Signal) -> &'static str {
        match self {
            SignalLabels::TrafficLight => signal.color(),
            SignalLabels::Spanish => signal.spanish(),
        }
    }
}

impl FromStr for SignalLabels {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "traffic_light" | "traffic-light" | "color" | "colour" => {
                Ok(SignalLabels::TrafficLight)
            }
            "spanish" | "es" => Ok(SignalLabels::Spanish),
            _ => Err(anyhow!(
                "Invalid SIGNAL_LABELS: {}. Must be 'traffic_light' or 'spanish'",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_back_from_every_style() {
        for signal in [Signal::Bullish, Signal::Bearish, Signal::Neutral] {
            for style in [SignalLabels::TrafficLight, SignalLabels::Spanish] {
                assert_eq!(Signal::from_label(style.label(signal)), Some(signal));
            }
            assert_eq!(Signal::from_label(signal.as_str()), Some(signal));
        }
        assert_eq!(Signal::from_label("purple"), None);
    }

    #[test]
    fn test_class_mapping() {
        assert_eq!(Signal::from_class(1), Signal::Bullish);
        assert_eq!(Signal::from_class(-1), Signal::Bearish);
        assert_eq!(Signal::from_class(0), Signal::Neutral);
        assert_eq!(Signal::from_class(7), Signal::Bullish);
    }

    #[test]
    fn test_signal_labels_parsing() {
        assert_eq!(
            SignalLabels::from_str("SPANISH").unwrap(),
            SignalLabels::Spanish
        );
        assert_eq!(
            SignalLabels::from_str("traffic_light").unwrap(),
            SignalLabels::TrafficLight
        );
        assert!(SignalLabels::from_str("klingon").is_err());
    }
}
