use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bar interval requested from a market-data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    OneMin,
    FiveMin,
    FifteenMin,
    ThirtyMin,
    OneHour,
    FourHour,
    OneDay,
}

impl Interval {
    /// Converts to MEXC spot kline interval string
    pub fn to_mexc_string(&self) -> &'static str {
        match self {
            Interval::OneMin => "1m",
            Interval::FiveMin => "5m",
            Interval::FifteenMin => "15m",
            Interval::ThirtyMin => "30m",
            Interval::OneHour => "60m",
            Interval::FourHour => "4h",
            Interval::OneDay => "1d",
        }
    }

    /// Converts to Yahoo chart interval string. Yahoo has no 4h bars.
    pub fn to_yahoo_string(&self) -> Option<&'static str> {
        match self {
            Interval::OneMin => Some("1m"),
            Interval::FiveMin => Some("5m"),
            Interval::FifteenMin => Some("15m"),
            Interval::ThirtyMin => Some("30m"),
            Interval::OneHour => Some("1h"),
            Interval::FourHour => None,
            Interval::OneDay => Some("1d"),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Interval::OneMin => "1m",
            Interval::FiveMin => "5m",
            Interval::FifteenMin => "15m",
            Interval::ThirtyMin => "30m",
            Interval::OneHour => "1h",
            Interval::FourHour => "4h",
            Interval::OneDay => "1d",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Interval {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1m" | "1min" => Ok(Interval::OneMin),
            "5m" | "5min" => Ok(Interval::FiveMin),
            "15m" | "15min" => Ok(Interval::FifteenMin),
            "30m" | "30min" => Ok(Interval::ThirtyMin),
            "1h" | "60m" | "1hour" => Ok(Interval::OneHour),
            "4h" | "4hour" => Ok(Interval::FourHour),
            "1d" | "1day" => Ok(Interval::OneDay),
            _ => Err(anyhow!(
                "Invalid interval: {}. Must be one of 1m, 5m, 15m, 30m, 1h, 4h, 1d",
                s
            )),
        }
    }
}

/// How much history to request: a lookback range for range-based providers
/// and a bar limit for count-based ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchWindow {
    pub interval: Interval,
    /// Yahoo-style range, e.g. "3mo"
    pub range: String,
    /// Maximum number of bars for count-based providers
    pub limit: usize,
}

impl Default for FetchWindow {
    fn default() -> Self {
        Self {
            interval: Interval::OneHour,
            range: "3mo".to_string(),
            limit: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_parsing() {
        assert_eq!(Interval::from_str("1h").unwrap(), Interval::OneHour);
        assert_eq!(Interval::from_str("60m").unwrap(), Interval::OneHour);
        assert_eq!(Interval::from_str("1D").unwrap(), Interval::OneDay);
        assert!(Interval::from_str("2h").is_err());
    }

    #[test]
    fn test_provider_strings() {
        assert_eq!(Interval::OneHour.to_mexc_string(), "60m");
        assert_eq!(Interval::OneHour.to_yahoo_string(), Some("1h"));
        assert_eq!(Interval::FourHour.to_yahoo_string(), None);
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for interval in [
            Interval::OneMin,
            Interval::FiveMin,
            Interval::FifteenMin,
            Interval::ThirtyMin,
            Interval::OneHour,
            Interval::FourHour,
            Interval::OneDay,
        ] {
            assert_eq!(Interval::from_str(&interval.to_string()).unwrap(), interval);
        }
    }
}
