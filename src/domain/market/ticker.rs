use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upstream market-data source for a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    Yahoo,
    Mexc,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Yahoo => write!(f, "Yahoo"),
            Provider::Mexc => write!(f, "MEXC"),
        }
    }
}

/// Ticker names become file names under the data directory: ASCII letters,
/// digits, `_`, `-` and `.`, without a leading dot.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// A tracked instrument: the local name used for file names and the symbol as
/// the provider knows it (e.g. `BTC` / `BTC-USD`, `SHX` / `SHXUSDT`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker {
    pub name: String,
    pub symbol: String,
}

impl Ticker {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }

    /// Yahoo quotes fiat pairs as `BASE-USD`; everything else goes to MEXC.
    pub fn provider(&self) -> Provider {
        if self.symbol.contains("-USD") {
            Provider::Yahoo
        } else {
            Provider::Mexc
        }
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.symbol)
    }
}

impl FromStr for Ticker {
    type Err = anyhow::Error;

    /// Parses `NAME=SYMBOL`, or a bare `SYMBOL` used as its own name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            bail!("Empty ticker entry");
        }
        let (name, symbol) = match s.split_once('=') {
            Some((name, symbol)) => {
                let (name, symbol) = (name.trim(), symbol.trim());
                if name.is_empty() || symbol.is_empty() {
                    bail!("Invalid ticker entry: '{}'. Expected NAME=SYMBOL", s);
                }
                (name, symbol)
            }
            None => (s, s),
        };
        if !is_valid_name(name) {
            bail!("Invalid ticker name '{}': use letters, digits, '_', '-' or '.'", name);
        }
        Ok(Ticker::new(name, symbol))
    }
}

/// Parses a comma-separated ticker list such as `BTC=BTC-USD,SHX=SHXUSDT`.
pub fn parse_ticker_list(list: &str) -> Result<Vec<Ticker>> {
    list.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(Ticker::from_str)
        .collect()
}

/// Default ticker universe.
pub fn default_tickers() -> Vec<Ticker> {
    vec![
        Ticker::new("BTC", "BTC-USD"),
        Ticker::new("ETH", "ETH-USD"),
        Ticker::new("DOGE", "DOGE-USD"),
        Ticker::new("ZBC", "ZBCUSDT"),
        Ticker::new("SHX", "SHXUSDT"),
        Ticker::new("XPL", "XPLUSDT"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_routing() {
        assert_eq!(Ticker::new("BTC", "BTC-USD").provider(), Provider::Yahoo);
        assert_eq!(Ticker::new("SHX", "SHXUSDT").provider(), Provider::Mexc);
    }

    #[test]
    fn test_parse_ticker_list() {
        let tickers = parse_ticker_list("BTC=BTC-USD, XPL=XPLUSDT,DOGEUSDT,").unwrap();
        assert_eq!(tickers.len(), 3);
        assert_eq!(tickers[0], Ticker::new("BTC", "BTC-USD"));
        assert_eq!(tickers[1], Ticker::new("XPL", "XPLUSDT"));
        assert_eq!(tickers[2], Ticker::new("DOGEUSDT", "DOGEUSDT"));
    }

    #[test]
    fn test_parse_rejects_half_entries() {
        assert!(parse_ticker_list("BTC=").is_err());
        assert!(parse_ticker_list("=BTC-USD").is_err());
    }

    #[test]
    fn test_parse_rejects_path_like_names() {
        assert!(parse_ticker_list("../x=BTC-USD").is_err());
        assert!(parse_ticker_list(".hidden=SHXUSDT").is_err());
        assert!(parse_ticker_list("a/b").is_err());
        assert!("BTC.old=BTC-USD".parse::<Ticker>().is_ok());
    }
}
