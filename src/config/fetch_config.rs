//! Fetch-stage configuration parsing from environment variables.
//!
//! This module handles the ticker universe, the requested window and the
//! provider endpoints.

use super::{Lookup, parse_or};
use crate::domain::market::ticker::{default_tickers, parse_ticker_list};
use crate::domain::market::{FetchWindow, Interval, Ticker};
use anyhow::{Context, Result, bail};

/// Fetch environment configuration
#[derive(Debug, Clone)]
pub struct FetchEnvConfig {
    pub tickers: Vec<Ticker>,
    pub window: FetchWindow,
    /// Attempts per ticker before the symbol is reported unavailable
    pub attempts: u32,
    /// Fixed pause between attempts
    pub backoff_ms: u64,
    pub http_timeout_secs: u64,
    /// Transport-level retries done inside the HTTP client
    pub transient_retries: u32,
    pub yahoo_base_url: String,
    pub mexc_base_url: String,
}

impl Default for FetchEnvConfig {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
            window: FetchWindow::default(),
            attempts: 3,
            backoff_ms: 2000,
            http_timeout_secs: 10,
            transient_retries: 2,
            yahoo_base_url: "https://query1.finance.yahoo.com".to_string(),
            mexc_base_url: "https://api.mexc.com".to_string(),
        }
    }
}

impl FetchEnvConfig {
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        let defaults = Self::default();

        let tickers = match lookup("TICKERS") {
            Some(list) if !list.trim().is_empty() => {
                parse_ticker_list(&list).context("Failed to parse TICKERS")?
            }
            _ => defaults.tickers,
        };

        let window = FetchWindow {
            interval: parse_or::<Interval>(lookup, "FETCH_INTERVAL", defaults.window.interval)?,
            range: lookup("FETCH_RANGE").unwrap_or(defaults.window.range),
            limit: parse_or(lookup, "FETCH_LIMIT", defaults.window.limit)?,
        };

        let attempts = parse_or(lookup, "FETCH_ATTEMPTS", defaults.attempts)?;
        if attempts == 0 {
            bail!("FETCH_ATTEMPTS must be at least 1");
        }

        Ok(Self {
            tickers,
            window,
            attempts,
            backoff_ms: parse_or(lookup, "FETCH_BACKOFF_MS", defaults.backoff_ms)?,
            http_timeout_secs: parse_or(lookup, "HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            transient_retries: parse_or(
                lookup,
                "HTTP_TRANSIENT_RETRIES",
                defaults.transient_retries,
            )?,
            yahoo_base_url: lookup("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url),
            mexc_base_url: lookup("MEXC_BASE_URL").unwrap_or(defaults.mexc_base_url),
        })
    }
}
