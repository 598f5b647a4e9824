//! Yahoo Finance Market Data Service
//!
//! Hourly history for `BASE-USD` pairs through the public v8 chart endpoint.

use crate::domain::errors::MarketDataError;
use crate::domain::market::candle::normalize_series;
use crate::domain::market::{Candle, FetchWindow, Provider};
use crate::domain::ports::MarketDataService;
use crate::infrastructure::core::http_client_factory::{
    HttpClientFactory, HttpClientSettings, build_url_with_query,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

/// Yahoo leaves gaps as `null` inside each column.
#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

pub struct YahooMarketDataService {
    client: ClientWithMiddleware,
    base_url: String,
}

impl YahooMarketDataService {
    pub fn builder() -> YahooMarketDataServiceBuilder {
        YahooMarketDataServiceBuilder::default()
    }
}

#[derive(Default)]
pub struct YahooMarketDataServiceBuilder {
    base_url: Option<String>,
    settings: Option<HttpClientSettings>,
}

impl YahooMarketDataServiceBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn http_settings(mut self, settings: HttpClientSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn build(self) -> YahooMarketDataService {
        YahooMarketDataService {
            client: HttpClientFactory::create_client(self.settings.unwrap_or_default()),
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_YAHOO_BASE_URL.to_string()),
        }
    }
}

#[async_trait]
impl MarketDataService for YahooMarketDataService {
    fn provider(&self) -> Provider {
        Provider::Yahoo
    }

    async fn get_historical_bars(
        &self,
        symbol: &str,
        window: &FetchWindow,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let Some(interval) = window.interval.to_yahoo_string() else {
            return Err(unsupported(
                symbol,
                format!("interval {} is not offered by Yahoo", window.interval),
            ));
        };

        let url = build_url_with_query(
            &self.base_url,
            &format!("/v8/finance/chart/{}", symbol),
            &[("range", window.range.as_str()), ("interval", interval)],
        )
        .map_err(|e| transport(format!("invalid Yahoo URL: {}", e)))?;

        debug!(%url, "YahooMarketDataService: Fetching chart");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport(e.to_string()))?;

        let envelope: Option<ChartEnvelope> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let detail = envelope
                .as_ref()
                .and_then(|e| e.chart.error.as_ref())
                .map(describe_error)
                .unwrap_or_else(|| body.clone());
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(unsupported(symbol, detail));
            }
            return Err(transport(format!("HTTP {}: {}", status, detail)));
        }

        let envelope = envelope.ok_or_else(|| MarketDataError::InvalidData {
            symbol: symbol.to_string(),
            reason: "unexpected chart payload".to_string(),
        })?;

        parse_chart(symbol, envelope)
    }
}

fn transport(reason: String) -> MarketDataError {
    MarketDataError::Transport {
        provider: Provider::Yahoo.to_string(),
        reason,
    }
}

fn unsupported(symbol: &str, reason: String) -> MarketDataError {
    MarketDataError::UnsupportedSymbol {
        symbol: symbol.to_string(),
        provider: Provider::Yahoo.to_string(),
        reason,
    }
}

fn describe_error(error: &ChartError) -> String {
    match (&error.code, &error.description) {
        (Some(code), Some(description)) => format!("{}: {}", code, description),
        (Some(code), None) => code.clone(),
        (None, Some(description)) => description.clone(),
        (None, None) => "unknown error".to_string(),
    }
}

fn parse_chart(symbol: &str, envelope: ChartEnvelope) -> Result<Vec<Candle>, MarketDataError> {
    if let Some(error) = envelope.chart.error {
        return Err(unsupported(symbol, describe_error(&error)));
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(MarketDataError::EmptyResponse {
            symbol: symbol.to_string(),
            provider: Provider::Yahoo.to_string(),
        });
    };
    if result.timestamp.is_empty() {
        return Err(MarketDataError::EmptyResponse {
            symbol: symbol.to_string(),
            provider: Provider::Yahoo.to_string(),
        });
    }

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let column = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

    let candles: Vec<Candle> = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            Some(Candle::new(
                Utc.timestamp_opt(*ts, 0).single()?,
                column(&quote.open, i)?,
                column(&quote.high, i)?,
                column(&quote.low, i)?,
                column(&quote.close, i)?,
                // a missing volume is reported as zero
                column(&quote.volume, i).unwrap_or(0.0),
            ))
        })
        .collect();

    let dropped = result.timestamp.len() - candles.len();
    if dropped > 0 {
        debug!(symbol, dropped, "YahooMarketDataService: Dropped incomplete bars");
    }

    let candles = normalize_series(candles);
    if candles.is_empty() {
        warn!(symbol, "YahooMarketDataService: No complete bars in chart");
        return Err(MarketDataError::InvalidData {
            symbol: symbol.to_string(),
            reason: "every bar had missing prices".to_string(),
        });
    }
    Ok(candles)
}
