//! MEXC Market Data Service
//!
//! Historical spot klines from the public `/api/v3/klines` endpoint. No API
//! key is needed.

use crate::domain::errors::MarketDataError;
use crate::domain::market::candle::normalize_series;
use crate::domain::market::{Candle, FetchWindow, Provider};
use crate::domain::ports::MarketDataService;
use crate::infrastructure::core::http_client_factory::{
    HttpClientFactory, HttpClientSettings, build_url_with_query,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_MEXC_BASE_URL: &str = "https://api.mexc.com";

pub struct MexcMarketDataService {
    client: ClientWithMiddleware,
    base_url: String,
}

impl MexcMarketDataService {
    pub fn builder() -> MexcMarketDataServiceBuilder {
        MexcMarketDataServiceBuilder::default()
    }
}

#[derive(Default)]
pub struct MexcMarketDataServiceBuilder {
    base_url: Option<String>,
    settings: Option<HttpClientSettings>,
}

impl MexcMarketDataServiceBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn http_settings(mut self, settings: HttpClientSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn build(self) -> MexcMarketDataService {
        MexcMarketDataService {
            client: HttpClientFactory::create_client(self.settings.unwrap_or_default()),
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_MEXC_BASE_URL.to_string()),
        }
    }
}

#[async_trait]
impl MarketDataService for MexcMarketDataService {
    fn provider(&self) -> Provider {
        Provider::Mexc
    }

    async fn get_historical_bars(
        &self,
        symbol: &str,
        window: &FetchWindow,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let limit = window.limit.to_string();
        let url = build_url_with_query(
            &self.base_url,
            "/api/v3/klines",
            &[
                ("symbol", symbol),
                ("interval", window.interval.to_mexc_string()),
                ("limit", limit.as_str()),
            ],
        )
        .map_err(|e| transport(format!("invalid MEXC URL: {}", e)))?;

        debug!(%url, "MexcMarketDataService: Fetching klines");

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

        check_response(symbol, status, &body)?;

        let klines: Vec<Value> =
            serde_json::from_str(&body).map_err(|e| MarketDataError::InvalidData {
                symbol: symbol.to_string(),
                reason: format!("klines payload is not an array: {}", e),
            })?;

        parse_klines(symbol, &klines)
    }
}

fn transport(reason: String) -> MarketDataError {
    MarketDataError::Transport {
        provider: Provider::Mexc.to_string(),
        reason,
    }
}

/// Rejections come back as `{"code": ..., "msg": ...}`, sometimes with 200.
/// Only 2xx/400 rejections mean the symbol is unknown; rate limits, timeouts
/// and server errors stay retryable.
fn check_response(symbol: &str, status: StatusCode, body: &str) -> Result<(), MarketDataError> {
    let reason = rejection_reason(body);
    let transient = status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT;

    if transient {
        let detail = reason.as_deref().unwrap_or(body);
        return Err(transport(format!("HTTP {}: {}", status, detail)));
    }

    match reason {
        Some(reason) if status.is_success() || status == StatusCode::BAD_REQUEST => {
            Err(MarketDataError::UnsupportedSymbol {
                symbol: symbol.to_string(),
                provider: Provider::Mexc.to_string(),
                reason,
            })
        }
        Some(reason) => Err(transport(format!("HTTP {}: {}", status, reason))),
        None if !status.is_success() => Err(transport(format!("HTTP {}: {}", status, body))),
        None => Ok(()),
    }
}

fn rejection_reason(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    let msg = object
        .get("msg")
        .and_then(Value::as_str)
        .unwrap_or("request rejected");
    let code = object.get("code").map(Value::to_string).unwrap_or_default();
    Some(format!("{} (code {})", msg, code))
}

/// MEXC sends prices as strings; accept plain numbers too.
fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse::<f64>().ok(),
        other => other.as_f64(),
    }
}

/// Kline format: `[openTime, open, high, low, close, volume, closeTime, quoteVolume]`.
pub fn parse_klines(symbol: &str, klines: &[Value]) -> Result<Vec<Candle>, MarketDataError> {
    if klines.is_empty() {
        return Err(MarketDataError::EmptyResponse {
            symbol: symbol.to_string(),
            provider: Provider::Mexc.to_string(),
        });
    }

    let candles: Vec<Candle> = klines
        .iter()
        .filter_map(|k| {
            let arr = k.as_array()?;
            if arr.len() < 6 {
                return None;
            }

            let timestamp = Utc.timestamp_millis_opt(arr[0].as_i64()?).single()?;
            Some(Candle::new(
                timestamp,
                as_f64(&arr[1])?,
                as_f64(&arr[2])?,
                as_f64(&arr[3])?,
                as_f64(&arr[4])?,
                as_f64(&arr[5])?,
            ))
        })
        .collect();

    let dropped = klines.len() - candles.len();
    if dropped > 0 {
        warn!(symbol, dropped, "MexcMarketDataService: Dropped malformed klines");
    }

    let candles = normalize_series(candles);
    if candles.is_empty() {
        return Err(MarketDataError::InvalidData {
            symbol: symbol.to_string(),
            reason: "no well-formed klines in response".to_string(),
        });
    }
    Ok(candles)
}
