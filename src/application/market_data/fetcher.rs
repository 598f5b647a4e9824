//! Candle fetcher: routes each ticker to its provider, retries failed
//! downloads a bounded number of times and writes one CSV per ticker.

use crate::config::FetchEnvConfig;
use crate::domain::errors::MarketDataError;
use crate::domain::market::{Candle, FetchWindow, Provider, Ticker};
use crate::domain::ports::MarketDataService;
use crate::infrastructure::core::HttpClientSettings;
use crate::infrastructure::mexc::MexcMarketDataService;
use crate::infrastructure::persistence::CandleCsvStore;
use crate::infrastructure::yahoo::YahooMarketDataService;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub attempts: u32,
    /// Fixed pause between attempts
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(2000),
        }
    }
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub saved: Vec<SavedTicker>,
    pub skipped: Vec<SkippedTicker>,
}

#[derive(Debug)]
pub struct SavedTicker {
    pub name: String,
    pub rows: usize,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct SkippedTicker {
    pub name: String,
    pub reason: String,
}

impl FetchReport {
    pub fn log_summary(&self) {
        info!(
            saved = self.saved.len(),
            skipped = self.skipped.len(),
            "Fetch run finished"
        );
        for s in &self.skipped {
            warn!(ticker = %s.name, reason = %s.reason, "Skipped");
        }
    }
}

pub struct CandleFetcher {
    yahoo: Arc<dyn MarketDataService>,
    mexc: Arc<dyn MarketDataService>,
    retry: RetryConfig,
}

impl CandleFetcher {
    pub fn new(
        yahoo: Arc<dyn MarketDataService>,
        mexc: Arc<dyn MarketDataService>,
        retry: RetryConfig,
    ) -> Self {
        Self { yahoo, mexc, retry }
    }

    /// Wires the real provider clients from configuration.
    pub fn from_config(config: &FetchEnvConfig) -> Self {
        let settings = HttpClientSettings {
            timeout: Duration::from_secs(config.http_timeout_secs),
            transient_retries: config.transient_retries,
        };
        let yahoo = YahooMarketDataService::builder()
            .base_url(config.yahoo_base_url.clone())
            .http_settings(settings)
            .build();
        let mexc = MexcMarketDataService::builder()
            .base_url(config.mexc_base_url.clone())
            .http_settings(settings)
            .build();

        Self::new(
            Arc::new(yahoo),
            Arc::new(mexc),
            RetryConfig {
                attempts: config.attempts,
                backoff: Duration::from_millis(config.backoff_ms),
            },
        )
    }

    fn service_for(&self, provider: Provider) -> &Arc<dyn MarketDataService> {
        match provider {
            Provider::Yahoo => &self.yahoo,
            Provider::Mexc => &self.mexc,
        }
    }

    /// Downloads one ticker. Retryable failures are attempted up to
    /// `retry.attempts` times; unsupported symbols fail immediately.
    pub async fn fetch(
        &self,
        ticker: &Ticker,
        window: &FetchWindow,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let service = self.service_for(ticker.provider());
        let attempts = self.retry.attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match service.get_historical_bars(&ticker.symbol, window).await {
                Ok(candles) => {
                    info!(
                        ticker = %ticker.name,
                        provider = %service.provider(),
                        rows = candles.len(),
                        attempt,
                        "Fetched candles"
                    );
                    return Ok(candles);
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    warn!(
                        ticker = %ticker.name,
                        attempt,
                        attempts,
                        error = %e,
                        "Fetch attempt failed"
                    );
                    last_error = e.to_string();
                    if attempt < attempts {
                        tokio::time::sleep(self.retry.backoff).await;
                    }
                }
            }
        }

        Err(MarketDataError::DataUnavailable {
            symbol: ticker.symbol.clone(),
            attempts,
            reason: last_error,
        })
    }

    /// Fetches every ticker in order and saves each series as CSV. A failing
    /// ticker is logged and skipped; the batch always runs to the end.
    pub async fn fetch_all(
        &self,
        tickers: &[Ticker],
        window: &FetchWindow,
        store: &CandleCsvStore,
    ) -> FetchReport {
        let mut report = FetchReport::default();

        for ticker in tickers {
            let candles = match self.fetch(ticker, window).await {
                Ok(candles) => candles,
                Err(e) => {
                    warn!(ticker = %ticker.name, error = %e, "Skipping ticker");
                    report.skipped.push(SkippedTicker {
                        name: ticker.name.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match store.save(&ticker.name, &candles) {
                Ok(path) => {
                    info!(ticker = %ticker.name, path = %path.display(), "Saved candles");
                    report.saved.push(SavedTicker {
                        name: ticker.name.clone(),
                        rows: candles.len(),
                        path,
                    });
                }
                Err(e) => {
                    error!(ticker = %ticker.name, error = %e, "Failed to save candles");
                    report.skipped.push(SkippedTicker {
                        name: ticker.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    /// Replays a scripted sequence of outcomes.
    struct ScriptedService {
        provider: Provider,
        outcomes: Mutex<Vec<Result<Vec<Candle>, MarketDataError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedService {
        fn new(provider: Provider, mut outcomes: Vec<Result<Vec<Candle>, MarketDataError>>) -> Self {
            outcomes.reverse();
            Self {
                provider,
                outcomes: Mutex::new(outcomes),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl MarketDataService for ScriptedService {
        fn provider(&self) -> Provider {
            self.provider
        }

        async fn get_historical_bars(
            &self,
            symbol: &str,
            _window: &FetchWindow,
        ) -> Result<Vec<Candle>, MarketDataError> {
            *self.calls.lock().unwrap() += 1;
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(empty(symbol)))
        }
    }

    fn empty(symbol: &str) -> MarketDataError {
        MarketDataError::EmptyResponse {
            symbol: symbol.to_string(),
            provider: "test".to_string(),
        }
    }

    fn one_candle() -> Vec<Candle> {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        vec![Candle::new(ts, 1.0, 1.0, 1.0, 1.0, 1.0)]
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig {
            attempts: 3,
            backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let yahoo = Arc::new(ScriptedService::new(
            Provider::Yahoo,
            vec![Err(empty("BTC-USD")), Ok(one_candle())],
        ));
        let mexc = Arc::new(ScriptedService::new(Provider::Mexc, vec![]));
        let fetcher = CandleFetcher::new(yahoo.clone(), mexc.clone(), fast_retry());

        let candles = fetcher
            .fetch(&Ticker::new("BTC", "BTC-USD"), &FetchWindow::default())
            .await
            .unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(yahoo.calls(), 2);
        assert_eq!(mexc.calls(), 0);
    }

    #[tokio::test]
    async fn test_gives_up_after_bounded_attempts() {
        let yahoo = Arc::new(ScriptedService::new(Provider::Yahoo, vec![]));
        let mexc = Arc::new(ScriptedService::new(Provider::Mexc, vec![]));
        let fetcher = CandleFetcher::new(yahoo, mexc.clone(), fast_retry());

        let err = fetcher
            .fetch(&Ticker::new("XPL", "XPLUSDT"), &FetchWindow::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MarketDataError::DataUnavailable { attempts: 3, .. }));
        assert_eq!(mexc.calls(), 3);
    }

    #[tokio::test]
    async fn test_unsupported_symbol_is_not_retried() {
        let yahoo = Arc::new(ScriptedService::new(Provider::Yahoo, vec![]));
        let mexc = Arc::new(ScriptedService::new(
            Provider::Mexc,
            vec![Err(MarketDataError::UnsupportedSymbol {
                symbol: "ZBCUSDT".to_string(),
                provider: "MEXC".to_string(),
                reason: "Invalid symbol.".to_string(),
            })],
        ));
        let fetcher = CandleFetcher::new(yahoo, mexc.clone(), fast_retry());

        let err = fetcher
            .fetch(&Ticker::new("ZBC", "ZBCUSDT"), &FetchWindow::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MarketDataError::UnsupportedSymbol { .. }));
        assert_eq!(mexc.calls(), 1);
    }

    #[tokio::test]
    async fn test_batch_skips_failures_and_continues() {
        let dir = std::env::temp_dir().join(format!("kumo-fetcher-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let store = CandleCsvStore::new(&dir);

        let yahoo = Arc::new(ScriptedService::new(Provider::Yahoo, vec![Ok(one_candle())]));
        let mexc = Arc::new(ScriptedService::new(Provider::Mexc, vec![]));
        let fetcher = CandleFetcher::new(yahoo, mexc, fast_retry());

        let tickers = vec![Ticker::new("SHX", "SHXUSDT"), Ticker::new("BTC", "BTC-USD")];
        let report = fetcher
            .fetch_all(&tickers, &FetchWindow::default(), &store)
            .await;

        assert_eq!(report.saved.len(), 1);
        assert_eq!(report.saved[0].name, "BTC");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "SHX");
        assert!(store.path_for("BTC").exists());
        assert!(!store.path_for("SHX").exists());
        std::fs::remove_dir_all(&dir).ok();
    }
}
