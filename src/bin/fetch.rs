//! kumo fetch - download candle history for every configured ticker
//!
//! # Usage
//! ```sh
//! TICKERS="BTC=BTC-USD,XPL=XPLUSDT" cargo run --bin fetch
//! ```
//!
//! Each ticker is written to `<DATA_DIR>/<NAME>.csv`. Tickers the provider
//! rejects or that stay unavailable after the retry budget are skipped.

use anyhow::{Context, Result, bail};
use clap::Parser;
use kumo::application::market_data::CandleFetcher;
use kumo::config::Config;
use kumo::domain::market::Interval;
use kumo::domain::market::ticker::parse_ticker_list;
use kumo::infrastructure::observability::init_logging;
use kumo::infrastructure::persistence::CandleCsvStore;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Download OHLCV candles into CSV files", long_about = None)]
struct Args {
    /// Output directory (overrides DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Comma-separated NAME=SYMBOL pairs (overrides TICKERS)
    #[arg(long)]
    tickers: Option<String>,

    /// Bar interval, e.g. 1h (overrides FETCH_INTERVAL)
    #[arg(long)]
    interval: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = Config::from_env()?;
    init_logging(config.observability.log_format);

    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(list) = args.tickers {
        config.fetch.tickers = parse_ticker_list(&list).context("Invalid --tickers")?;
    }
    if let Some(interval) = args.interval {
        config.fetch.window.interval = interval.parse::<Interval>()?;
    }

    info!(
        "kumo fetch {} starting: {} tickers, interval {}, data dir {}",
        env!("CARGO_PKG_VERSION"),
        config.fetch.tickers.len(),
        config.fetch.window.interval,
        config.data_dir.display()
    );

    let fetcher = CandleFetcher::from_config(&config.fetch);
    let store = CandleCsvStore::new(&config.data_dir);
    let report = fetcher
        .fetch_all(&config.fetch.tickers, &config.fetch.window, &store)
        .await;
    report.log_summary();

    if report.saved.is_empty() && !config.fetch.tickers.is_empty() {
        bail!("No ticker could be fetched");
    }
    Ok(())
}
