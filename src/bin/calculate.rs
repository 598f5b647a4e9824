//! kumo calculate - derive Ichimoku/RSI/EMA indicators and rule signals
//!
//! Reads every `<NAME>.csv` in the data directory and writes
//! `<NAME>_ichimoku.json` next to it.

use anyhow::{Result, bail};
use clap::Parser;
use kumo::application::indicators::{IndicatorCalculator, calculate_store};
use kumo::config::Config;
use kumo::domain::signal::SignalLabels;
use kumo::infrastructure::observability::init_logging;
use kumo::infrastructure::persistence::{CandleCsvStore, IndicatorJsonStore};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compute indicator files from candle tables", long_about = None)]
struct Args {
    /// Data directory (overrides DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Signal label style: traffic_light or spanish (overrides SIGNAL_LABELS)
    #[arg(long)]
    labels: Option<String>,

    /// Disable the lagging-span confirmation of the signal rule
    #[arg(long)]
    no_chikou_confirmation: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = Config::from_env()?;
    init_logging(config.observability.log_format);

    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(labels) = args.labels {
        config.indicators.signal_labels = labels.parse::<SignalLabels>()?;
    }
    if args.no_chikou_confirmation {
        config.indicators.chikou_confirmation = false;
    }

    let calculator = IndicatorCalculator::from_config(&config.indicators)?;
    info!(
        params = ?calculator.params(),
        labels = ?config.indicators.signal_labels,
        "kumo calculate starting in {}",
        config.data_dir.display()
    );

    let candles = CandleCsvStore::new(&config.data_dir);
    let indicators = IndicatorJsonStore::new(&config.data_dir, config.indicators.signal_labels);
    let report = calculate_store(&calculator, &candles, &indicators)?;

    if report.written.is_empty() && !report.skipped.is_empty() {
        bail!("Every candle table failed to process");
    }
    Ok(())
}
