//! kumo Server - Ichimoku dashboard
//!
//! Serves the precomputed indicator files with a Plotly chart and the latest
//! signal. When a model artifact is present the latest signal comes from the
//! classifier, otherwise from the rule.
//!
//! # Usage
//! ```sh
//! PORT=8000 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `PORT` - Listening port (default: 8000)
//! - `DATA_DIR` - Directory with `*_ichimoku.json` files (default: data)
//! - `MODEL_PATH` - Classifier artifact (default: model/signal_model.json)

use anyhow::Result;
use clap::Parser;
use kumo::application::ml::SmartCorePredictor;
use kumo::config::Config;
use kumo::domain::errors::ModelError;
use kumo::domain::ports::SignalClassifier;
use kumo::infrastructure::observability::{Metrics, init_logging};
use kumo::interfaces::web::{self, AppState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve the Ichimoku dashboard", long_about = None)]
struct Args {
    /// Listening port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Data directory (overrides DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Model artifact (overrides MODEL_PATH)
    #[arg(long)]
    model: Option<PathBuf>,
}

fn load_classifier(path: &Path) -> Option<Arc<dyn SignalClassifier>> {
    match SmartCorePredictor::load(path) {
        Ok(predictor) => Some(Arc::new(predictor)),
        Err(ModelError::NotFound { path }) => {
            warn!(%path, "No model artifact; latest signals come from the rule");
            None
        }
        Err(e) => {
            warn!(error = %e, "Model artifact unusable; latest signals come from the rule");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = Config::from_env()?;
    init_logging(config.observability.log_format);

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(model) = args.model {
        config.ml.model_path = model;
    }

    info!("kumo Server {} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded: data_dir={}, model={}",
        config.data_dir.display(),
        config.ml.model_path.display()
    );

    let classifier = load_classifier(&config.ml.model_path);
    let metrics = Arc::new(Metrics::new()?);
    let state = AppState::new(config, classifier, metrics);

    web::serve(state).await
}
