//! kumo train - fit the signal classifier on all indicator files
//!
//! Labels each row by the next close (±LABEL_THRESHOLD), fits a random
//! forest on a chronological split and saves the artifact to MODEL_PATH.
//! With `--annotate` the indicator files are rewritten with model signals.

use anyhow::Result;
use clap::Parser;
use kumo::application::ml::annotate::annotate_store;
use kumo::application::ml::{ModelTrainer, SmartCorePredictor};
use kumo::config::Config;
use kumo::domain::errors::ModelError;
use kumo::infrastructure::observability::init_logging;
use kumo::infrastructure::persistence::IndicatorJsonStore;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Train the Ichimoku signal classifier", long_about = None)]
struct Args {
    /// Data directory with *_ichimoku.json files (overrides DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Path to output model file (overrides MODEL_PATH)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of trees in the random forest
    #[arg(long)]
    n_trees: Option<u16>,

    /// Maximum depth of trees
    #[arg(long)]
    max_depth: Option<u16>,

    /// Rewrite indicator files with the new model's signals
    #[arg(long)]
    annotate: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = Config::from_env()?;
    init_logging(config.observability.log_format);

    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(path) = args.output {
        config.ml.model_path = path;
    }
    if let Some(n) = args.n_trees {
        config.ml.n_trees = n;
    }
    if let Some(depth) = args.max_depth {
        config.ml.max_depth = depth;
    }

    let store = IndicatorJsonStore::new(&config.data_dir, config.indicators.signal_labels);
    let trainer = ModelTrainer::new(config.ml.clone());

    let samples = trainer.collect_samples(&store)?;
    info!(samples = samples.len(), "Collected labelled rows");

    let (artifact, report) = match trainer.train(samples) {
        Ok(result) => result,
        Err(e @ (ModelError::InsufficientData { .. } | ModelError::SingleClass { .. })) => {
            warn!(error = %e, "Training skipped");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    report.log();
    artifact.save(&config.ml.model_path)?;

    if args.annotate {
        let predictor = SmartCorePredictor::new(artifact);
        let files = annotate_store(&store, &predictor)?;
        info!(files, "Indicator files annotated with model signals");
    }
    Ok(())
}
