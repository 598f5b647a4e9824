use crate::config::Config;
use crate::domain::ports::SignalClassifier;
use crate::infrastructure::observability::Metrics;
use crate::infrastructure::persistence::IndicatorJsonStore;
use std::sync::Arc;
use std::time::Instant;

/// Shared, immutable server context handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<IndicatorJsonStore>,
    /// `None` when no model artifact could be loaded
    pub classifier: Option<Arc<dyn SignalClassifier>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
}

impl AppState {
    pub fn new(
        config: Config,
        classifier: Option<Arc<dyn SignalClassifier>>,
        metrics: Arc<Metrics>,
    ) -> Self {
        let store = IndicatorJsonStore::new(
            config.data_dir.clone(),
            config.indicators.signal_labels,
        );
        metrics
            .model_loaded
            .set(if classifier.is_some() { 1.0 } else { 0.0 });

        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            classifier,
            metrics,
            start_time: Arc::new(Instant::now()),
        }
    }
}
