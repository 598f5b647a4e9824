use crate::domain::errors::{MarketDataError, ModelError};
use crate::domain::market::{Candle, FetchWindow, Provider};
use crate::domain::ml::feature_registry::FeatureVector;
use crate::domain::signal::Signal;
use async_trait::async_trait;

/// Source of historical candles.
#[async_trait]
pub trait MarketDataService: Send + Sync {
    /// Provider this service talks to (used for routing and logs).
    fn provider(&self) -> Provider;

    /// Fetches one ordered candle series. An empty upstream payload is an
    /// error, never an empty `Ok`.
    async fn get_historical_bars(
        &self,
        symbol: &str,
        window: &FetchWindow,
    ) -> Result<Vec<Candle>, MarketDataError>;
}

/// Interface for fitted signal classifiers
pub trait SignalClassifier: Send + Sync {
    /// Predict the signal for one feature vector
    fn predict(&self, features: &FeatureVector) -> Result<Signal, ModelError>;

    /// Predict many rows at once
    fn predict_batch(&self, rows: &[FeatureVector]) -> Result<Vec<Signal>, ModelError> {
        rows.iter().map(|row| self.predict(row)).collect()
    }

    /// Get model name/type
    fn name(&self) -> &str;
}
