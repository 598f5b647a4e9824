use thiserror::Error;

/// Errors related to market data retrieval
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Data unavailable for {symbol} after {attempts} attempt(s): {reason}")]
    DataUnavailable {
        symbol: String,
        attempts: u32,
        reason: String,
    },

    #[error("Symbol {symbol} is not supported by {provider}: {reason}")]
    UnsupportedSymbol {
        symbol: String,
        provider: String,
        reason: String,
    },

    #[error("Empty response from {provider} for {symbol}")]
    EmptyResponse { symbol: String, provider: String },

    #[error("Invalid market data for {symbol}: {reason}")]
    InvalidData { symbol: String, reason: String },

    #[error("Request to {provider} failed: {reason}")]
    Transport { provider: String, reason: String },
}

impl MarketDataError {
    /// Unsupported symbols are permanent: retrying cannot help.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, MarketDataError::UnsupportedSymbol { .. })
    }
}

/// Errors raised while deriving indicators
#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("Invalid {name} period: {period}")]
    InvalidPeriod { name: &'static str, period: usize },

    #[error("Series is not strictly time-ordered at row {index}")]
    UnorderedSeries { index: usize },
}

/// Errors related to the on-disk files handed between stages
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid record in {path}: {reason}")]
    InvalidRecord { path: String, reason: String },
}

/// Errors related to the signal classifier and its artifact
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model artifact not found at {path}")]
    NotFound { path: String },

    #[error("Insufficient training data: {rows} rows < minimum {min}")]
    InsufficientData { rows: usize, min: usize },

    #[error("Training data contains a single class ({class}); nothing to learn")]
    SingleClass { class: i32 },

    #[error("Feature mismatch: expected {expected:?}, artifact has {found:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Training failed: {reason}")]
    Training { reason: String },

    #[error("Prediction failed: {reason}")]
    Prediction { reason: String },
}
