// Indicator computation (Ichimoku, RSI, EMA) and the batch stage
pub mod indicators;

// Market data fetching and rule-based signals
pub mod market_data;

// Signal classifier training and inference
pub mod ml;
