// Candles, tickers and derived indicator rows
pub mod market;

// Signal categories and label vocabularies
pub mod signal;

// Classifier feature layout
pub mod ml;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
