// Market data acquisition and rule-based signals
pub mod fetcher;
pub mod signal_generator;

pub use fetcher::{CandleFetcher, FetchReport, RetryConfig};
pub use signal_generator::SignalGenerator;
