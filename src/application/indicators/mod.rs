// Indicator computation over ordered candle series
pub mod batch;
pub mod calculator;
pub mod ichimoku;
pub mod momentum;
pub mod trend;

pub use batch::{CalculateReport, calculate_store};
pub use calculator::IndicatorCalculator;
pub use ichimoku::{IchimokuLines, IchimokuParams};
