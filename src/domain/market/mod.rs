pub mod candle;
pub mod indicator_row;
pub mod interval;
pub mod ticker;

pub use candle::Candle;
pub use indicator_row::IndicatorRow;
pub use interval::{FetchWindow, Interval};
pub use ticker::{Provider, Ticker};
