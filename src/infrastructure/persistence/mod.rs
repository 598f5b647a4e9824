// File-based handoff between pipeline stages
pub mod candle_csv;
pub mod indicator_json;
pub mod json_file;
pub mod timestamp;

pub use candle_csv::CandleCsvStore;
pub use indicator_json::{INDICATOR_FILE_SUFFIX, IndicatorJsonStore};
