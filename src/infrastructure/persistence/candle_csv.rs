use crate::domain::errors::StorageError;
use crate::domain::market::Candle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk row: `timestamp,open,high,low,close,volume`.
#[derive(Debug, Serialize, Deserialize)]
struct CandleRecord {
    #[serde(with = "super::timestamp")]
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl From<&Candle> for CandleRecord {
    fn from(c: &Candle) -> Self {
        Self {
            timestamp: c.timestamp,
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
            volume: c.volume,
        }
    }
}

impl From<CandleRecord> for Candle {
    fn from(r: CandleRecord) -> Self {
        Candle::new(r.timestamp, r.open, r.high, r.low, r.close, r.volume)
    }
}

/// One `<NAME>.csv` candle table per ticker inside a data directory.
#[derive(Debug, Clone)]
pub struct CandleCsvStore {
    data_dir: PathBuf,
}

impl CandleCsvStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", name))
    }

    pub fn save(&self, name: &str, candles: &[Candle]) -> Result<PathBuf, StorageError> {
        let path = self.path_for(name);
        write_candles(&path, candles)?;
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<Vec<Candle>, StorageError> {
        read_candles(&self.path_for(name))
    }

    /// Ticker names with a candle table, sorted.
    pub fn list(&self) -> Result<Vec<String>, StorageError> {
        let entries = fs::read_dir(&self.data_dir).map_err(|source| StorageError::Io {
            path: self.data_dir.display().to_string(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let file_name = entry.file_name().to_string_lossy().into_owned();
                file_name.strip_suffix(".csv").map(str::to_string)
            })
            .collect();
        names.sort();
        Ok(names)
    }
}

pub fn write_candles(path: &Path, candles: &[Candle]) -> Result<(), StorageError> {
    let shown = path.display().to_string();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let mut wtr = csv::Writer::from_path(path).map_err(|source| StorageError::Csv {
        path: shown.clone(),
        source,
    })?;
    for candle in candles {
        wtr.serialize(CandleRecord::from(candle))
            .map_err(|source| StorageError::Csv {
                path: shown.clone(),
                source,
            })?;
    }
    wtr.flush().map_err(|source| StorageError::Io {
        path: shown.clone(),
        source,
    })?;

    debug!(path = %shown, rows = candles.len(), "Candle table written");
    Ok(())
}

pub fn read_candles(path: &Path) -> Result<Vec<Candle>, StorageError> {
    let shown = path.display().to_string();
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| StorageError::Csv {
            path: shown.clone(),
            source,
        })?;

    rdr.deserialize::<CandleRecord>()
        .map(|record| {
            record.map(Candle::from).map_err(|source| StorageError::Csv {
                path: shown.clone(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kumo-csv-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_save_and_load() {
        let dir = scratch_dir("roundtrip");
        let store = CandleCsvStore::new(&dir);
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candles = vec![Candle::new(ts, 1.0, 2.0, 0.5, 1.5, 100.0)];

        let path = store.save("BTC", &candles).unwrap();
        assert!(path.ends_with("BTC.csv"));
        assert_eq!(store.load("BTC").unwrap(), candles);
        assert_eq!(store.list().unwrap(), vec!["BTC".to_string()]);

        let header = fs::read_to_string(&path).unwrap();
        assert!(header.starts_with("timestamp,open,high,low,close,volume"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_reads_naive_timestamps() {
        let dir = scratch_dir("naive");
        let path = dir.join("ETH.csv");
        fs::write(
            &path,
            "timestamp,open,high,low,close,volume\n2024-01-01 03:00:00,1,2,0.5,1.5,10\n",
        )
        .unwrap();

        let candles = read_candles(&path).unwrap();
        assert_eq!(
            candles[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 3, 0, 0).unwrap()
        );
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let dir = scratch_dir("bad");
        let path = dir.join("BAD.csv");
        fs::write(&path, "timestamp,open,high,low,close,volume\nnope,1,2,3,4,5\n").unwrap();
        assert!(matches!(read_candles(&path), Err(StorageError::Csv { .. })));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let store = CandleCsvStore::new("/nonexistent/kumo");
        assert!(store.load("BTC").is_err());
    }
}
