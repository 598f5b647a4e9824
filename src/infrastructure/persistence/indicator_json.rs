use super::json_file::{read_json, write_json_atomic};
use crate::domain::errors::StorageError;
use crate::domain::market::IndicatorRow;
use crate::domain::signal::{Signal, SignalLabels};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub const INDICATOR_FILE_SUFFIX: &str = "_ichimoku.json";

/// Persisted form of an indicator row; undefined values are `null`.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndicatorRecord {
    #[serde(with = "super::timestamp")]
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub tenkan: Option<f64>,
    pub kijun: Option<f64>,
    pub senkou_a: Option<f64>,
    pub senkou_b: Option<f64>,
    pub chikou: Option<f64>,
    #[serde(default)]
    pub rsi: Option<f64>,
    #[serde(default)]
    pub ema: Option<f64>,
    #[serde(default)]
    pub signal: Option<String>,
}

impl IndicatorRecord {
    pub fn from_row(row: &IndicatorRow, labels: SignalLabels) -> Self {
        Self {
            timestamp: row.timestamp,
            close: row.close,
            tenkan: row.tenkan,
            kijun: row.kijun,
            senkou_a: row.senkou_a,
            senkou_b: row.senkou_b,
            chikou: row.chikou,
            rsi: row.rsi,
            ema: row.ema,
            signal: row.signal.map(|s| labels.label(s).to_string()),
        }
    }

    fn into_row(self, origin: &str) -> Result<IndicatorRow, StorageError> {
        let signal = match self.signal.as_deref() {
            None => None,
            Some(label) => Some(Signal::from_label(label).ok_or_else(|| {
                StorageError::InvalidRecord {
                    path: origin.to_string(),
                    reason: format!("unknown signal label '{}'", label),
                }
            })?),
        };
        Ok(IndicatorRow {
            timestamp: self.timestamp,
            close: self.close,
            tenkan: self.tenkan,
            kijun: self.kijun,
            senkou_a: self.senkou_a,
            senkou_b: self.senkou_b,
            chikou: self.chikou,
            rsi: self.rsi,
            ema: self.ema,
            signal,
        })
    }
}

pub fn to_records(rows: &[IndicatorRow], labels: SignalLabels) -> Vec<IndicatorRecord> {
    rows.iter()
        .map(|row| IndicatorRecord::from_row(row, labels))
        .collect()
}

/// Decodes an indicator file body; `origin` names it in errors.
pub fn decode_rows(bytes: &[u8], origin: &str) -> Result<Vec<IndicatorRow>, StorageError> {
    let records: Vec<IndicatorRecord> =
        serde_json::from_slice(bytes).map_err(|source| StorageError::Json {
            path: origin.to_string(),
            source,
        })?;
    records.into_iter().map(|r| r.into_row(origin)).collect()
}

/// One `<NAME>_ichimoku.json` file per ticker inside a data directory.
#[derive(Debug, Clone)]
pub struct IndicatorJsonStore {
    data_dir: PathBuf,
    labels: SignalLabels,
}

impl IndicatorJsonStore {
    pub fn new(data_dir: impl Into<PathBuf>, labels: SignalLabels) -> Self {
        Self {
            data_dir: data_dir.into(),
            labels,
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}{}", name, INDICATOR_FILE_SUFFIX))
    }

    pub fn save(&self, name: &str, rows: &[IndicatorRow]) -> Result<PathBuf, StorageError> {
        let path = self.path_for(name);
        write_json_atomic(&path, &to_records(rows, self.labels))?;
        debug!(path = %path.display(), rows = rows.len(), "Indicator file written");
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<Vec<IndicatorRow>, StorageError> {
        let path = self.path_for(name);
        let origin = path.display().to_string();
        let records: Vec<IndicatorRecord> = read_json(&path)?;
        records.into_iter().map(|r| r.into_row(&origin)).collect()
    }

    /// Ticker names with an indicator file, sorted.
    pub fn list(&self) -> Result<Vec<String>, StorageError> {
        let entries = fs::read_dir(&self.data_dir).map_err(|source| StorageError::Io {
            path: self.data_dir.display().to_string(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let file_name = entry.file_name().to_string_lossy().into_owned();
                file_name
                    .strip_suffix(INDICATOR_FILE_SUFFIX)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        Ok(names)
    }
}
