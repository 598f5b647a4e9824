use super::IndicatorCalculator;
use crate::infrastructure::persistence::{CandleCsvStore, IndicatorJsonStore};
use anyhow::{Context, Result};
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct CalculateReport {
    pub written: Vec<String>,
    pub skipped: Vec<(String, String)>,
}

/// Computes indicators for every candle table and writes one indicator file
/// per ticker. Tables that fail to parse or compute are skipped.
pub fn calculate_store(
    calculator: &IndicatorCalculator,
    candles: &CandleCsvStore,
    indicators: &IndicatorJsonStore,
) -> Result<CalculateReport> {
    let names = candles.list().context("Failed to list candle tables")?;
    let mut report = CalculateReport::default();

    for name in names {
        let outcome = candles
            .load(&name)
            .map_err(anyhow::Error::from)
            .and_then(|series| Ok(calculator.calculate(&series)?))
            .and_then(|rows| Ok((rows.len(), indicators.save(&name, &rows)?)));

        match outcome {
            Ok((rows, path)) => {
                info!(ticker = %name, rows, path = %path.display(), "Indicators written");
                report.written.push(name);
            }
            Err(e) => {
                warn!(ticker = %name, error = %e, "Skipping candle table");
                report.skipped.push((name, e.to_string()));
            }
        }
    }

    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "Indicator run finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::Candle;
    use crate::domain::signal::SignalLabels;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_bad_tables_are_skipped() {
        let dir = std::env::temp_dir().join(format!("kumo-batch-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let csv = CandleCsvStore::new(&dir);
        let json = IndicatorJsonStore::new(&dir, SignalLabels::TrafficLight);
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let series: Vec<Candle> = (0..80)
            .map(|i| Candle::new(start + Duration::hours(i), 1.0, 1.5, 0.5, 1.0 + i as f64, 1.0))
            .collect();
        csv.save("GOOD", &series).unwrap();
        std::fs::write(dir.join("BAD.csv"), "timestamp,open\nx,y\n").unwrap();

        let report = calculate_store(&IndicatorCalculator::default(), &csv, &json).unwrap();
        assert_eq!(report.written, vec!["GOOD"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(json.load("GOOD").unwrap().len(), 80);
        std::fs::remove_dir_all(&dir).ok();
    }
}
