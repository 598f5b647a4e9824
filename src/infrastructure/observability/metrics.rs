//! Prometheus metrics definitions for kumo
//!
//! All metrics use the `kumo_` prefix.

use prometheus::{
    CounterVec, Gauge, Histogram, HistogramOpts, IntCounter, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Prometheus metrics for the dashboard server
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Total HTTP requests served
    pub http_requests_total: IntCounter,
    /// HTTP requests currently being handled
    pub http_requests_in_flight: IntGauge,
    /// HTTP request latency in seconds
    pub http_request_duration_seconds: Histogram,
    /// Signals returned, by source (model/rule) and signal
    pub signals_served_total: CounterVec,
    /// 1 when a classifier is loaded
    pub model_loaded: Gauge,
    /// Uptime in seconds
    pub uptime_seconds: Gauge,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounter::with_opts(Opts::new(
            "kumo_http_requests_total",
            "Total HTTP requests served",
        ))?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_requests_in_flight = IntGauge::with_opts(Opts::new(
            "kumo_http_requests_in_flight",
            "HTTP requests currently in flight",
        ))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;

        let http_request_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "kumo_http_request_duration_seconds",
                "HTTP request latency in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        let signals_served_total = CounterVec::new(
            Opts::new(
                "kumo_signals_served_total",
                "Signals returned by the server, by source and signal",
            ),
            &["source", "signal"],
        )?;
        registry.register(Box::new(signals_served_total.clone()))?;

        let model_loaded = Gauge::with_opts(Opts::new(
            "kumo_model_loaded",
            "Whether a signal classifier is loaded (0/1)",
        ))?;
        registry.register(Box::new(model_loaded.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "kumo_uptime_seconds",
            "Server uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            signals_served_total,
            model_loaded,
            uptime_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    /// Increment served signals
    pub fn inc_signals(&self, source: &str, signal: &str) {
        self.signals_served_total
            .with_label_values(&[source, signal])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        assert!(metrics.render().contains("kumo_"));
    }

    #[test]
    fn test_signal_counter() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_signals("model", "bullish");
        metrics.inc_signals("rule", "neutral");
        let output = metrics.render();
        assert!(output.contains("kumo_signals_served_total"));
        assert!(output.contains("bullish"));
    }

    #[test]
    fn test_model_loaded_gauge() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.model_loaded.set(1.0);
        assert!(metrics.render().contains("kumo_model_loaded 1"));
    }
}
