//! Configuration module for kumo.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by pipeline stage: Fetch, Indicators, ML, Server, and Observability.

mod fetch_config;
mod indicator_config;
mod ml_config;
mod observability_config;
mod server_config;

pub use fetch_config::FetchEnvConfig;
pub use indicator_config::IndicatorEnvConfig;
pub use ml_config::MlEnvConfig;
pub use observability_config::{LogFormat, ObservabilityEnvConfig};
pub use server_config::ServerEnvConfig;

use anyhow::{Context, Result, anyhow};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

/// Variable lookup used by every sub-config. `from_env` passes the process
/// environment; tests pass a map.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Main application configuration shared by all binaries.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding candle CSVs and indicator JSON files
    pub data_dir: PathBuf,
    pub fetch: FetchEnvConfig,
    pub indicators: IndicatorEnvConfig,
    pub ml: MlEnvConfig,
    pub server: ServerEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            fetch: FetchEnvConfig::default(),
            indicators: IndicatorEnvConfig::default(),
            ml: MlEnvConfig::default(),
            server: ServerEnvConfig::default(),
            observability: ObservabilityEnvConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        Ok(Self {
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            fetch: FetchEnvConfig::from_lookup(lookup).context("Failed to load fetch config")?,
            indicators: IndicatorEnvConfig::from_lookup(lookup)
                .context("Failed to load indicator config")?,
            ml: MlEnvConfig::from_lookup(lookup).context("Failed to load ML config")?,
            server: ServerEnvConfig::from_lookup(lookup)
                .context("Failed to load server config")?,
            observability: ObservabilityEnvConfig::from_lookup(lookup)
                .context("Failed to load observability config")?,
        })
    }
}

/// Parses `key` when set, otherwise returns `default`.
pub(crate) fn parse_or<T>(lookup: Lookup<'_>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("Failed to parse {}='{}': {}", key, raw, e)),
        _ => Ok(default),
    }
}

#[cfg(test)]
pub(crate) fn map_lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: std::collections::HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}
