//! Web server configuration parsing from environment variables.

use super::{Lookup, parse_or};
use anyhow::Result;

/// Server environment configuration
#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub port: u16,
    pub bind_address: String,
    /// Symbol shown when the page is opened without `?symbol=`
    pub default_symbol: String,
}

impl Default for ServerEnvConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_address: "0.0.0.0".to_string(),
            default_symbol: "XRP_USDT".to_string(),
        }
    }
}

impl ServerEnvConfig {
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            port: parse_or(lookup, "PORT", d.port)?,
            bind_address: lookup("BIND_ADDRESS").unwrap_or(d.bind_address),
            default_symbol: lookup("DEFAULT_SYMBOL").unwrap_or(d.default_symbol),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::map_lookup;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerEnvConfig::from_lookup(&map_lookup(&[])).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.bind_address, "0.0.0.0");
    }
}
