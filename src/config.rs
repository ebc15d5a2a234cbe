//! Configuration file handling
//!
//! Settings are stored as JSON. Every field has a default, so a partial
//! file (or none at all) is valid.

use crate::connectivity::DEFAULT_PROBE_ADDR;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

pub const DEFAULT_API_BASE_URL: &str = "https://api.postcodes.io";

/// Longest cache TTL the cache builder accepts (1000 years)
pub const MAX_CACHE_TTL_SECS: u64 = 1000 * 365 * 24 * 60 * 60;

/// Runtime settings for lookups and conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the postcode lookup service
    pub api_base_url: String,
    /// Whole-request timeout for lookups
    pub request_timeout_secs: u64,
    /// `ip:port` contacted to decide whether the device is offline
    pub connectivity_probe_addr: String,
    pub probe_timeout_secs: u64,
    /// Successful lookups kept for offline reuse
    pub cache_max_entries: u64,
    pub cache_ttl_secs: u64,
    /// Digits in formatted grid references (even, 0 to 10)
    pub grid_digits: u8,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 10,
            connectivity_probe_addr: DEFAULT_PROBE_ADDR.to_string(),
            probe_timeout_secs: 3,
            cache_max_entries: 100,
            cache_ttl_secs: 60 * 60 * 24 * 30,
            grid_digits: 10,
        }
    }
}

impl AppConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            anyhow::bail!(
                "api_base_url must start with http:// or https:// (got '{}')",
                self.api_base_url
            );
        }

        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }
        if self.probe_timeout_secs == 0 {
            anyhow::bail!("probe_timeout_secs must be greater than zero");
        }

        self.connectivity_probe_addr
            .parse::<SocketAddr>()
            .with_context(|| {
                format!(
                    "connectivity_probe_addr must be an ip:port address (got '{}')",
                    self.connectivity_probe_addr
                )
            })?;

        if self.cache_max_entries == 0 {
            anyhow::bail!("cache_max_entries must be greater than zero");
        }
        if self.cache_ttl_secs == 0 || self.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            anyhow::bail!(
                "cache_ttl_secs must be between 1 and {} (got {})",
                MAX_CACHE_TTL_SECS,
                self.cache_ttl_secs
            );
        }

        if self.grid_digits > 10 || self.grid_digits % 2 != 0 {
            anyhow::bail!(
                "grid_digits must be an even number from 0 to 10 (got {})",
                self.grid_digits
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_base_url, "https://api.postcodes.io");
        assert_eq!(config.cache_max_entries, 100);
        assert_eq!(config.cache_ttl_secs, 2_592_000);
        assert_eq!(config.grid_digits, 10);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ngr.json");

        let config = AppConfig {
            api_base_url: "http://localhost:9000".to_string(),
            grid_digits: 8,
            ..AppConfig::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{"request_timeout_secs": 30}"#).unwrap();

        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.request_timeout_secs, 30);
        assert_eq!(loaded.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        let err = AppConfig::load_from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read configuration"));
    }

    #[test]
    fn test_load_or_default_without_path() {
        assert_eq!(AppConfig::load_or_default(None).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_longest_cache_ttl_is_valid() {
        let config = AppConfig {
            cache_ttl_secs: MAX_CACHE_TTL_SECS,
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let bad = [
            AppConfig {
                api_base_url: "ftp://example.com".into(),
                ..AppConfig::default()
            },
            AppConfig {
                request_timeout_secs: 0,
                ..AppConfig::default()
            },
            AppConfig {
                probe_timeout_secs: 0,
                ..AppConfig::default()
            },
            AppConfig {
                connectivity_probe_addr: "example.com".into(),
                ..AppConfig::default()
            },
            AppConfig {
                cache_max_entries: 0,
                ..AppConfig::default()
            },
            AppConfig {
                cache_ttl_secs: 0,
                ..AppConfig::default()
            },
            AppConfig {
                cache_ttl_secs: MAX_CACHE_TTL_SECS + 1,
                ..AppConfig::default()
            },
            AppConfig {
                cache_ttl_secs: u64::MAX,
                ..AppConfig::default()
            },
            AppConfig {
                grid_digits: 7,
                ..AppConfig::default()
            },
            AppConfig {
                grid_digits: 12,
                ..AppConfig::default()
            },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "accepted {config:?}");
        }
    }
}
