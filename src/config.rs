//! Server configuration from environment variables
//!
//! | Variable             | Default      |
//! |----------------------|--------------|
//! | `PORT`               | 3000         |
//! | `DATA_DIR`           | (embedded)   |
//! | `DETECTION_DELAY_MS` | 2000         |
//! | `MAX_UPLOAD_BYTES`   | 10485760     |
//! | `CACHE_TTL_SECS`     | 300          |
//!
//! Unset or empty variables take the default. Values that fail to parse are
//! errors, so a typo never silently falls back.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::detection::DEFAULT_LATENCY;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    /// Directory holding `pests.json`, `pesticides.json`, `crops.json`.
    /// `None` uses the catalogs compiled into the binary.
    pub data_dir: Option<PathBuf>,
    pub detection_latency: Duration,
    pub max_upload_bytes: usize,
    pub cache_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: None,
            detection_latency: DEFAULT_LATENCY,
            max_upload_bytes: 10 * 1024 * 1024,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_or(value("PORT"), "PORT", defaults.port)?;
        let data_dir = value("DATA_DIR").map(PathBuf::from);
        let detection_latency = value("DETECTION_DELAY_MS")
            .map(|raw| parse::<u64>(&raw, "DETECTION_DELAY_MS").map(Duration::from_millis))
            .transpose()?
            .unwrap_or(defaults.detection_latency);
        let max_upload_bytes =
            parse_or(value("MAX_UPLOAD_BYTES"), "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?;
        let cache_ttl = value("CACHE_TTL_SECS")
            .map(|raw| parse::<u64>(&raw, "CACHE_TTL_SECS").map(Duration::from_secs))
            .transpose()?
            .unwrap_or(defaults.cache_ttl);

        Ok(Self {
            port,
            data_dir,
            detection_latency,
            max_upload_bytes,
            cache_ttl,
        })
    }
}

fn parse<T>(raw: &str, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Invalid {}: '{}'", key, raw))
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => parse(&raw, key),
        None => Ok(default),
    }
}
