//! Service configuration.
//!
//! All process-wide knobs live in an explicit [`ServiceConfig`] passed to the
//! service constructor; nothing is read from ambient global state. The struct
//! deserializes from TOML with per-field defaults, so a config file only
//! needs to name the fields it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::Error;
use crate::gaps::GapPolicy;

/// Default lookback window for IV rank/percentile, in trading days.
pub const DEFAULT_IV_LOOKBACK_DAYS: usize = 252;

/// Default minimum number of IV history days before metrics are computed.
pub const DEFAULT_MIN_IV_HISTORY_DAYS: usize = 20;

/// Upstox historical API rate limit.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 250;

/// Configuration for [`HistoricalDataService`](crate::service::HistoricalDataService).
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Root directory of the data store.
    pub data_root: PathBuf,

    /// Lookback window for IV rank/percentile, in trading days.
    #[serde(default = "default_iv_lookback")]
    pub iv_lookback_days: usize,

    /// Minimum IV history days required before `get_iv_metrics` succeeds.
    #[serde(default = "default_min_iv_history")]
    pub min_iv_history_days: usize,

    /// Upstream API request budget per minute, enforced at the ingest edge.
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,

    /// Whether gap detection treats market-closed periods as expected.
    #[serde(default)]
    pub gap_policy: GapPolicy,
}

fn default_iv_lookback() -> usize {
    DEFAULT_IV_LOOKBACK_DAYS
}

fn default_min_iv_history() -> usize {
    DEFAULT_MIN_IV_HISTORY_DAYS
}

fn default_requests_per_minute() -> u32 {
    DEFAULT_REQUESTS_PER_MINUTE
}

impl ServiceConfig {
    /// Config with defaults for everything except the data root.
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            iv_lookback_days: DEFAULT_IV_LOOKBACK_DAYS,
            min_iv_history_days: DEFAULT_MIN_IV_HISTORY_DAYS,
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            gap_policy: GapPolicy::default(),
        }
    }

    /// Load a config from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let content = fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_uses_defaults() {
        let cfg: ServiceConfig = toml::from_str(r#"data_root = "data/historical""#).unwrap();
        assert_eq!(cfg.data_root, PathBuf::from("data/historical"));
        assert_eq!(cfg.iv_lookback_days, DEFAULT_IV_LOOKBACK_DAYS);
        assert_eq!(cfg.min_iv_history_days, DEFAULT_MIN_IV_HISTORY_DAYS);
        assert_eq!(cfg.requests_per_minute, DEFAULT_REQUESTS_PER_MINUTE);
        assert_eq!(cfg.gap_policy, GapPolicy::SkipNonTrading);
    }

    #[test]
    fn full_toml_overrides() {
        let cfg: ServiceConfig = toml::from_str(
            r#"
            data_root = "/var/data"
            iv_lookback_days = 90
            min_iv_history_days = 5
            requests_per_minute = 100
            gap_policy = "strict"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.iv_lookback_days, 90);
        assert_eq!(cfg.gap_policy, GapPolicy::Strict);
    }
}
