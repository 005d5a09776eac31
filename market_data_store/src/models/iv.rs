//! Implied-volatility history and derived metrics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily ATM implied-volatility observation for an underlying.
///
/// Accumulated in `options/iv_history/<underlying>.feather`, one row per
/// trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IvObservation {
    /// Date of the observation.
    pub date: NaiveDate,
    /// Full underlying key string.
    pub underlying: String,
    /// ATM implied volatility (%).
    pub atm_iv: f64,
    /// Spot price at observation time.
    pub spot_price: f64,
}

/// IV rank and percentile for an underlying, derived from its IV history.
///
/// A typed result rather than a string-keyed map: callers read
/// `metrics.iv_rank`, not `metrics["iv_rank"]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IvMetrics {
    /// Position of the current IV within the lookback [min, max] range,
    /// 0-100.
    pub iv_rank: f64,
    /// Percentage of lookback observations strictly below the current IV,
    /// 0-100.
    pub iv_percentile: f64,
    /// The most recent ATM IV observation (%).
    pub current_iv: f64,
    /// Number of observations in the lookback window.
    pub observations: usize,
}
