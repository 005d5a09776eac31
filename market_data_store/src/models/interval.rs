use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The candle interval was not one of the supported values.
#[derive(Debug, Error)]
#[error("Invalid interval '{0}', valid intervals: 1minute, 15minute, 30minute, day, week, month")]
pub struct IntervalError(pub String);

/// Candle interval for a stored partition.
///
/// The string forms match the partition directory names on disk
/// (`1minute`, `15minute`, `30minute`, `day`, `week`, `month`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[serde(rename = "1minute")]
    Minute1,
    #[serde(rename = "15minute")]
    Minute15,
    #[serde(rename = "30minute")]
    Minute30,
    Day,
    Week,
    Month,
}

impl Interval {
    /// Directory name used for this interval inside a symbol partition.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1minute",
            Interval::Minute15 => "15minute",
            Interval::Minute30 => "30minute",
            Interval::Day => "day",
            Interval::Week => "week",
            Interval::Month => "month",
        }
    }

    /// Nominal interval length in minutes.
    ///
    /// Week and month are calendar approximations; gap detection for those
    /// intervals goes through the trading calendar instead of this number.
    pub fn minutes(&self) -> u32 {
        match self {
            Interval::Minute1 => 1,
            Interval::Minute15 => 15,
            Interval::Minute30 => 30,
            Interval::Day => 1440,
            Interval::Week => 7 * 1440,
            Interval::Month => 30 * 1440,
        }
    }

    /// True for intervals finer than one day.
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Interval::Minute1 | Interval::Minute15 | Interval::Minute30
        )
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1minute" | "1min" | "1m" => Ok(Interval::Minute1),
            "15minute" | "15min" | "15m" => Ok(Interval::Minute15),
            "30minute" | "30min" | "30m" => Ok(Interval::Minute30),
            "day" | "1d" | "daily" => Ok(Interval::Day),
            "week" | "1w" | "weekly" => Ok(Interval::Week),
            "month" | "1mo" | "monthly" => Ok(Interval::Month),
            other => Err(IntervalError(other.to_string())),
        }
    }
}
