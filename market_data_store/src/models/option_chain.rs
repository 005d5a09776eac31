//! Option-chain snapshot rows.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The option type string was not `CE` or `PE`.
#[derive(Debug, Error)]
#[error("Invalid option type '{0}', expected 'CE' or 'PE'")]
pub struct OptionTypeError(pub String);

/// Call (`CE`) or put (`PE`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    #[serde(rename = "CE")]
    Call,
    #[serde(rename = "PE")]
    Put,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "CE",
            OptionType::Put => "PE",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = OptionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "CE" => Ok(OptionType::Call),
            "PE" => Ok(OptionType::Put),
            other => Err(OptionTypeError(other.to_string())),
        }
    }
}

/// One contract row of an option-chain snapshot.
///
/// Uniquely identified by (timestamp, underlying_symbol, expiry, strike,
/// option_type). Snapshots accumulate one file per calendar day, so all rows
/// in one stored file share the same IST date.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionQuote {
    /// Snapshot timestamp (UTC).
    pub timestamp: DateTime<Utc>,
    /// Full underlying key string, e.g. `NSE_INDEX|Nifty 50`.
    pub underlying_symbol: String,
    /// Spot price of the underlying at snapshot time.
    pub underlying_spot: f64,
    /// Option expiry date.
    pub expiry: NaiveDate,
    /// Strike price.
    pub strike: f64,
    /// Call or put.
    pub option_type: OptionType,
    /// Last traded price.
    pub ltp: f64,
    /// Best bid price.
    pub bid_price: f64,
    /// Best bid quantity.
    pub bid_qty: i64,
    /// Best ask price.
    pub ask_price: f64,
    /// Best ask quantity.
    pub ask_qty: i64,
    /// Open interest.
    pub oi: i64,
    /// Change in open interest over the session.
    pub oi_change: i64,
    /// Traded volume.
    pub volume: i64,
    /// Implied volatility (%).
    pub iv: f64,
    /// Delta, in [-1, 1].
    pub delta: f64,
    /// Gamma.
    pub gamma: f64,
    /// Theta (daily time decay).
    pub theta: f64,
    /// Vega.
    pub vega: f64,
}
