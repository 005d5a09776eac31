//! Canonical in-memory representation of an OHLCV candle.
//!
//! This struct is the standard output of the retrieval service and of all
//! [`DataProvider`](crate::providers::DataProvider) implementations.

use chrono::{DateTime, Utc};

use crate::models::instrument::InstrumentKey;
use crate::models::interval::Interval;

/// A single OHLCV candle for a given timestamp.
///
/// Timestamps are UTC instants; IST is applied only at presentation and
/// date-bucketing edges. Volume and open interest are integral, matching the
/// stored column types exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    /// The timestamp for this candle (UTC, nanosecond precision preserved).
    pub timestamp: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the candle interval.
    pub high: f64,

    /// Lowest price during the candle interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Volume traded during the candle interval.
    pub volume: i64,

    /// Open interest at the candle close (zero for cash instruments).
    pub open_interest: i64,
}

/// A complete candle series for a single instrument and interval.
///
/// Groups the candles with their instrument and [`Interval`], making the data
/// set self-describing.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeries {
    /// The instrument this series represents.
    pub instrument: InstrumentKey,
    /// The time interval of each candle in the series.
    pub interval: Interval,
    /// The collection of OHLCV candles, ascending by timestamp.
    pub candles: Vec<Candle>,
}

impl CandleSeries {
    /// The most recent candle in the series, if any.
    pub fn latest(&self) -> Option<&Candle> {
        self.candles.last()
    }
}
