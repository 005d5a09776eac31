//! Fixed column schemas for each stored dataset kind.
//!
//! Column names and types are the storage contract: a stored file must match
//! its kind's schema exactly for validation to pass. Timestamps are stored as
//! `Int64` epoch nanoseconds so a write-then-read round trip is value-exact.

use polars::prelude::DataType;

/// The kind of dataset a stored file holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatasetKind {
    /// OHLCV candles for an index or equity.
    Ohlcv,
    /// One day of option-chain snapshot rows.
    OptionChain,
    /// Accumulated daily ATM-IV observations for one underlying.
    IvHistory,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Ohlcv => "ohlcv",
            DatasetKind::OptionChain => "option_chain",
            DatasetKind::IvHistory => "iv_history",
        }
    }
}

/// One column of a dataset schema.
#[derive(Debug)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub dtype: DataType,
    pub required: bool,
}

const fn col(name: &'static str, dtype: DataType, required: bool) -> ColumnSpec {
    ColumnSpec {
        name,
        dtype,
        required,
    }
}

/// OHLCV candle schema. `timestamp` is epoch nanoseconds.
pub static OHLCV_COLUMNS: &[ColumnSpec] = &[
    col("timestamp", DataType::Int64, true),
    col("open", DataType::Float64, true),
    col("high", DataType::Float64, true),
    col("low", DataType::Float64, true),
    col("close", DataType::Float64, true),
    col("volume", DataType::Int64, false),
    col("open_interest", DataType::Int64, false),
];

/// Option-chain snapshot schema. `expiry_date` is an ISO `YYYY-MM-DD` string.
pub static OPTION_CHAIN_COLUMNS: &[ColumnSpec] = &[
    col("timestamp", DataType::Int64, true),
    col("underlying_symbol", DataType::String, true),
    col("underlying_spot", DataType::Float64, true),
    col("expiry_date", DataType::String, true),
    col("strike_price", DataType::Float64, true),
    col("option_type", DataType::String, true),
    col("ltp", DataType::Float64, true),
    col("bid_price", DataType::Float64, false),
    col("bid_qty", DataType::Int64, false),
    col("ask_price", DataType::Float64, false),
    col("ask_qty", DataType::Int64, false),
    col("oi", DataType::Int64, false),
    col("oi_change", DataType::Int64, false),
    col("volume", DataType::Int64, false),
    col("iv", DataType::Float64, false),
    col("delta", DataType::Float64, false),
    col("gamma", DataType::Float64, false),
    col("theta", DataType::Float64, false),
    col("vega", DataType::Float64, false),
];

/// IV history schema. `date` is an ISO `YYYY-MM-DD` string.
pub static IV_HISTORY_COLUMNS: &[ColumnSpec] = &[
    col("date", DataType::String, true),
    col("underlying", DataType::String, true),
    col("atm_iv", DataType::Float64, true),
    col("spot_price", DataType::Float64, false),
];

/// All columns of a dataset kind, in storage order.
pub fn columns(kind: DatasetKind) -> &'static [ColumnSpec] {
    match kind {
        DatasetKind::Ohlcv => OHLCV_COLUMNS,
        DatasetKind::OptionChain => OPTION_CHAIN_COLUMNS,
        DatasetKind::IvHistory => IV_HISTORY_COLUMNS,
    }
}

/// Names of the required columns of a dataset kind.
pub fn required_columns(kind: DatasetKind) -> impl Iterator<Item = &'static str> {
    columns(kind).iter().filter(|c| c.required).map(|c| c.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ohlcv_required_set() {
        let req: Vec<_> = required_columns(DatasetKind::Ohlcv).collect();
        assert_eq!(req, ["timestamp", "open", "high", "low", "close"]);
    }

    #[test]
    fn option_chain_key_columns_are_required() {
        let req: Vec<_> = required_columns(DatasetKind::OptionChain).collect();
        for key in [
            "timestamp",
            "underlying_symbol",
            "expiry_date",
            "strike_price",
            "option_type",
        ] {
            assert!(req.contains(&key), "{key} must be required");
        }
    }
}
