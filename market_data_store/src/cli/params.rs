use std::error::Error;

use chrono::NaiveDate;

use crate::models::instrument::InstrumentKey;
use crate::models::interval::Interval;
use crate::schema::DatasetKind;

pub fn parse_date(value: &str) -> Result<NaiveDate, Box<dyn Error>> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date `{value}`, expected YYYY-MM-DD").into())
}

pub fn parse_instrument(value: &str) -> Result<InstrumentKey, Box<dyn Error>> {
    value.parse::<InstrumentKey>().map_err(|e| e.into())
}

pub fn parse_interval(value: &str) -> Result<Interval, Box<dyn Error>> {
    value.parse::<Interval>().map_err(|e| e.into())
}

pub fn parse_dataset_kind(value: &str) -> Result<DatasetKind, Box<dyn Error>> {
    match value.trim().to_lowercase().as_str() {
        "ohlcv" | "candles" => Ok(DatasetKind::Ohlcv),
        "option_chain" | "chain" => Ok(DatasetKind::OptionChain),
        "iv_history" | "iv" => Ok(DatasetKind::IvHistory),
        _ => Err(format!(
            "Invalid dataset kind `{value}`, expected ohlcv, option_chain, or iv_history"
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::instrument::Segment;

    #[test]
    fn parses_iso_dates() {
        let date = parse_date("2025-01-06").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        assert!(parse_date("06-01-2025").is_err());
        assert!(parse_date("not a date").is_err());
    }

    #[test]
    fn parses_instrument_keys() {
        let key = parse_instrument("NSE_INDEX|Nifty 50").unwrap();
        assert_eq!(key.segment, Segment::Index);
        assert_eq!(key.symbol, "Nifty 50");
        assert!(parse_instrument("Nifty 50").is_err());
    }

    #[test]
    fn parses_intervals() {
        assert_eq!(parse_interval("15m").unwrap(), Interval::Minute15);
        assert_eq!(parse_interval("day").unwrap(), Interval::Day);
        assert!(parse_interval("7h").is_err());
    }

    #[test]
    fn parses_dataset_kinds() {
        assert_eq!(parse_dataset_kind("ohlcv").unwrap(), DatasetKind::Ohlcv);
        assert_eq!(
            parse_dataset_kind("option_chain").unwrap(),
            DatasetKind::OptionChain
        );
        assert_eq!(parse_dataset_kind("iv").unwrap(), DatasetKind::IvHistory);
        assert!(parse_dataset_kind("parquet").is_err());
    }
}
