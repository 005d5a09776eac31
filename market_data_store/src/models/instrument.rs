use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The instrument key could not be parsed.
#[derive(Debug, Error)]
#[error("Invalid instrument key '{0}', expected '<SEGMENT>|<SYMBOL>' (e.g. 'NSE_INDEX|Nifty 50')")]
pub struct InstrumentKeyError(pub String);

/// Exchange segment of an instrument.
///
/// Determines the top-level directory of the OHLCV store
/// (`indices/` vs `equities/`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    Index,
    Equity,
}

impl Segment {
    /// Top-level store directory for this segment.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Segment::Index => "indices",
            Segment::Equity => "equities",
        }
    }

    /// Broker-style key prefix (`NSE_INDEX` / `NSE_EQ`).
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Segment::Index => "NSE_INDEX",
            Segment::Equity => "NSE_EQ",
        }
    }
}

/// A parsed instrument key, e.g. `NSE_INDEX|Nifty 50` or `NSE_EQ|RELIANCE`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentKey {
    pub segment: Segment,
    pub symbol: String,
}

impl InstrumentKey {
    pub fn new(segment: Segment, symbol: impl Into<String>) -> Self {
        Self {
            segment,
            symbol: symbol.into(),
        }
    }

    pub fn index(symbol: impl Into<String>) -> Self {
        Self::new(Segment::Index, symbol)
    }

    pub fn equity(symbol: impl Into<String>) -> Self {
        Self::new(Segment::Equity, symbol)
    }

    /// Symbol form used in file and directory names.
    ///
    /// Spaces and path separators are replaced so `Nifty 50` becomes
    /// `Nifty_50`.
    pub fn path_symbol(&self) -> String {
        self.symbol
            .chars()
            .map(|c| match c {
                ' ' | '/' | '\\' | '|' => '_',
                other => other,
            })
            .collect()
    }
}

impl fmt::Display for InstrumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.segment.key_prefix(), self.symbol)
    }
}

impl FromStr for InstrumentKey {
    type Err = InstrumentKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, symbol) = s
            .split_once('|')
            .ok_or_else(|| InstrumentKeyError(s.to_string()))?;
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(InstrumentKeyError(s.to_string()));
        }
        let segment = match prefix.trim() {
            "NSE_INDEX" | "BSE_INDEX" => Segment::Index,
            "NSE_EQ" | "BSE_EQ" => Segment::Equity,
            _ => return Err(InstrumentKeyError(s.to_string())),
        };
        Ok(Self::new(segment, symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_index_key() {
        let key: InstrumentKey = "NSE_INDEX|Nifty 50".parse().unwrap();
        assert_eq!(key.segment, Segment::Index);
        assert_eq!(key.symbol, "Nifty 50");
        assert_eq!(key.path_symbol(), "Nifty_50");
        assert_eq!(key.to_string(), "NSE_INDEX|Nifty 50");
    }

    #[test]
    fn parses_equity_key() {
        let key: InstrumentKey = "NSE_EQ|RELIANCE".parse().unwrap();
        assert_eq!(key.segment, Segment::Equity);
        assert_eq!(key.segment.dir_name(), "equities");
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!("Nifty 50".parse::<InstrumentKey>().is_err());
        assert!("NSE_FO|NIFTY24FEB".parse::<InstrumentKey>().is_err());
        assert!("NSE_EQ|".parse::<InstrumentKey>().is_err());
    }
}
