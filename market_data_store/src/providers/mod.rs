//! Provider abstraction for upstream market-data sources.
//!
//! [`DataProvider`] is the unified interface for fetching candles and
//! option-chain snapshots from any broker API. Concrete implementations
//! (currently [`UpstoxProvider`](upstox_rest::UpstoxProvider)) handle
//! vendor-specific endpoints and response shapes.
//!
//! The trait is async and object-safe, so callers can pick a provider at
//! runtime behind `dyn DataProvider`. Authentication and rate limiting are
//! the caller's concern: ingest wraps calls in an
//! [`ApiRateLimiter`](crate::ratelimit::ApiRateLimiter).

mod errors;
pub mod upstox_rest;

pub use errors::ProviderError;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::candle::CandleSeries;
use crate::models::instrument::InstrumentKey;
use crate::models::interval::Interval;
use crate::models::option_chain::OptionQuote;

/// Parameters for a historical-candle request.
#[derive(Clone, Debug)]
pub struct CandleRequest {
    /// The instrument to fetch.
    pub instrument: InstrumentKey,
    /// The candle interval.
    pub interval: Interval,
    /// First IST date of the range (inclusive).
    pub start: NaiveDate,
    /// Last IST date of the range (inclusive).
    pub end: NaiveDate,
}

#[async_trait]
pub trait DataProvider {
    /// Fetch historical candles for one instrument and date range.
    async fn fetch_candles(&self, params: CandleRequest) -> Result<CandleSeries, ProviderError>;

    /// Fetch the current option chain for an underlying and expiry.
    async fn fetch_option_chain(
        &self,
        underlying: &InstrumentKey,
        expiry: NaiveDate,
    ) -> Result<Vec<OptionQuote>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyProvider;

    #[async_trait]
    impl DataProvider for EmptyProvider {
        async fn fetch_candles(
            &self,
            params: CandleRequest,
        ) -> Result<CandleSeries, ProviderError> {
            Ok(CandleSeries {
                instrument: params.instrument,
                interval: params.interval,
                candles: vec![],
            })
        }

        async fn fetch_option_chain(
            &self,
            _underlying: &InstrumentKey,
            _expiry: NaiveDate,
        ) -> Result<Vec<OptionQuote>, ProviderError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn trait_is_object_safe() {
        let provider: Box<dyn DataProvider> = Box::new(EmptyProvider);
        let params = CandleRequest {
            instrument: InstrumentKey::index("Nifty 50"),
            interval: Interval::Day,
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        };
        let series = provider.fetch_candles(params).await.unwrap();
        assert!(series.candles.is_empty());
    }
}
