//! The historical data retrieval service.
//!
//! A synchronous, read-mostly facade over the [`DataStore`]. All behaviour is
//! driven by the [`ServiceConfig`] passed to the constructor; the service
//! holds no ambient global state.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::errors::Error;
use crate::frame;
use crate::gaps::{self, Gap};
use crate::metrics::{self, ReturnMetrics, VolatilityMetrics};
use crate::models::candle::{Candle, CandleSeries};
use crate::models::instrument::InstrumentKey;
use crate::models::interval::Interval;
use crate::models::iv::IvMetrics;
use crate::models::option_chain::OptionQuote;
use crate::session::{TradingCalendar, ist_date};
use crate::store::DataStore;

/// Service for retrieving historical OHLCV data, option-chain snapshots, and
/// IV metrics from the file store.
pub struct HistoricalDataService {
    store: DataStore,
    config: ServiceConfig,
    calendar: TradingCalendar,
}

impl HistoricalDataService {
    /// Build a service from an explicit configuration, using a weekend-only
    /// trading calendar.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_calendar(config, TradingCalendar::new())
    }

    /// Build a service with an explicit trading calendar (e.g. one carrying
    /// exchange holidays).
    pub fn with_calendar(config: ServiceConfig, calendar: TradingCalendar) -> Self {
        let store = DataStore::new(&config.data_root);
        Self {
            store,
            config,
            calendar,
        }
    }

    /// The underlying store handle.
    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Get historical OHLCV candles for an instrument within an IST date
    /// range, ascending by timestamp with duplicates removed.
    ///
    /// Fails with `NotFound` when no partition exists for the
    /// instrument/interval.
    pub fn get_historical_data(
        &self,
        instrument: &InstrumentKey,
        start_date: NaiveDate,
        end_date: NaiveDate,
        interval: Interval,
    ) -> Result<CandleSeries, Error> {
        let df = self.store.read_candle_partition(instrument, interval)?;
        let mut candles = frame::frame_to_candles(&df)?;

        candles.retain(|c| {
            let d = ist_date(c.timestamp);
            d >= start_date && d <= end_date
        });
        candles.sort_by_key(|c| c.timestamp);
        candles.dedup_by_key(|c| c.timestamp);

        info!(
            instrument = %instrument,
            %interval,
            %start_date,
            %end_date,
            candles = candles.len(),
            "loaded historical candles"
        );

        Ok(CandleSeries {
            instrument: instrument.clone(),
            interval,
            candles,
        })
    }

    /// Get the most recent candle stored for an instrument at an interval.
    pub fn latest_candle(
        &self,
        instrument: &InstrumentKey,
        interval: Interval,
    ) -> Result<Candle, Error> {
        let df = self.store.read_candle_partition(instrument, interval)?;
        let mut candles = frame::frame_to_candles(&df)?;
        candles.sort_by_key(|c| c.timestamp);
        candles
            .pop()
            .ok_or_else(|| Error::NotFound(format!("no candles stored for {instrument}")))
    }

    /// Get one day's option-chain snapshot rows for an underlying and expiry.
    ///
    /// Fails with `NotFound` if no snapshot file exists for that date.
    pub fn get_option_chain_snapshot(
        &self,
        underlying: &InstrumentKey,
        expiry: NaiveDate,
        snapshot_date: NaiveDate,
    ) -> Result<Vec<OptionQuote>, Error> {
        let rows = self
            .store
            .read_chain_snapshot(snapshot_date, underlying, expiry)?;
        debug!(underlying = %underlying, %expiry, %snapshot_date, rows = rows.len(), "loaded chain snapshot");
        Ok(rows)
    }

    /// Compute IV rank/percentile for an underlying from its accumulated IV
    /// history.
    ///
    /// Fails with `InsufficientData` when fewer than
    /// `min_iv_history_days` observations are stored.
    pub fn get_iv_metrics(&self, underlying: &InstrumentKey) -> Result<IvMetrics, Error> {
        let history = self.store.read_iv_history(underlying)?;
        metrics::compute_iv_metrics(
            &history,
            self.config.iv_lookback_days,
            self.config.min_iv_history_days,
        )
    }

    /// Detect gaps in an instrument's stored candles over an IST date range,
    /// using the configured gap policy.
    pub fn detect_gaps(
        &self,
        instrument: &InstrumentKey,
        start_date: NaiveDate,
        end_date: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<Gap>, Error> {
        let series = self.get_historical_data(instrument, start_date, end_date, interval)?;
        Ok(gaps::detect_gaps(
            &series.candles,
            interval.minutes(),
            self.config.gap_policy,
            &self.calendar,
        ))
    }

    /// Return metrics over the instrument's daily candles in a date range.
    pub fn return_metrics(
        &self,
        instrument: &InstrumentKey,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<ReturnMetrics, Error> {
        let series = self.get_historical_data(instrument, start_date, end_date, Interval::Day)?;
        metrics::return_metrics(&series.candles)
    }

    /// Realized volatility over the instrument's daily candles in a date
    /// range.
    pub fn volatility_metrics(
        &self,
        instrument: &InstrumentKey,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<VolatilityMetrics, Error> {
        let series = self.get_historical_data(instrument, start_date, end_date, Interval::Day)?;
        metrics::volatility_metrics(&series.candles)
    }
}
