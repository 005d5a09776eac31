//! Ingest pipelines: fetch from a provider and persist to the store.
//!
//! Two entry points cover the recurring jobs:
//! - [`sync_candle_history`] backfills one candle partition range
//! - [`snapshot_option_chain`] captures today's chain and extends the
//!   ATM IV history
//!
//! Both are idempotent: a partition or snapshot file that already exists
//! is skipped, so schedulers can re-run jobs safely.

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::errors::Error;
use crate::metrics::atm_implied_vol;
use crate::models::instrument::InstrumentKey;
use crate::models::interval::Interval;
use crate::models::iv::IvObservation;
use crate::providers::{CandleRequest, DataProvider};
use crate::ratelimit::ApiRateLimiter;
use crate::session;
use crate::store::DataStore;

/// How one ingest job ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngestStatus {
    /// Data was fetched and written.
    Success,
    /// The target file already existed; nothing was fetched.
    Skipped,
    /// The provider call or write failed.
    Failed,
}

/// Result of one ingest job.
#[derive(Clone, Debug)]
pub struct IngestOutcome {
    pub status: IngestStatus,
    /// Rows written (0 when skipped or failed).
    pub records: usize,
    pub message: String,
}

impl IngestOutcome {
    fn success(records: usize, message: impl Into<String>) -> Self {
        Self {
            status: IngestStatus::Success,
            records,
            message: message.into(),
        }
    }

    fn skipped(message: impl Into<String>) -> Self {
        Self {
            status: IngestStatus::Skipped,
            records: 0,
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            status: IngestStatus::Failed,
            records: 0,
            message: message.into(),
        }
    }
}

/// Fetch candles for `[start, end]` and write them as one partition file.
///
/// Skips the fetch when the target file already exists, unless
/// `overwrite` is set. Provider failures are reported in the outcome
/// rather than returned, so batch callers can keep going.
pub async fn sync_candle_history(
    store: &DataStore,
    provider: &dyn DataProvider,
    limiter: &ApiRateLimiter,
    instrument: &InstrumentKey,
    interval: Interval,
    start: NaiveDate,
    end: NaiveDate,
    overwrite: bool,
) -> IngestOutcome {
    let target = store.partition_file(instrument, interval, start, end);
    if target.is_file() && !overwrite {
        info!(%instrument, %interval, "partition already present, skipping");
        return IngestOutcome::skipped(format!("{} already exists", target.display()));
    }

    limiter.acquire().await;

    let request = CandleRequest {
        instrument: instrument.clone(),
        interval,
        start,
        end,
    };
    let series = match provider.fetch_candles(request).await {
        Ok(series) => series,
        Err(e) => {
            warn!(%instrument, %interval, error = %e, "candle fetch failed");
            return IngestOutcome::failed(e.to_string());
        }
    };

    if series.candles.is_empty() {
        info!(%instrument, %interval, "provider returned no candles");
        return IngestOutcome::skipped("no candles in range");
    }

    match store.write_candles(instrument, interval, start, end, &series.candles) {
        Ok(path) => {
            info!(%instrument, %interval, path = %path.display(), rows = series.candles.len(), "partition written");
            IngestOutcome::success(
                series.candles.len(),
                format!("wrote {}", path.display()),
            )
        }
        Err(e) => {
            warn!(%instrument, %interval, error = %e, "partition write failed");
            IngestOutcome::failed(e.to_string())
        }
    }
}

/// Capture today's option chain for one underlying and expiry.
///
/// Writes the daily snapshot file and appends today's ATM IV observation
/// to the underlying's IV history. The snapshot date is today's IST date.
pub async fn snapshot_option_chain(
    store: &DataStore,
    provider: &dyn DataProvider,
    limiter: &ApiRateLimiter,
    underlying: &InstrumentKey,
    expiry: NaiveDate,
) -> Result<IngestOutcome, Error> {
    let snapshot_date = session::ist_date(Utc::now());
    let target = store.snapshot_file(snapshot_date, underlying, expiry);
    if target.is_file() {
        info!(%underlying, %expiry, "snapshot already present, skipping");
        return Ok(IngestOutcome::skipped(format!(
            "{} already exists",
            target.display()
        )));
    }

    limiter.acquire().await;

    let rows = match provider.fetch_option_chain(underlying, expiry).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!(%underlying, %expiry, error = %e, "chain fetch failed");
            return Ok(IngestOutcome::failed(e.to_string()));
        }
    };
    if rows.is_empty() {
        return Ok(IngestOutcome::skipped("provider returned an empty chain"));
    }

    let path = store.write_chain_snapshot(snapshot_date, underlying, expiry, &rows)?;
    info!(%underlying, %expiry, path = %path.display(), rows = rows.len(), "snapshot written");

    // Extend the IV history while the chain is in hand. A chain without
    // usable ATM quotes leaves the history untouched.
    if let Some(atm_iv) = atm_implied_vol(&rows) {
        let observation = IvObservation {
            date: snapshot_date,
            underlying: underlying.to_string(),
            atm_iv,
            spot_price: rows[0].underlying_spot,
        };
        store.append_iv_observation(underlying, observation)?;
        info!(%underlying, date = %snapshot_date, atm_iv, "IV history extended");
    } else {
        warn!(%underlying, %expiry, "no usable ATM quotes, IV history not extended");
    }

    Ok(IngestOutcome::success(
        rows.len(),
        format!("wrote {}", path.display()),
    ))
}
