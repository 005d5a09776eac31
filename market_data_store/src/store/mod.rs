//! The on-disk data store: a directory tree of Arrow-IPC (Feather) files
//! partitioned by instrument, interval, and date.
//!
//! ```text
//! <root>/
//!   indices/<SYMBOL>/<interval>/<start>_<end>.feather
//!   equities/<SYMBOL>/<interval>/<start>_<end>.feather
//!   options/snapshots/<YYYY-MM-DD>/<UNDERLYING>_<EXPIRY>.feather
//!   options/iv_history/<UNDERLYING>.feather
//! ```
//!
//! All writes go through a temp file plus atomic rename, so concurrent
//! readers never observe a partially written file.

pub mod layout;
mod read;
mod write;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::DataFrame;
use tracing::debug;

use crate::errors::Error;
use crate::frame;
use crate::models::candle::Candle;
use crate::models::instrument::InstrumentKey;
use crate::models::interval::Interval;
use crate::models::iv::IvObservation;
use crate::models::option_chain::OptionQuote;

pub use read::{read_frame, read_partition};
pub use write::write_frame_atomic;

/// Handle to the data store rooted at a directory.
#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a candle partition.
    pub fn partition_dir(&self, instrument: &InstrumentKey, interval: Interval) -> PathBuf {
        layout::partition_dir(&self.root, instrument, interval)
    }

    /// File path for one candle range within a partition.
    pub fn partition_file(
        &self,
        instrument: &InstrumentKey,
        interval: Interval,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PathBuf {
        layout::partition_file(&self.root, instrument, interval, start, end)
    }

    /// File path for one day's option-chain snapshot.
    pub fn snapshot_file(
        &self,
        snapshot_date: NaiveDate,
        underlying: &InstrumentKey,
        expiry: NaiveDate,
    ) -> PathBuf {
        layout::snapshot_file(&self.root, snapshot_date, underlying, expiry)
    }

    /// File path for an underlying's accumulated IV history.
    pub fn iv_history_file(&self, underlying: &InstrumentKey) -> PathBuf {
        layout::iv_history_file(&self.root, underlying)
    }

    /// Read every file of a candle partition into one DataFrame.
    ///
    /// Fails with `NotFound` when the partition directory does not exist or
    /// holds no feather files.
    pub fn read_candle_partition(
        &self,
        instrument: &InstrumentKey,
        interval: Interval,
    ) -> Result<DataFrame, Error> {
        let dir = self.partition_dir(instrument, interval);
        read_partition(&dir)
            .map_err(|e| match e {
                Error::NotFound(_) => {
                    Error::NotFound(format!("no {interval} partition for {instrument}"))
                }
                other => other,
            })
    }

    /// Write one candle range file into its partition, atomically.
    pub fn write_candles(
        &self,
        instrument: &InstrumentKey,
        interval: Interval,
        start: NaiveDate,
        end: NaiveDate,
        candles: &[Candle],
    ) -> Result<PathBuf, Error> {
        let path = self.partition_file(instrument, interval, start, end);
        let mut df = frame::candles_to_frame(candles)?;
        write_frame_atomic(&mut df, &path)?;
        debug!(
            instrument = %instrument,
            interval = %interval,
            rows = candles.len(),
            path = %path.display(),
            "wrote candle partition file"
        );
        Ok(path)
    }

    /// Write one day's option-chain snapshot, atomically.
    pub fn write_chain_snapshot(
        &self,
        snapshot_date: NaiveDate,
        underlying: &InstrumentKey,
        expiry: NaiveDate,
        rows: &[OptionQuote],
    ) -> Result<PathBuf, Error> {
        let path = self.snapshot_file(snapshot_date, underlying, expiry);
        let mut df = frame::chain_to_frame(rows)?;
        write_frame_atomic(&mut df, &path)?;
        debug!(
            underlying = %underlying,
            %snapshot_date,
            rows = rows.len(),
            "wrote option-chain snapshot"
        );
        Ok(path)
    }

    /// Read one day's option-chain snapshot rows.
    pub fn read_chain_snapshot(
        &self,
        snapshot_date: NaiveDate,
        underlying: &InstrumentKey,
        expiry: NaiveDate,
    ) -> Result<Vec<OptionQuote>, Error> {
        let path = self.snapshot_file(snapshot_date, underlying, expiry);
        if !path.is_file() {
            return Err(Error::NotFound(format!(
                "no option-chain snapshot for {underlying} expiry {expiry} on {snapshot_date}"
            )));
        }
        let df = read_frame(&path)?;
        frame::frame_to_chain_rows(&df)
    }

    /// Read an underlying's full IV history, sorted ascending by date.
    pub fn read_iv_history(&self, underlying: &InstrumentKey) -> Result<Vec<IvObservation>, Error> {
        let path = self.iv_history_file(underlying);
        if !path.is_file() {
            return Err(Error::NotFound(format!("no IV history for {underlying}")));
        }
        let df = read_frame(&path)?;
        let mut history = frame::frame_to_iv_history(&df)?;
        history.sort_by_key(|obs| obs.date);
        Ok(history)
    }

    /// Append one daily observation to an underlying's IV history.
    ///
    /// An existing observation for the same date is replaced, keeping the
    /// (date, underlying) key unique. The whole file is rewritten atomically.
    pub fn append_iv_observation(
        &self,
        underlying: &InstrumentKey,
        observation: IvObservation,
    ) -> Result<(), Error> {
        let path = self.iv_history_file(underlying);
        let mut history = if path.is_file() {
            let df = read_frame(&path)?;
            frame::frame_to_iv_history(&df)?
        } else {
            Vec::new()
        };
        history.retain(|obs| obs.date != observation.date);
        history.push(observation);
        history.sort_by_key(|obs| obs.date);

        let mut df = frame::iv_history_to_frame(&history)?;
        write_frame_atomic(&mut df, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn iv_append_replaces_same_date() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::new(dir.path());
        let nifty = InstrumentKey::index("Nifty 50");
        let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();

        let obs = |iv: f64| IvObservation {
            date: day,
            underlying: nifty.to_string(),
            atm_iv: iv,
            spot_price: 23500.0,
        };
        store.append_iv_observation(&nifty, obs(12.0)).unwrap();
        store.append_iv_observation(&nifty, obs(13.5)).unwrap();

        let history = store.read_iv_history(&nifty).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].atm_iv, 13.5);
    }

    #[test]
    fn missing_snapshot_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::new(dir.path());
        let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let err = store
            .read_chain_snapshot(day, &InstrumentKey::index("Nifty 50"), day)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
