//! Path construction for the partitioned store layout.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::models::instrument::InstrumentKey;
use crate::models::interval::Interval;

pub const FEATHER_EXT: &str = "feather";
const DATE_FMT: &str = "%Y-%m-%d";

/// `<root>/<indices|equities>/<SYMBOL>/<interval>`
pub fn partition_dir(root: &Path, instrument: &InstrumentKey, interval: Interval) -> PathBuf {
    root.join(instrument.segment.dir_name())
        .join(instrument.path_symbol())
        .join(interval.as_str())
}

/// `<partition_dir>/<start>_<end>.feather`
pub fn partition_file(
    root: &Path,
    instrument: &InstrumentKey,
    interval: Interval,
    start: NaiveDate,
    end: NaiveDate,
) -> PathBuf {
    partition_dir(root, instrument, interval).join(format!(
        "{}_{}.{FEATHER_EXT}",
        start.format(DATE_FMT),
        end.format(DATE_FMT)
    ))
}

/// `<root>/options/snapshots/<YYYY-MM-DD>/<UNDERLYING>_<EXPIRY>.feather`
pub fn snapshot_file(
    root: &Path,
    snapshot_date: NaiveDate,
    underlying: &InstrumentKey,
    expiry: NaiveDate,
) -> PathBuf {
    root.join("options")
        .join("snapshots")
        .join(snapshot_date.format(DATE_FMT).to_string())
        .join(format!(
            "{}_{}.{FEATHER_EXT}",
            underlying.path_symbol(),
            expiry.format(DATE_FMT)
        ))
}

/// `<root>/options/iv_history/<UNDERLYING>.feather`
pub fn iv_history_file(root: &Path, underlying: &InstrumentKey) -> PathBuf {
    root.join("options")
        .join("iv_history")
        .join(format!("{}.{FEATHER_EXT}", underlying.path_symbol()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn candle_partition_paths() {
        let root = Path::new("/data");
        let nifty = InstrumentKey::index("Nifty 50");
        assert_eq!(
            partition_dir(root, &nifty, Interval::Minute15),
            Path::new("/data/indices/Nifty_50/15minute")
        );
        assert_eq!(
            partition_file(
                root,
                &InstrumentKey::equity("RELIANCE"),
                Interval::Day,
                date(2024, 1, 1),
                date(2024, 12, 31)
            ),
            Path::new("/data/equities/RELIANCE/day/2024-01-01_2024-12-31.feather")
        );
    }

    #[test]
    fn option_paths() {
        let root = Path::new("/data");
        let nifty = InstrumentKey::index("Nifty 50");
        assert_eq!(
            snapshot_file(root, date(2025, 1, 6), &nifty, date(2025, 1, 9)),
            Path::new("/data/options/snapshots/2025-01-06/Nifty_50_2025-01-09.feather")
        );
        assert_eq!(
            iv_history_file(root, &nifty),
            Path::new("/data/options/iv_history/Nifty_50.feather")
        );
    }
}
