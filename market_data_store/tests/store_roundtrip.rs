//! End-to-end persistence tests: write through the store, read back, and
//! compare field by field.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tempfile::tempdir;

use market_data_store::models::candle::Candle;
use market_data_store::models::instrument::InstrumentKey;
use market_data_store::models::interval::Interval;
use market_data_store::models::iv::IvObservation;
use market_data_store::models::option_chain::{OptionQuote, OptionType};
use market_data_store::store::DataStore;

fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_candles() -> Vec<Candle> {
    vec![
        Candle {
            timestamp: ts(2025, 1, 6, 3, 45, 0),
            open: 23508.4,
            high: 23550.15,
            low: 23490.0,
            close: 23532.7,
            volume: 184_223,
            open_interest: 0,
        },
        Candle {
            timestamp: ts(2025, 1, 6, 4, 0, 0),
            open: 23532.7,
            high: 23541.05,
            low: 23500.3,
            close: 23511.9,
            volume: 97_410,
            open_interest: 0,
        },
    ]
}

fn sample_quote(strike: f64, option_type: OptionType) -> OptionQuote {
    OptionQuote {
        timestamp: ts(2025, 1, 6, 10, 0, 0),
        underlying_symbol: "NSE_INDEX|Nifty 50".into(),
        underlying_spot: 23520.5,
        expiry: date(2025, 1, 9),
        strike,
        option_type,
        ltp: 132.55,
        bid_price: 132.0,
        bid_qty: 225,
        ask_price: 133.1,
        ask_qty: 150,
        oi: 1_250_000,
        oi_change: 43_500,
        volume: 885_000,
        iv: 14.72,
        delta: 0.52,
        gamma: 0.0011,
        theta: -8.4,
        vega: 11.2,
    }
}

#[test]
fn candles_survive_write_and_read_exactly() {
    let dir = tempdir().unwrap();
    let store = DataStore::new(dir.path());
    let instrument = InstrumentKey::index("Nifty 50");
    let candles = sample_candles();

    store
        .write_candles(
            &instrument,
            Interval::Minute15,
            date(2025, 1, 6),
            date(2025, 1, 10),
            &candles,
        )
        .expect("write");

    let df = store
        .read_candle_partition(&instrument, Interval::Minute15)
        .expect("read");
    let read_back = market_data_store::frame::frame_to_candles(&df).expect("decode");

    assert_eq!(read_back, candles);
}

#[test]
fn atomic_write_leaves_no_temp_files() {
    let dir = tempdir().unwrap();
    let store = DataStore::new(dir.path());
    let instrument = InstrumentKey::index("Nifty 50");

    store
        .write_candles(
            &instrument,
            Interval::Day,
            date(2025, 1, 1),
            date(2025, 1, 31),
            &sample_candles(),
        )
        .expect("write");

    let partition = store.partition_dir(&instrument, Interval::Day);
    let names: Vec<String> = std::fs::read_dir(&partition)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["2025-01-01_2025-01-31.feather".to_string()]);
}

#[test]
fn multiple_partition_files_concatenate_on_read() {
    let dir = tempdir().unwrap();
    let store = DataStore::new(dir.path());
    let instrument = InstrumentKey::equity("RELIANCE");

    let week1 = vec![Candle {
        timestamp: ts(2025, 1, 6, 5, 0, 0),
        open: 1240.0,
        high: 1251.3,
        low: 1236.0,
        close: 1248.9,
        volume: 5_120_000,
        open_interest: 0,
    }];
    let week2 = vec![Candle {
        timestamp: ts(2025, 1, 13, 5, 0, 0),
        open: 1248.9,
        high: 1262.0,
        low: 1244.1,
        close: 1259.4,
        volume: 4_730_000,
        open_interest: 0,
    }];

    store
        .write_candles(
            &instrument,
            Interval::Day,
            date(2025, 1, 6),
            date(2025, 1, 10),
            &week1,
        )
        .expect("write week1");
    store
        .write_candles(
            &instrument,
            Interval::Day,
            date(2025, 1, 13),
            date(2025, 1, 17),
            &week2,
        )
        .expect("write week2");

    let df = store
        .read_candle_partition(&instrument, Interval::Day)
        .expect("read");
    assert_eq!(df.height(), 2);
}

#[test]
fn chain_snapshot_round_trips() {
    let dir = tempdir().unwrap();
    let store = DataStore::new(dir.path());
    let underlying = InstrumentKey::index("Nifty 50");
    let rows = vec![
        sample_quote(23500.0, OptionType::Call),
        sample_quote(23500.0, OptionType::Put),
        sample_quote(23600.0, OptionType::Call),
    ];

    store
        .write_chain_snapshot(date(2025, 1, 6), &underlying, date(2025, 1, 9), &rows)
        .expect("write");

    let read_back = store
        .read_chain_snapshot(date(2025, 1, 6), &underlying, date(2025, 1, 9))
        .expect("read");
    assert_eq!(read_back, rows);
}

#[test]
fn iv_history_appends_and_replaces_same_date() {
    let dir = tempdir().unwrap();
    let store = DataStore::new(dir.path());
    let underlying = InstrumentKey::index("Nifty 50");

    let obs = |d: NaiveDate, iv: f64| IvObservation {
        date: d,
        underlying: underlying.to_string(),
        atm_iv: iv,
        spot_price: 23500.0,
    };

    store
        .append_iv_observation(&underlying, obs(date(2025, 1, 6), 14.2))
        .expect("first append");
    store
        .append_iv_observation(&underlying, obs(date(2025, 1, 7), 14.9))
        .expect("second append");
    // Same-date append replaces the earlier row.
    store
        .append_iv_observation(&underlying, obs(date(2025, 1, 7), 15.1))
        .expect("replace");

    let history = store.read_iv_history(&underlying).expect("read");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].date, date(2025, 1, 6));
    assert_eq!(history[1].date, date(2025, 1, 7));
    assert!((history[1].atm_iv - 15.1).abs() < 1e-9);
}

#[test]
fn missing_partition_is_not_found() {
    let dir = tempdir().unwrap();
    let store = DataStore::new(dir.path());
    let err = store
        .read_candle_partition(&InstrumentKey::index("Nifty 50"), Interval::Day)
        .unwrap_err();
    assert!(matches!(err, market_data_store::errors::Error::NotFound(_)));
}
