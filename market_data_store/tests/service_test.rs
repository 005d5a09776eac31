//! Service-level tests against a seeded temp-dir store.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tempfile::tempdir;

use market_data_store::config::ServiceConfig;
use market_data_store::errors::Error;
use market_data_store::models::candle::Candle;
use market_data_store::models::instrument::InstrumentKey;
use market_data_store::models::interval::Interval;
use market_data_store::models::iv::IvObservation;
use market_data_store::models::option_chain::{OptionQuote, OptionType};
use market_data_store::service::HistoricalDataService;

fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn candle(timestamp: DateTime<Utc>, close: f64) -> Candle {
    Candle {
        timestamp,
        open: close - 10.0,
        high: close + 15.0,
        low: close - 20.0,
        close,
        volume: 100_000,
        open_interest: 0,
    }
}

fn service_with_store(root: &std::path::Path) -> HistoricalDataService {
    HistoricalDataService::new(ServiceConfig::new(root))
}

#[test]
fn history_is_sorted_and_deduplicated() {
    let dir = tempdir().unwrap();
    let service = service_with_store(dir.path());
    let instrument = InstrumentKey::index("Nifty 50");

    // Session opens 09:15 IST = 03:45 UTC. Write out of order, with one
    // duplicate timestamp across writes.
    let mon = ts(2025, 1, 6, 3, 45);
    let tue = ts(2025, 1, 7, 3, 45);
    let wed = ts(2025, 1, 8, 3, 45);
    service
        .store()
        .write_candles(
            &instrument,
            Interval::Day,
            date(2025, 1, 6),
            date(2025, 1, 7),
            &[candle(tue, 23600.0), candle(mon, 23500.0)],
        )
        .expect("write a");
    service
        .store()
        .write_candles(
            &instrument,
            Interval::Day,
            date(2025, 1, 7),
            date(2025, 1, 8),
            &[candle(tue, 23600.0), candle(wed, 23700.0)],
        )
        .expect("write b");

    let series = service
        .get_historical_data(&instrument, date(2025, 1, 6), date(2025, 1, 8), Interval::Day)
        .expect("history");

    let stamps: Vec<_> = series.candles.iter().map(|c| c.timestamp).collect();
    assert_eq!(stamps, vec![mon, tue, wed]);
}

#[test]
fn history_filters_by_ist_date_range() {
    let dir = tempdir().unwrap();
    let service = service_with_store(dir.path());
    let instrument = InstrumentKey::index("Nifty 50");

    service
        .store()
        .write_candles(
            &instrument,
            Interval::Day,
            date(2025, 1, 6),
            date(2025, 1, 10),
            &[
                candle(ts(2025, 1, 6, 3, 45), 23500.0),
                candle(ts(2025, 1, 7, 3, 45), 23600.0),
                candle(ts(2025, 1, 8, 3, 45), 23700.0),
            ],
        )
        .expect("write");

    let series = service
        .get_historical_data(&instrument, date(2025, 1, 7), date(2025, 1, 7), Interval::Day)
        .expect("history");
    assert_eq!(series.candles.len(), 1);
    assert_eq!(series.candles[0].close, 23600.0);
}

#[test]
fn missing_instrument_is_not_found() {
    let dir = tempdir().unwrap();
    let service = service_with_store(dir.path());
    let err = service
        .get_historical_data(
            &InstrumentKey::equity("RELIANCE"),
            date(2025, 1, 6),
            date(2025, 1, 10),
            Interval::Day,
        )
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn latest_candle_picks_newest() {
    let dir = tempdir().unwrap();
    let service = service_with_store(dir.path());
    let instrument = InstrumentKey::index("Nifty 50");

    service
        .store()
        .write_candles(
            &instrument,
            Interval::Day,
            date(2025, 1, 6),
            date(2025, 1, 8),
            &[
                candle(ts(2025, 1, 8, 3, 45), 23700.0),
                candle(ts(2025, 1, 6, 3, 45), 23500.0),
            ],
        )
        .expect("write");

    let latest = service
        .latest_candle(&instrument, Interval::Day)
        .expect("latest");
    assert_eq!(latest.timestamp, ts(2025, 1, 8, 3, 45));
}

#[test]
fn chain_snapshot_retrieval() {
    let dir = tempdir().unwrap();
    let service = service_with_store(dir.path());
    let underlying = InstrumentKey::index("Nifty 50");
    let expiry = date(2025, 1, 9);

    let quote = OptionQuote {
        timestamp: ts(2025, 1, 6, 10, 0),
        underlying_symbol: underlying.to_string(),
        underlying_spot: 23520.5,
        expiry,
        strike: 23500.0,
        option_type: OptionType::Call,
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
    };
    service
        .store()
        .write_chain_snapshot(date(2025, 1, 6), &underlying, expiry, &[quote.clone()])
        .expect("write");

    let rows = service
        .get_option_chain_snapshot(&underlying, expiry, date(2025, 1, 6))
        .expect("read");
    assert_eq!(rows, vec![quote]);

    // Different snapshot date misses.
    let err = service
        .get_option_chain_snapshot(&underlying, expiry, date(2025, 1, 7))
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn iv_metrics_from_seeded_history() {
    let dir = tempdir().unwrap();
    let service = service_with_store(dir.path());
    let underlying = InstrumentKey::index("Nifty 50");

    // 21 trading days of IV climbing from 10.0 to 20.0.
    let mut day = date(2025, 1, 1);
    for i in 0..21 {
        let obs = IvObservation {
            date: day,
            underlying: underlying.to_string(),
            atm_iv: 10.0 + 0.5 * i as f64,
            spot_price: 23500.0,
        };
        service
            .store()
            .append_iv_observation(&underlying, obs)
            .expect("append");
        day = day.succ_opt().unwrap();
    }

    let metrics = service.get_iv_metrics(&underlying).expect("metrics");
    assert!((metrics.current_iv - 20.0).abs() < 1e-9);
    // Current IV is the window maximum.
    assert!((metrics.iv_rank - 100.0).abs() < 1e-9);
    assert_eq!(metrics.observations, 21);
}

#[test]
fn iv_metrics_insufficient_history() {
    let dir = tempdir().unwrap();
    let service = service_with_store(dir.path());
    let underlying = InstrumentKey::index("Nifty 50");

    service
        .store()
        .append_iv_observation(
            &underlying,
            IvObservation {
                date: date(2025, 1, 6),
                underlying: underlying.to_string(),
                atm_iv: 14.2,
                spot_price: 23500.0,
            },
        )
        .expect("append");

    let err = service.get_iv_metrics(&underlying).unwrap_err();
    assert!(matches!(
        err,
        Error::InsufficientData { have: 1, need: 20 }
    ));
}

#[test]
fn gap_detection_over_stored_daily_data() {
    let dir = tempdir().unwrap();
    let service = service_with_store(dir.path());
    let instrument = InstrumentKey::index("Nifty 50");

    // Mon, Tue, Thu. Wednesday is a missing trading day.
    service
        .store()
        .write_candles(
            &instrument,
            Interval::Day,
            date(2025, 1, 6),
            date(2025, 1, 9),
            &[
                candle(ts(2025, 1, 6, 3, 45), 23500.0),
                candle(ts(2025, 1, 7, 3, 45), 23600.0),
                candle(ts(2025, 1, 9, 3, 45), 23700.0),
            ],
        )
        .expect("write");

    let gaps = service
        .detect_gaps(&instrument, date(2025, 1, 6), date(2025, 1, 9), Interval::Day)
        .expect("gaps");
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].from, ts(2025, 1, 7, 3, 45));
    assert_eq!(gaps[0].to, ts(2025, 1, 9, 3, 45));
}
