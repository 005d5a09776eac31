//! Conversions between typed rows and Polars DataFrames.
//!
//! Timestamps travel as `Int64` epoch nanoseconds and dates as ISO strings,
//! so every column survives a write-then-read round trip value-exact.

use chrono::{DateTime, NaiveDate, Utc};
use polars::prelude::*;

use crate::errors::Error;
use crate::models::candle::Candle;
use crate::models::iv::IvObservation;
use crate::models::option_chain::{OptionQuote, OptionType};

const DATE_FMT: &str = "%Y-%m-%d";

fn nanos(ts: DateTime<Utc>) -> Result<i64, Error> {
    ts.timestamp_nanos_opt().ok_or_else(|| {
        Error::SchemaMismatch(format!("timestamp {ts} outside the representable i64 nanosecond range"))
    })
}

fn col<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, Error> {
    df.column(name)
        .map_err(|_| Error::SchemaMismatch(format!("missing column `{name}`")))
}

fn f64_col<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Float64Chunked, Error> {
    col(df, name)?
        .f64()
        .map_err(|_| Error::SchemaMismatch(format!("column `{name}` is not Float64")))
}

fn i64_col<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Int64Chunked, Error> {
    col(df, name)?
        .i64()
        .map_err(|_| Error::SchemaMismatch(format!("column `{name}` is not Int64")))
}

fn str_col<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked, Error> {
    col(df, name)?
        .str()
        .map_err(|_| Error::SchemaMismatch(format!("column `{name}` is not String")))
}

fn cell<T>(value: Option<T>, name: &str, row: usize) -> Result<T, Error> {
    value.ok_or_else(|| Error::SchemaMismatch(format!("null value in column `{name}` at row {row}")))
}

fn parse_date(s: &str, name: &str, row: usize) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|_| {
        Error::SchemaMismatch(format!("bad date `{s}` in column `{name}` at row {row}"))
    })
}

/// Build an OHLCV DataFrame from candles.
pub fn candles_to_frame(candles: &[Candle]) -> Result<DataFrame, Error> {
    let n = candles.len();
    let mut ts = Vec::with_capacity(n);
    let mut open = Vec::with_capacity(n);
    let mut high = Vec::with_capacity(n);
    let mut low = Vec::with_capacity(n);
    let mut close = Vec::with_capacity(n);
    let mut volume = Vec::with_capacity(n);
    let mut open_interest = Vec::with_capacity(n);

    for c in candles {
        ts.push(nanos(c.timestamp)?);
        open.push(c.open);
        high.push(c.high);
        low.push(c.low);
        close.push(c.close);
        volume.push(c.volume);
        open_interest.push(c.open_interest);
    }

    let df = df!(
        "timestamp" => ts,
        "open" => open,
        "high" => high,
        "low" => low,
        "close" => close,
        "volume" => volume,
        "open_interest" => open_interest,
    )?;
    Ok(df)
}

/// Read candles back out of an OHLCV DataFrame.
///
/// Fails with `SchemaMismatch` on missing columns, wrong dtypes, or nulls.
/// The optional `volume`/`open_interest` columns default to zero when absent.
pub fn frame_to_candles(df: &DataFrame) -> Result<Vec<Candle>, Error> {
    let ts = i64_col(df, "timestamp")?;
    let open = f64_col(df, "open")?;
    let high = f64_col(df, "high")?;
    let low = f64_col(df, "low")?;
    let close = f64_col(df, "close")?;
    let volume = df.column("volume").ok().map(|_| i64_col(df, "volume")).transpose()?;
    let open_interest = df
        .column("open_interest")
        .ok()
        .map(|_| i64_col(df, "open_interest"))
        .transpose()?;

    let mut candles = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        candles.push(Candle {
            timestamp: DateTime::from_timestamp_nanos(cell(ts.get(i), "timestamp", i)?),
            open: cell(open.get(i), "open", i)?,
            high: cell(high.get(i), "high", i)?,
            low: cell(low.get(i), "low", i)?,
            close: cell(close.get(i), "close", i)?,
            volume: volume.map(|c| c.get(i).unwrap_or(0)).unwrap_or(0),
            open_interest: open_interest.map(|c| c.get(i).unwrap_or(0)).unwrap_or(0),
        });
    }
    Ok(candles)
}

/// Build an option-chain snapshot DataFrame.
pub fn chain_to_frame(rows: &[OptionQuote]) -> Result<DataFrame, Error> {
    let n = rows.len();
    let mut ts = Vec::with_capacity(n);
    let mut underlying = Vec::with_capacity(n);
    let mut spot = Vec::with_capacity(n);
    let mut expiry = Vec::with_capacity(n);
    let mut strike = Vec::with_capacity(n);
    let mut opt_type = Vec::with_capacity(n);
    let mut ltp = Vec::with_capacity(n);
    let mut bid_price = Vec::with_capacity(n);
    let mut bid_qty = Vec::with_capacity(n);
    let mut ask_price = Vec::with_capacity(n);
    let mut ask_qty = Vec::with_capacity(n);
    let mut oi = Vec::with_capacity(n);
    let mut oi_change = Vec::with_capacity(n);
    let mut volume = Vec::with_capacity(n);
    let mut iv = Vec::with_capacity(n);
    let mut delta = Vec::with_capacity(n);
    let mut gamma = Vec::with_capacity(n);
    let mut theta = Vec::with_capacity(n);
    let mut vega = Vec::with_capacity(n);

    for q in rows {
        ts.push(nanos(q.timestamp)?);
        underlying.push(q.underlying_symbol.clone());
        spot.push(q.underlying_spot);
        expiry.push(q.expiry.format(DATE_FMT).to_string());
        strike.push(q.strike);
        opt_type.push(q.option_type.as_str().to_string());
        ltp.push(q.ltp);
        bid_price.push(q.bid_price);
        bid_qty.push(q.bid_qty);
        ask_price.push(q.ask_price);
        ask_qty.push(q.ask_qty);
        oi.push(q.oi);
        oi_change.push(q.oi_change);
        volume.push(q.volume);
        iv.push(q.iv);
        delta.push(q.delta);
        gamma.push(q.gamma);
        theta.push(q.theta);
        vega.push(q.vega);
    }

    let df = df!(
        "timestamp" => ts,
        "underlying_symbol" => underlying,
        "underlying_spot" => spot,
        "expiry_date" => expiry,
        "strike_price" => strike,
        "option_type" => opt_type,
        "ltp" => ltp,
        "bid_price" => bid_price,
        "bid_qty" => bid_qty,
        "ask_price" => ask_price,
        "ask_qty" => ask_qty,
        "oi" => oi,
        "oi_change" => oi_change,
        "volume" => volume,
        "iv" => iv,
        "delta" => delta,
        "gamma" => gamma,
        "theta" => theta,
        "vega" => vega,
    )?;
    Ok(df)
}

/// Read option-chain rows back out of a snapshot DataFrame.
pub fn frame_to_chain_rows(df: &DataFrame) -> Result<Vec<OptionQuote>, Error> {
    let ts = i64_col(df, "timestamp")?;
    let underlying = str_col(df, "underlying_symbol")?;
    let spot = f64_col(df, "underlying_spot")?;
    let expiry = str_col(df, "expiry_date")?;
    let strike = f64_col(df, "strike_price")?;
    let opt_type = str_col(df, "option_type")?;
    let ltp = f64_col(df, "ltp")?;
    let bid_price = f64_col(df, "bid_price")?;
    let bid_qty = i64_col(df, "bid_qty")?;
    let ask_price = f64_col(df, "ask_price")?;
    let ask_qty = i64_col(df, "ask_qty")?;
    let oi = i64_col(df, "oi")?;
    let oi_change = i64_col(df, "oi_change")?;
    let volume = i64_col(df, "volume")?;
    let iv = f64_col(df, "iv")?;
    let delta = f64_col(df, "delta")?;
    let gamma = f64_col(df, "gamma")?;
    let theta = f64_col(df, "theta")?;
    let vega = f64_col(df, "vega")?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let type_str = cell(opt_type.get(i), "option_type", i)?;
        let option_type: OptionType = type_str.parse().map_err(|_| {
            Error::SchemaMismatch(format!("bad option_type `{type_str}` at row {i}"))
        })?;
        rows.push(OptionQuote {
            timestamp: DateTime::from_timestamp_nanos(cell(ts.get(i), "timestamp", i)?),
            underlying_symbol: cell(underlying.get(i), "underlying_symbol", i)?.to_string(),
            underlying_spot: cell(spot.get(i), "underlying_spot", i)?,
            expiry: parse_date(cell(expiry.get(i), "expiry_date", i)?, "expiry_date", i)?,
            strike: cell(strike.get(i), "strike_price", i)?,
            option_type,
            ltp: cell(ltp.get(i), "ltp", i)?,
            bid_price: bid_price.get(i).unwrap_or(0.0),
            bid_qty: bid_qty.get(i).unwrap_or(0),
            ask_price: ask_price.get(i).unwrap_or(0.0),
            ask_qty: ask_qty.get(i).unwrap_or(0),
            oi: oi.get(i).unwrap_or(0),
            oi_change: oi_change.get(i).unwrap_or(0),
            volume: volume.get(i).unwrap_or(0),
            iv: iv.get(i).unwrap_or(0.0),
            delta: delta.get(i).unwrap_or(0.0),
            gamma: gamma.get(i).unwrap_or(0.0),
            theta: theta.get(i).unwrap_or(0.0),
            vega: vega.get(i).unwrap_or(0.0),
        });
    }
    Ok(rows)
}

/// Build an IV-history DataFrame.
pub fn iv_history_to_frame(observations: &[IvObservation]) -> Result<DataFrame, Error> {
    let n = observations.len();
    let mut date = Vec::with_capacity(n);
    let mut underlying = Vec::with_capacity(n);
    let mut atm_iv = Vec::with_capacity(n);
    let mut spot = Vec::with_capacity(n);

    for obs in observations {
        date.push(obs.date.format(DATE_FMT).to_string());
        underlying.push(obs.underlying.clone());
        atm_iv.push(obs.atm_iv);
        spot.push(obs.spot_price);
    }

    let df = df!(
        "date" => date,
        "underlying" => underlying,
        "atm_iv" => atm_iv,
        "spot_price" => spot,
    )?;
    Ok(df)
}

/// Read IV observations back out of an IV-history DataFrame.
pub fn frame_to_iv_history(df: &DataFrame) -> Result<Vec<IvObservation>, Error> {
    let date = str_col(df, "date")?;
    let underlying = str_col(df, "underlying")?;
    let atm_iv = f64_col(df, "atm_iv")?;
    let spot = f64_col(df, "spot_price")?;

    let mut observations = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        observations.push(IvObservation {
            date: parse_date(cell(date.get(i), "date", i)?, "date", i)?,
            underlying: cell(underlying.get(i), "underlying", i)?.to_string(),
            atm_iv: cell(atm_iv.get(i), "atm_iv", i)?,
            spot_price: spot.get(i).unwrap_or(0.0),
        });
    }
    Ok(observations)
}
