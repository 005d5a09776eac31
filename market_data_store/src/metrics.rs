//! Derived metrics: IV rank/percentile, returns, and realized volatility.

use serde::Serialize;

use crate::errors::Error;
use crate::models::candle::Candle;
use crate::models::iv::{IvMetrics, IvObservation};
use crate::models::option_chain::OptionQuote;

/// Trading days per year, used to annualize volatility.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Compute IV rank and percentile from a date-sorted IV history.
///
/// The window is the trailing `lookback_days` observations including the most
/// recent one, which supplies `current_iv`. Fails with `InsufficientData`
/// when fewer than `min_days` observations exist. A flat window (max == min)
/// yields a neutral rank of 50.
pub fn compute_iv_metrics(
    history: &[IvObservation],
    lookback_days: usize,
    min_days: usize,
) -> Result<IvMetrics, Error> {
    if history.len() < min_days.max(2) {
        return Err(Error::InsufficientData {
            have: history.len(),
            need: min_days.max(2),
        });
    }

    let window_start = history.len().saturating_sub(lookback_days);
    let window = &history[window_start..];
    // Sorted input: the last observation is the current one.
    let current = window[window.len() - 1].atm_iv;

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut below = 0usize;
    for obs in window {
        min = min.min(obs.atm_iv);
        max = max.max(obs.atm_iv);
        if obs.atm_iv < current {
            below += 1;
        }
    }

    let iv_rank = if max > min {
        (current - min) / (max - min) * 100.0
    } else {
        50.0
    };
    let iv_percentile = below as f64 / window.len() as f64 * 100.0;

    Ok(IvMetrics {
        iv_rank,
        iv_percentile,
        current_iv: current,
        observations: window.len(),
    })
}

/// Pick the ATM implied volatility out of one day's chain snapshot: the mean
/// of call and put IV at the strike nearest the spot.
///
/// Returns `None` for an empty chain or one with no usable IVs.
pub fn atm_implied_vol(rows: &[OptionQuote]) -> Option<f64> {
    let spot = rows.first()?.underlying_spot;
    let atm_strike = rows
        .iter()
        .map(|q| q.strike)
        .min_by(|a, b| {
            (a - spot)
                .abs()
                .partial_cmp(&(b - spot).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

    let ivs: Vec<f64> = rows
        .iter()
        .filter(|q| q.strike == atm_strike && q.iv > 0.0)
        .map(|q| q.iv)
        .collect();
    if ivs.is_empty() {
        return None;
    }
    Some(ivs.iter().sum::<f64>() / ivs.len() as f64)
}

/// Percentage returns over standard horizons, from a date-sorted daily series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnMetrics {
    /// Close-over-previous-close, %.
    pub daily_return: f64,
    /// Close over the close five trading days back, %.
    pub weekly_return: f64,
    /// Close over the close 22 trading days back, %.
    pub monthly_return: f64,
    /// Close over the first close of the series, %.
    pub total_return: f64,
    /// Number of candles the metrics were computed from.
    pub period_days: usize,
}

fn pct_change(later: f64, earlier: f64) -> f64 {
    if earlier == 0.0 {
        0.0
    } else {
        (later - earlier) / earlier * 100.0
    }
}

/// Compute return metrics from a sorted daily candle series.
///
/// Fails with `InsufficientData` on fewer than two candles.
pub fn return_metrics(candles: &[Candle]) -> Result<ReturnMetrics, Error> {
    if candles.len() < 2 {
        return Err(Error::InsufficientData {
            have: candles.len(),
            need: 2,
        });
    }
    let n = candles.len();
    let latest = candles[n - 1].close;
    let back = |days: usize| candles[n.saturating_sub(days + 1).min(n - 2)].close;

    Ok(ReturnMetrics {
        daily_return: pct_change(latest, candles[n - 2].close),
        weekly_return: pct_change(latest, back(5)),
        monthly_return: pct_change(latest, back(22)),
        total_return: pct_change(latest, candles[0].close),
        period_days: n,
    })
}

/// Realized volatility of a daily candle series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityMetrics {
    /// Standard deviation of daily returns, %.
    pub daily_volatility: f64,
    /// Daily volatility scaled by sqrt(252), %.
    pub annualized_volatility: f64,
    /// Mean of (high - low) / close, %.
    pub avg_daily_range: f64,
    /// Number of return observations.
    pub period_days: usize,
}

/// Compute realized volatility from a sorted daily candle series.
///
/// Fails with `InsufficientData` on fewer than five candles, matching the
/// minimum needed for a meaningful standard deviation.
pub fn volatility_metrics(candles: &[Candle]) -> Result<VolatilityMetrics, Error> {
    if candles.len() < 5 {
        return Err(Error::InsufficientData {
            have: candles.len(),
            need: 5,
        });
    }

    let returns: Vec<f64> = candles
        .windows(2)
        .filter(|w| w[0].close != 0.0)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect();
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let daily = variance.sqrt();

    let ranges: Vec<f64> = candles
        .iter()
        .filter(|c| c.close != 0.0)
        .map(|c| (c.high - c.low) / c.close * 100.0)
        .collect();
    let avg_range = ranges.iter().sum::<f64>() / ranges.len().max(1) as f64;

    Ok(VolatilityMetrics {
        daily_volatility: daily * 100.0,
        annualized_volatility: daily * TRADING_DAYS_PER_YEAR.sqrt() * 100.0,
        avg_daily_range: avg_range,
        period_days: returns.len(),
    })
}
