//! Gap detection over candle series.
//!
//! Walks the sorted timestamp sequence and reports every consecutive pair
//! that arrives later than expected. The policy decides how market-closed
//! periods are treated:
//!
//! - [`GapPolicy::SkipNonTrading`] (default): the expected successor of the
//!   last candle of a session is the next trading day's session open, so
//!   overnight and weekend jumps are not gaps.
//! - [`GapPolicy::Strict`]: any delta larger than the expected interval is a
//!   gap, sessions and calendars ignored.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::candle::Candle;
use crate::session::{SESSION_CLOSE, TradingCalendar, ist_date, ist_to_utc};

/// A missing expected interval in a series: no candles between `from`
/// (exclusive) and `to` (exclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gap {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// How market-closed periods are treated during gap detection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Expect the next candle at the next trading day's session open when the
    /// interval crosses the session close.
    #[default]
    SkipNonTrading,
    /// Report every oversized delta, ignoring sessions and weekends.
    Strict,
}

/// Detect gaps in a sorted candle series.
///
/// `expected_interval_minutes` is the nominal candle spacing. Input must be
/// sorted ascending; equal or out-of-order neighbours are skipped rather than
/// reported.
pub fn detect_gaps(
    candles: &[Candle],
    expected_interval_minutes: u32,
    policy: GapPolicy,
    calendar: &TradingCalendar,
) -> Vec<Gap> {
    let step = Duration::minutes(i64::from(expected_interval_minutes));
    let mut gaps = Vec::new();

    for pair in candles.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.timestamp <= prev.timestamp {
            continue;
        }
        let expected = match policy {
            GapPolicy::Strict => prev.timestamp + step,
            GapPolicy::SkipNonTrading => expected_successor(prev.timestamp, step, calendar),
        };
        if next.timestamp > expected {
            gaps.push(Gap {
                from: prev.timestamp,
                to: next.timestamp,
            });
        }
    }
    gaps
}

/// The instant at which the candle after `ts` is expected, given the session
/// clock and trading calendar.
fn expected_successor(
    ts: DateTime<Utc>,
    step: Duration,
    calendar: &TradingCalendar,
) -> DateTime<Utc> {
    if step >= Duration::days(1) {
        // Daily and coarser candles: advance whole trading days, keeping the
        // wall-clock time of the previous candle.
        let days = (step.num_days()).max(1);
        let mut date = ist_date(ts);
        for _ in 0..days {
            date = calendar.next_trading_day(date);
        }
        let time = ts.with_timezone(&chrono_tz::Asia::Kolkata).time();
        return ist_to_utc(date, time);
    }

    let naive_next = ts + step;
    let close = ist_to_utc(ist_date(ts), SESSION_CLOSE);
    if naive_next >= close {
        calendar.next_session_open(ts)
    } else {
        naive_next
    }
}
