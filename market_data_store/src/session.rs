//! IST trading-session clock and trading calendar.
//!
//! Storage and all arithmetic use UTC; IST (`Asia/Kolkata`) is applied only
//! when bucketing instants into calendar dates and session boundaries. NSE
//! cash/F&O session: 09:15-15:30 IST, Monday through Friday. Exchange
//! holidays are not embedded; callers that need them supply an explicit list
//! via [`TradingCalendar::with_holidays`].

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Asia::Kolkata;

/// Session open, IST wall clock.
pub const SESSION_OPEN: NaiveTime = match NaiveTime::from_hms_opt(9, 15, 0) {
    Some(t) => t,
    None => unreachable!(),
};

/// Session close, IST wall clock. Candle timestamps are interval starts, so
/// the last 15-minute candle of a day is stamped 15:15.
pub const SESSION_CLOSE: NaiveTime = match NaiveTime::from_hms_opt(15, 30, 0) {
    Some(t) => t,
    None => unreachable!(),
};

/// Convert a UTC instant to its IST calendar date.
pub fn ist_date(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Kolkata).date_naive()
}

/// Convert an IST wall-clock date+time to a UTC instant.
///
/// IST is a fixed +05:30 offset with no DST, so the mapping is always
/// unambiguous; the fallback branch only guards the type-level `LocalResult`.
pub fn ist_to_utc(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let naive = date.and_time(time);
    Kolkata
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// Trading-day calendar: weekends always excluded, holidays by explicit list.
#[derive(Debug, Clone, Default)]
pub struct TradingCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl TradingCalendar {
    /// Weekend-only calendar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calendar with an explicit set of exchange holidays.
    pub fn with_holidays(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// True if the exchange is open on `date`.
    pub fn is_trading_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }

    /// The first trading day strictly after `date`.
    pub fn next_trading_day(&self, date: NaiveDate) -> NaiveDate {
        let mut d = date.succ_opt().unwrap_or(date);
        while !self.is_trading_day(d) {
            d = match d.succ_opt() {
                Some(next) => next,
                None => return d,
            };
        }
        d
    }

    /// Session open instant (UTC) on the first trading day strictly after the
    /// IST date of `ts`.
    pub fn next_session_open(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let next_day = self.next_trading_day(ist_date(ts));
        ist_to_utc(next_day, SESSION_OPEN)
    }

    /// Session close instant (UTC) on the IST date of `ts`.
    pub fn session_close(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        ist_to_utc(ist_date(ts), SESSION_CLOSE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ist_round_trip() {
        // 2025-01-06 09:15 IST == 03:45 UTC.
        let d = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let utc = ist_to_utc(d, SESSION_OPEN);
        assert_eq!(utc, Utc.with_ymd_and_hms(2025, 1, 6, 3, 45, 0).unwrap());
        assert_eq!(ist_date(utc), d);
    }

    #[test]
    fn late_utc_evening_is_next_ist_date() {
        // 2025-01-06 20:00 UTC is already 2025-01-07 in IST.
        let utc = Utc.with_ymd_and_hms(2025, 1, 6, 20, 0, 0).unwrap();
        assert_eq!(ist_date(utc), NaiveDate::from_ymd_opt(2025, 1, 7).unwrap());
    }

    #[test]
    fn weekend_skipped() {
        let cal = TradingCalendar::new();
        let friday = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        assert_eq!(cal.next_trading_day(friday), monday);
        assert!(!cal.is_trading_day(NaiveDate::from_ymd_opt(2025, 1, 4).unwrap()));
    }

    #[test]
    fn holiday_skipped() {
        // Republic Day 2026 falls on a Monday.
        let holiday = NaiveDate::from_ymd_opt(2026, 1, 26).unwrap();
        let cal = TradingCalendar::with_holidays([holiday]);
        let friday = NaiveDate::from_ymd_opt(2026, 1, 23).unwrap();
        assert_eq!(
            cal.next_trading_day(friday),
            NaiveDate::from_ymd_opt(2026, 1, 27).unwrap()
        );
    }

    #[test]
    fn next_session_open_lands_on_0915_ist() {
        let cal = TradingCalendar::new();
        // Friday 15:15 IST candle.
        let friday_close = ist_to_utc(
            NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            NaiveTime::from_hms_opt(15, 15, 0).unwrap(),
        );
        let open = cal.next_session_open(friday_close);
        assert_eq!(
            open,
            ist_to_utc(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(), SESSION_OPEN)
        );
    }
}
