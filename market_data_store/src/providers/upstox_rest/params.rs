use chrono::NaiveDate;

use crate::models::interval::Interval;
use crate::providers::{CandleRequest, ProviderError};

/// Path segment the Upstox historical-candle endpoint uses for an interval.
pub fn interval_segment(interval: Interval) -> &'static str {
    // Matches Interval::as_str today, but the API contract is the provider's,
    // not the store layout's.
    interval.as_str()
}

/// Format a date the way the Upstox path expects.
pub fn date_segment(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Reject ranges the API cannot serve before spending a request on them.
pub fn validate_request(params: &CandleRequest) -> Result<(), ProviderError> {
    if params.start > params.end {
        return Err(ProviderError::Validation(format!(
            "start date {} is after end date {}",
            params.start, params.end
        )));
    }
    Ok(())
}
