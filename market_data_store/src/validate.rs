//! Dataset validation.
//!
//! `validate_data` never returns an error: every problem it finds becomes an
//! entry in the report's `issues`, so batch jobs can keep walking past bad
//! files and still see exactly what was wrong with each one.

use std::collections::HashSet;

use polars::prelude::*;
use serde::Serialize;

use crate::schema::{self, DatasetKind};
use crate::session;

/// Result of validating one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub row_count: usize,
    /// Human-readable problems, in the order they were found.
    pub issues: Vec<String>,
}

impl ValidationReport {
    fn from_issues(row_count: usize, issues: Vec<String>) -> Self {
        Self {
            is_valid: issues.is_empty(),
            row_count,
            issues,
        }
    }
}

/// Validate a DataFrame against the fixed schema of `kind` plus the kind's
/// quality rules.
pub fn validate_data(df: &DataFrame, kind: DatasetKind) -> ValidationReport {
    let mut issues = Vec::new();

    check_schema(df, kind, &mut issues);

    if df.height() == 0 {
        issues.push("dataset has no rows".to_string());
        return ValidationReport::from_issues(0, issues);
    }

    match kind {
        DatasetKind::Ohlcv => check_ohlcv(df, &mut issues),
        DatasetKind::OptionChain => check_option_chain(df, &mut issues),
        DatasetKind::IvHistory => check_iv_history(df, &mut issues),
    }

    ValidationReport::from_issues(df.height(), issues)
}

/// Required columns present with the exact dtype, and free of nulls.
fn check_schema(df: &DataFrame, kind: DatasetKind, issues: &mut Vec<String>) {
    for spec in schema::columns(kind) {
        match df.column(spec.name) {
            Ok(col) => {
                if col.dtype() != &spec.dtype {
                    issues.push(format!(
                        "column `{}` has type {}, expected {}",
                        spec.name,
                        col.dtype(),
                        spec.dtype
                    ));
                } else if spec.required && col.null_count() > 0 {
                    issues.push(format!(
                        "column `{}` has {} null values",
                        spec.name,
                        col.null_count()
                    ));
                }
            }
            Err(_) if spec.required => {
                issues.push(format!("missing required column `{}`", spec.name));
            }
            Err(_) => {}
        }
    }
}

fn f64_values<'a>(df: &'a DataFrame, name: &str) -> Option<&'a Float64Chunked> {
    df.column(name).ok().and_then(|c| c.f64().ok())
}

fn i64_values<'a>(df: &'a DataFrame, name: &str) -> Option<&'a Int64Chunked> {
    df.column(name).ok().and_then(|c| c.i64().ok())
}

fn str_values<'a>(df: &'a DataFrame, name: &str) -> Option<&'a StringChunked> {
    df.column(name).ok().and_then(|c| c.str().ok())
}

fn count_rows(n: usize, what: &str, issues: &mut Vec<String>) {
    if n > 0 {
        issues.push(format!("{n} rows with {what}"));
    }
}

fn check_non_negative(df: &DataFrame, name: &str, issues: &mut Vec<String>) {
    if let Some(values) = i64_values(df, name) {
        let negative = values.into_iter().flatten().filter(|v| *v < 0).count();
        count_rows(negative, &format!("negative {name}"), issues);
    }
}

fn check_ohlcv(df: &DataFrame, issues: &mut Vec<String>) {
    if let (Some(open), Some(high), Some(low), Some(close)) = (
        f64_values(df, "open"),
        f64_values(df, "high"),
        f64_values(df, "low"),
        f64_values(df, "close"),
    ) {
        let mut bad_high = 0usize;
        let mut bad_low = 0usize;
        let mut negative_price = 0usize;
        for i in 0..df.height() {
            let (Some(o), Some(h), Some(l), Some(c)) =
                (open.get(i), high.get(i), low.get(i), close.get(i))
            else {
                continue;
            };
            if h < o || h < c || h < l {
                bad_high += 1;
            }
            if l > o || l > c {
                bad_low += 1;
            }
            if o < 0.0 || h < 0.0 || l < 0.0 || c < 0.0 {
                negative_price += 1;
            }
        }
        count_rows(bad_high, "high below open/low/close", issues);
        count_rows(bad_low, "low above open/close", issues);
        count_rows(negative_price, "negative prices", issues);
    }

    check_non_negative(df, "volume", issues);
    check_non_negative(df, "open_interest", issues);

    if let Some(ts) = i64_values(df, "timestamp") {
        let mut duplicates = 0usize;
        let mut out_of_order = 0usize;
        let mut prev: Option<i64> = None;
        for value in ts.into_iter().flatten() {
            match prev {
                Some(p) if value == p => duplicates += 1,
                Some(p) if value < p => out_of_order += 1,
                _ => {}
            }
            prev = Some(value);
        }
        count_rows(duplicates, "duplicate timestamps", issues);
        count_rows(out_of_order, "out-of-order timestamps", issues);
    }
}

fn check_option_chain(df: &DataFrame, issues: &mut Vec<String>) {
    if let Some(types) = str_values(df, "option_type") {
        let invalid = types
            .into_iter()
            .flatten()
            .filter(|t| *t != "CE" && *t != "PE")
            .count();
        count_rows(invalid, "option_type other than CE/PE", issues);
    }

    if let Some(strikes) = f64_values(df, "strike_price") {
        let invalid = strikes.into_iter().flatten().filter(|s| *s <= 0.0).count();
        count_rows(invalid, "non-positive strike_price", issues);
    }

    if let Some(deltas) = f64_values(df, "delta") {
        let invalid = deltas
            .into_iter()
            .flatten()
            .filter(|d| *d < -1.0 || *d > 1.0)
            .count();
        count_rows(invalid, "delta outside [-1, 1]", issues);
    }

    if let Some(ivs) = f64_values(df, "iv") {
        let invalid = ivs.into_iter().flatten().filter(|v| *v < 0.0).count();
        count_rows(invalid, "negative iv", issues);
    }

    check_non_negative(df, "oi", issues);
    check_non_negative(df, "volume", issues);

    // Primary-key uniqueness over (timestamp, underlying, expiry, strike, type).
    if let (Some(ts), Some(underlying), Some(expiry), Some(strike), Some(opt_type)) = (
        i64_values(df, "timestamp"),
        str_values(df, "underlying_symbol"),
        str_values(df, "expiry_date"),
        f64_values(df, "strike_price"),
        str_values(df, "option_type"),
    ) {
        let mut seen = HashSet::new();
        let mut duplicates = 0usize;
        for i in 0..df.height() {
            let key = (
                ts.get(i),
                underlying.get(i).map(str::to_string),
                expiry.get(i).map(str::to_string),
                strike.get(i).map(f64::to_bits),
                opt_type.get(i).map(str::to_string),
            );
            if !seen.insert(key) {
                duplicates += 1;
            }
        }
        count_rows(duplicates, "duplicate (timestamp, underlying, expiry, strike, type) keys", issues);
    }

    // One snapshot file covers exactly one IST calendar day.
    if let Some(ts) = i64_values(df, "timestamp") {
        let dates: HashSet<_> = ts
            .into_iter()
            .flatten()
            .map(|n| session::ist_date(chrono::DateTime::from_timestamp_nanos(n)))
            .collect();
        if dates.len() > 1 {
            issues.push(format!(
                "snapshot spans {} calendar days, expected one",
                dates.len()
            ));
        }
    }
}

fn check_iv_history(df: &DataFrame, issues: &mut Vec<String>) {
    if let Some(ivs) = f64_values(df, "atm_iv") {
        let invalid = ivs.into_iter().flatten().filter(|v| *v < 0.0).count();
        count_rows(invalid, "negative atm_iv", issues);
    }

    if let (Some(dates), Some(underlyings)) =
        (str_values(df, "date"), str_values(df, "underlying"))
    {
        let mut seen = HashSet::new();
        let mut duplicates = 0usize;
        for i in 0..df.height() {
            let key = (
                dates.get(i).map(str::to_string),
                underlyings.get(i).map(str::to_string),
            );
            if !seen.insert(key) {
                duplicates += 1;
            }
        }
        count_rows(duplicates, "duplicate (date, underlying) keys", issues);
    }
}
