//! Calendar-date arithmetic on `NaiveDate`, so no timezone ever enters a day count.

use std::fmt::Write;

use chrono::NaiveDate;

pub const SHORT_LABEL: &str = "%b %d";

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Every date in `[start, end]`. Empty when `end < start`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first_day = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }?;
    Some((first_day, next_month.pred_opt()?))
}

pub fn parse_iso(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
}

/// Format `date` with a strftime pattern. Falls back to `SHORT_LABEL` when
/// the pattern cannot be rendered.
pub fn label(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_err() {
        tracing::debug!(format, "unusable label format, using short label");
        out.clear();
        let _ = write!(out, "{}", date.format(SHORT_LABEL));
    }
    out
}
