//! Date helpers shared by scheduling, leave and payroll.
//!
//! Calendar dates travel as `YYYY-MM-DD`, times of day as `HH:MM`,
//! payroll months as `YYYY-MM`.

use chrono::{Datelike, Local, NaiveDate, NaiveTime, Utc};

use crate::domain::DomainError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::validation(format!("{} must be a YYYY-MM-DD date", field)))
}

pub fn parse_time(value: &str, field: &str) -> Result<NaiveTime, DomainError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| DomainError::validation(format!("{} must be a HH:MM time", field)))
}

/// Number of calendar days in `[start, end]`, both ends included.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// First and last day of a `YYYY-MM` month.
pub fn month_bounds(month: &str) -> Result<(NaiveDate, NaiveDate), DomainError> {
    let invalid = || DomainError::validation("month must be formatted as YYYY-MM");
    let (year, mon) = month.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let mon: u32 = mon.parse().map_err(|_| invalid())?;

    let first = NaiveDate::from_ymd_opt(year, mon, 1).ok_or_else(invalid)?;
    let next = if mon == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, mon + 1, 1)
    }
    .ok_or_else(invalid)?;

    Ok((first, next.pred_opt().ok_or_else(invalid)?))
}

/// Days of `[start, end]` that fall inside `[from, to]`.
pub fn overlap_days(start: NaiveDate, end: NaiveDate, from: NaiveDate, to: NaiveDate) -> i64 {
    let lo = start.max(from);
    let hi = end.min(to);
    if hi < lo { 0 } else { inclusive_days(lo, hi) }
}

pub fn format_month(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn inclusive_day_count() {
        assert_eq!(inclusive_days(d("2026-03-01"), d("2026-03-01")), 1);
        assert_eq!(inclusive_days(d("2026-03-01"), d("2026-03-05")), 5);
    }

    #[test]
    fn month_bounds_handle_december_and_leap_years() {
        assert_eq!(
            month_bounds("2026-12").unwrap(),
            (d("2026-12-01"), d("2026-12-31"))
        );
        assert_eq!(
            month_bounds("2028-02").unwrap(),
            (d("2028-02-01"), d("2028-02-29"))
        );
        assert!(month_bounds("2026-13").is_err());
        assert!(month_bounds("march").is_err());
    }

    #[test]
    fn overlap_is_clipped_to_the_window() {
        let (from, to) = month_bounds("2026-04").unwrap();
        assert_eq!(overlap_days(d("2026-03-29"), d("2026-04-02"), from, to), 2);
        assert_eq!(overlap_days(d("2026-05-01"), d("2026-05-03"), from, to), 0);
    }

    #[test]
    fn rejects_malformed_times() {
        assert!(parse_time("09:30", "t").is_ok());
        assert!(parse_time("25:00", "t").is_err());
    }
}
