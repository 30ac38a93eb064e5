//! Calendar-month arithmetic
//!
//! Adding months to a date near the end of a month has no single right answer.
//! Two policies are supported and selected explicitly through settings:
//!
//! - [`MonthRollover::Normalize`]: the day is kept and any overflow rolls into
//!   the following month, so Jan 31 + 1 month lands on Mar 3 (Mar 2 in a leap
//!   year). This is how browser `Date` arithmetic behaves.
//! - [`MonthRollover::ClampToMonthEnd`]: the day is clamped to the last day of
//!   the target month, so Jan 31 + 1 month lands on Feb 28 (or 29).

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthRollover {
    #[default]
    Normalize,
    ClampToMonthEnd,
}

/// Number of days in the given month, `None` for an invalid month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}

/// Shift `date` by `delta` calendar months (negative goes backwards)
///
/// Returns `None` only when the result falls outside chrono's date range.
pub fn add_months(date: NaiveDate, delta: i32, policy: MonthRollover) -> Option<NaiveDate> {
    let months = Months::new(delta.unsigned_abs());
    // chrono clamps to the end of a shorter target month
    let clamped = if delta >= 0 {
        date.checked_add_months(months)?
    } else {
        date.checked_sub_months(months)?
    };

    match policy {
        MonthRollover::ClampToMonthEnd => Some(clamped),
        MonthRollover::Normalize => {
            let overflow = date.day() - clamped.day();
            clamped.checked_add_signed(Duration::days(overflow as i64))
        }
    }
}

/// Same as [`add_months`] but keeps the time of day
pub fn add_months_datetime(
    at: NaiveDateTime,
    delta: i32,
    policy: MonthRollover,
) -> Option<NaiveDateTime> {
    add_months(at.date(), delta, policy).map(|d| d.and_time(at.time()))
}
