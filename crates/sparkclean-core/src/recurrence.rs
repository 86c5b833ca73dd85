//! Date arithmetic for recurring-task instance generation.
//!
//! Occurrences are always stepped n periods from the anchor rather than one
//! period from the previous occurrence, so a monthly task anchored on
//! Jan 31 yields Feb 28 (clamped), Mar 31, Apr 30 — it never drifts to the
//! 28th permanently after a short month.

use chrono::{Days, Months, NaiveDate};

use crate::model::Frequency;

/// The date `n` periods after `anchor`, or `None` on overflow.
///
/// Month-end clamping follows chrono: `Jan 31 + 1 month` is the last day of
/// February.
pub fn add_periods(anchor: NaiveDate, frequency: Frequency, n: u32) -> Option<NaiveDate> {
    match frequency {
        Frequency::Daily => anchor.checked_add_days(Days::new(u64::from(n))),
        Frequency::Weekly => anchor.checked_add_days(Days::new(7 * u64::from(n))),
        Frequency::Monthly => anchor.checked_add_months(Months::new(n)),
        Frequency::Yearly => anchor.checked_add_months(Months::new(12 * n)),
    }
}

/// All occurrence dates `d` of a schedule with `anchor <= d <= until` and,
/// when a floor is given, `d > after`.
///
/// `after` is the task's last_generated_date: dates at or before it already
/// have instances. A cleared floor (None) regenerates from the anchor.
pub fn occurrences_between(
    anchor: NaiveDate,
    frequency: Frequency,
    after: Option<NaiveDate>,
    until: NaiveDate,
) -> Vec<NaiveDate> {
    if anchor > until {
        return Vec::new();
    }

    // Skip ahead for day-stepped frequencies; an old daily anchor would
    // otherwise walk thousands of past dates.
    let mut n: u32 = match (frequency, after) {
        (Frequency::Daily, Some(floor)) if floor > anchor => {
            (floor - anchor).num_days().max(0) as u32
        }
        (Frequency::Weekly, Some(floor)) if floor > anchor => {
            ((floor - anchor).num_days().max(0) / 7) as u32
        }
        _ => 0,
    };

    let mut out = Vec::new();
    while let Some(date) = add_periods(anchor, frequency, n) {
        if date > until {
            break;
        }
        if after.is_none_or(|floor| date > floor) {
            out.push(date);
        }
        n += 1;
    }
    out
}
