use chrono::{Datelike, Local, NaiveDate};

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Whole days since 1970-01-01 (negative before the epoch).
///
/// This is the unit of the continuous day axis used by projectors and scales.
#[must_use]
pub fn day_number(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE
}

/// Inverse of [`day_number`], saturating at the representable date range.
#[must_use]
pub fn date_from_day_number(day: i64) -> NaiveDate {
    let days_from_ce = day.saturating_add(UNIX_EPOCH_DAYS_FROM_CE);
    i32::try_from(days_from_ce)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .unwrap_or(if day < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
}

/// Day values this close to a whole day are treated as that day's start.
const DAY_BOUNDARY_SNAP: f64 = 1e-6;

/// Floors a continuous day value to the calendar day containing it.
///
/// Values within [`DAY_BOUNDARY_SNAP`] of a day boundary snap onto it first,
/// so a projected day start inverted back through the scale stays on its day.
#[must_use]
pub fn date_from_day_value(value: f64) -> NaiveDate {
    let nearest = value.round();
    let day = if (value - nearest).abs() < DAY_BOUNDARY_SNAP {
        nearest
    } else {
        value.floor()
    };
    date_from_day_number(day as i64)
}

#[must_use]
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date_from_day_number(day_number(date).saturating_add(days))
}

/// Today's calendar date in the host's local timezone.
#[must_use]
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[must_use]
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
