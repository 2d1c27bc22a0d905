use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::calendar::{add_days, day_number};
use crate::core::{Marker, Row};

/// Full calendar range the timeline must be able to display.
///
/// `end > start` always holds for domains produced by [`calculate_domain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Domain {
    #[must_use]
    pub fn start_day(self) -> f64 {
        day_number(self.start) as f64
    }

    #[must_use]
    pub fn end_day(self) -> f64 {
        day_number(self.end) as f64
    }

    #[must_use]
    pub fn span_days(self) -> i64 {
        day_number(self.end) - day_number(self.start)
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Derives the display domain from every interval boundary and marker date.
///
/// Without any dates the domain is the `default_window_days` leading up to
/// `today`. Otherwise it spans the data, is extended to reach `today`, and is
/// widened by a day if it would be empty.
#[must_use]
pub fn calculate_domain<'a>(
    rows: impl IntoIterator<Item = &'a Row>,
    markers: impl IntoIterator<Item = &'a Marker>,
    today: NaiveDate,
    default_window_days: u32,
) -> Domain {
    let interval_dates = rows
        .into_iter()
        .flat_map(|row| row.intervals().iter())
        .flat_map(|interval| [interval.start, interval.end]);
    let marker_dates = markers.into_iter().flat_map(|marker| {
        let (start, end) = marker.kind.bounds();
        [start, end]
    });

    let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
    for date in interval_dates.chain(marker_dates) {
        bounds = Some(match bounds {
            None => (date, date),
            Some((min, max)) => (min.min(date), max.max(date)),
        });
    }

    let Some((start, mut end)) = bounds else {
        return Domain {
            start: add_days(today, -i64::from(default_window_days)),
            end: today,
        };
    };

    if end < today {
        end = today;
    }
    if start == end {
        end = add_days(end, 1);
    }

    Domain { start, end }
}
