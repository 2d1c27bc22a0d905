use activity_timeline::core::calendar::add_days;
use activity_timeline::core::{ActivityInterval, Marker, Row, calculate_domain};
use chrono::NaiveDate;
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn empty_input_falls_back_to_default_window() {
    let today = date(2024, 3, 15);
    let rows: Vec<Row> = Vec::new();
    let markers: Vec<Marker> = Vec::new();
    let domain = calculate_domain(&rows, &markers, today, 365);
    assert_eq!(domain.end, today);
    assert_eq!(domain.start, add_days(today, -365));
}

#[test]
fn past_data_is_extended_to_today() {
    let today = date(2024, 3, 15);
    let rows = vec![Row::new(
        "repo",
        vec![ActivityInterval::new(date(2021, 6, 1), date(2021, 9, 30))],
    )];
    let markers = vec![Marker::point("launch", date(2021, 5, 20))];
    let domain = calculate_domain(&rows, &markers, today, 365);
    assert_eq!(domain.start, date(2021, 5, 20));
    assert_eq!(domain.end, today);
}

#[test]
fn range_marker_bounds_both_contribute() {
    let today = date(2020, 1, 1);
    let rows: Vec<Row> = Vec::new();
    let markers = vec![Marker::range("trip", date(2020, 5, 1), date(2019, 11, 1))];
    let domain = calculate_domain(&rows, &markers, today, 365);
    assert_eq!(domain.start, date(2019, 11, 1));
    assert_eq!(domain.end, date(2020, 5, 1));
}

#[test]
fn single_future_day_is_widened() {
    let today = date(2020, 1, 1);
    let rows = vec![Row::new(
        "repo",
        vec![ActivityInterval::new(date(2020, 1, 1), date(2020, 1, 1))],
    )];
    let markers: Vec<Marker> = Vec::new();
    let domain = calculate_domain(&rows, &markers, today, 365);
    assert_eq!(domain.start, today);
    assert_eq!(domain.end, date(2020, 1, 2));
    assert_eq!(domain.span_days(), 1);
}

proptest! {
    #[test]
    fn domain_is_never_degenerate(
        specs in prop::collection::vec((-800i64..800, 0i64..60), 0..24),
        marker_offsets in prop::collection::vec(-800i64..800, 0..8),
        today_offset in -400i64..400
    ) {
        let origin = date(2022, 1, 1);
        let today = add_days(origin, today_offset);
        let rows = vec![Row::new(
            "repo",
            specs
                .iter()
                .map(|(offset, length)| {
                    let start = add_days(origin, *offset);
                    ActivityInterval::new(start, add_days(start, *length))
                })
                .collect(),
        )];
        let markers: Vec<Marker> = marker_offsets
            .iter()
            .enumerate()
            .map(|(i, offset)| Marker::point(format!("m{i}"), add_days(origin, *offset)))
            .collect();

        let domain = calculate_domain(&rows, &markers, today, 365);
        prop_assert!(domain.end > domain.start);
        prop_assert!(domain.end >= today);
    }

    #[test]
    fn past_only_data_ends_exactly_today(
        specs in prop::collection::vec((0i64..500, 0i64..60), 1..24),
        lead_days in 1i64..300
    ) {
        let origin = date(2019, 1, 1);
        let intervals: Vec<ActivityInterval> = specs
            .iter()
            .map(|(offset, length)| {
                let start = add_days(origin, *offset);
                ActivityInterval::new(start, add_days(start, *length))
            })
            .collect();
        let last_end = intervals
            .iter()
            .map(|interval| interval.end)
            .max()
            .expect("non-empty");
        let today = add_days(last_end, lead_days);
        let rows = vec![Row::new("repo", intervals)];
        let markers: Vec<Marker> = Vec::new();

        let domain = calculate_domain(&rows, &markers, today, 365);
        prop_assert_eq!(domain.end, today);
    }
}
