use activity_timeline::core::{
    ActivityInterval, LabelBox, Row, assign_interval_lanes, pack_label_lanes,
};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn lanes(row: &Row) -> Vec<usize> {
    row.intervals().iter().map(ActivityInterval::lane).collect()
}

#[test]
fn overlapping_intervals_take_separate_lanes() {
    let row = Row::new(
        "repo",
        vec![
            ActivityInterval::new(date(2023, 1, 1), date(2023, 1, 5)),
            ActivityInterval::new(date(2023, 1, 3), date(2023, 1, 10)),
        ],
    );
    assert_eq!(lanes(&row), vec![0, 1]);
    assert_eq!(row.lane_count(), 2);
}

#[test]
fn touching_intervals_share_a_lane() {
    let row = Row::new(
        "repo",
        vec![
            ActivityInterval::new(date(2023, 1, 1), date(2023, 1, 5)),
            ActivityInterval::new(date(2023, 1, 6), date(2023, 1, 10)),
        ],
    );
    assert_eq!(lanes(&row), vec![0, 0]);
    assert_eq!(row.lane_count(), 1);
}

#[test]
fn same_day_boundary_counts_as_overlap() {
    let row = Row::new(
        "repo",
        vec![
            ActivityInterval::new(date(2023, 1, 1), date(2023, 1, 10)),
            ActivityInterval::new(date(2023, 1, 10), date(2023, 1, 20)),
        ],
    );
    assert_eq!(lanes(&row), vec![0, 1]);
}

#[test]
fn freed_lane_is_reused_before_opening_a_new_one() {
    let row = Row::new(
        "repo",
        vec![
            ActivityInterval::new(date(2023, 1, 12), date(2023, 1, 20)),
            ActivityInterval::new(date(2023, 1, 1), date(2023, 1, 10)),
            ActivityInterval::new(date(2023, 1, 5), date(2023, 1, 15)),
        ],
    );
    let starts: Vec<NaiveDate> = row.intervals().iter().map(|i| i.start).collect();
    assert_eq!(
        starts,
        vec![date(2023, 1, 1), date(2023, 1, 5), date(2023, 1, 12)]
    );
    assert_eq!(lanes(&row), vec![0, 1, 0]);
    assert_eq!(row.lane_count(), 2);
}

#[test]
fn reversed_interval_is_normalized() {
    let interval = ActivityInterval::new(date(2023, 3, 9), date(2023, 3, 1));
    assert_eq!(interval.start, date(2023, 3, 1));
    assert_eq!(interval.end, date(2023, 3, 9));
    assert_eq!(interval.day_count(), 9);
}

#[test]
fn empty_row_reports_one_lane() {
    let row = Row::new("quiet", Vec::new());
    assert_eq!(row.lane_count(), 1);

    let mut intervals: Vec<ActivityInterval> = Vec::new();
    assert_eq!(assign_interval_lanes(&mut intervals), 1);
}

#[test]
fn grouped_row_tags_interval_sources() {
    let group = Row::grouped(
        "tools",
        vec![
            Row::new(
                "cli",
                vec![ActivityInterval::new(date(2023, 1, 1), date(2023, 1, 9))],
            ),
            Row::new(
                "web",
                vec![ActivityInterval::new(date(2023, 1, 4), date(2023, 1, 6))],
            ),
        ],
    );
    assert_eq!(group.members(), ["cli".to_owned(), "web".to_owned()]);
    assert!(group.answers_to("web"));
    assert!(!group.answers_to("docs"));
    let sources: Vec<Option<&str>> = group
        .intervals()
        .iter()
        .map(|interval| interval.source.as_deref())
        .collect();
    assert_eq!(sources, vec![Some("cli"), Some("web")]);
    assert_eq!(group.lane_count(), 2);
}

#[test]
fn label_lanes_stack_a_dense_cluster() {
    let boxes = [
        LabelBox::new(0.0, 30.0),
        LabelBox::new(10.0, 30.0),
        LabelBox::new(20.0, 30.0),
        LabelBox::new(45.0, 10.0),
    ];
    let packed = pack_label_lanes(&boxes, 6.0);
    assert_eq!(packed.lanes, vec![0, 1, 2, 0]);
    assert_eq!(packed.lane_count, 3);
}

#[test]
fn label_lanes_for_no_labels_is_zero() {
    let packed = pack_label_lanes(&[], 6.0);
    assert!(packed.lanes.is_empty());
    assert_eq!(packed.lane_count, 0);
}
