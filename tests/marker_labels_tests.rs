use activity_timeline::api::{TimelineEngine, TimelineEngineConfig, TimelineInput};
use activity_timeline::core::{ActivityInterval, Marker, MarkerCategory, Row};
use activity_timeline::extensions::{MarkerClassifier, MarkerLabelConfig};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn engine(markers: Vec<Marker>) -> TimelineEngine {
    let input = TimelineInput::new(
        vec![Row::new(
            "repo",
            vec![ActivityInterval::new(date(2023, 1, 1), date(2023, 12, 1))],
        )],
        markers,
    );
    let config = TimelineEngineConfig::new(1040).with_today(date(2024, 1, 1));
    TimelineEngine::new(input, config).expect("engine")
}

#[test]
fn colliding_labels_stack_and_distant_ones_reuse_lane_zero() {
    let engine = engine(vec![
        Marker::point("b", date(2023, 6, 1)).with_label("Second talk"),
        Marker::point("a", date(2023, 6, 1)).with_label("First talk"),
        Marker::point("far", date(2023, 11, 1)).with_label("Later"),
    ]);
    let layout = engine.marker_label_layout();
    let ids: Vec<&str> = layout
        .labels
        .iter()
        .map(|label| label.marker_id.as_str())
        .collect();
    assert_eq!(ids, vec!["a", "b", "far"]);
    let lanes: Vec<usize> = layout.labels.iter().map(|label| label.lane).collect();
    assert_eq!(lanes, vec![0, 1, 0]);
    assert_eq!(layout.lane_count, 2);
    assert_eq!(layout.labels[1].top_offset_px, 14.0);
    assert_eq!(
        layout.reserved_height_px(MarkerLabelConfig::default()),
        28.0
    );
}

#[test]
fn label_box_starts_right_of_marker_line() {
    let engine = engine(vec![Marker::point("m", date(2023, 3, 1)).with_label("abc")]);
    let layout = engine.marker_label_layout();
    let label = &layout.labels[0];
    assert_eq!(label.x, engine.date_to_pixel(date(2023, 3, 1)));
    assert_eq!(label.left_px, label.x + 4.0);
    assert_eq!(label.width_px, 3.0 * 7.0 + 2.0 * 4.0);
}

#[test]
fn row_scoped_markers_get_no_header_label() {
    let engine = engine(vec![
        Marker::point("scoped", date(2023, 3, 1)).for_row("repo"),
        Marker::point("global", date(2023, 3, 1)),
    ]);
    let layout = engine.marker_label_layout();
    assert_eq!(layout.labels.len(), 1);
    assert_eq!(layout.labels[0].marker_id, "global");
}

#[test]
fn categories_prefer_explicit_then_classifier() {
    let engine = engine(vec![
        Marker::point("rel", date(2023, 2, 1)).with_label("Release 2.0"),
        Marker::point("explicit", date(2023, 5, 1))
            .with_label("Release party")
            .with_category(MarkerCategory::Talk),
        Marker::point("plain", date(2023, 8, 1)).with_label("Offsite"),
    ]);
    let layout = engine.marker_label_layout();
    let categories: Vec<MarkerCategory> =
        layout.labels.iter().map(|label| label.category).collect();
    assert_eq!(
        categories,
        vec![
            MarkerCategory::Release,
            MarkerCategory::Talk,
            MarkerCategory::Other
        ]
    );
}

struct EverythingIsAMilestone;

impl MarkerClassifier for EverythingIsAMilestone {
    fn classify(&self, _marker: &Marker) -> MarkerCategory {
        MarkerCategory::Milestone
    }
}

#[test]
fn custom_classifier_replaces_keyword_matching() {
    let engine = engine(vec![
        Marker::point("rel", date(2023, 2, 1)).with_label("Release 2.0"),
        Marker::point("fixed", date(2023, 4, 1)).with_category(MarkerCategory::Incident),
    ]);
    let layout = engine.marker_label_layout_with(&EverythingIsAMilestone);
    assert_eq!(layout.labels[0].category, MarkerCategory::Milestone);
    assert_eq!(layout.labels[1].category, MarkerCategory::Incident);
    assert_eq!(layout.labels[1].text, "2023-04-01");
}
