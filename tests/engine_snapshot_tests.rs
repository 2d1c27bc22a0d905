use activity_timeline::api::{
    ENGINE_SNAPSHOT_JSON_SCHEMA_V1, EngineSnapshot, TimelineEngine, TimelineEngineConfig,
    TimelineInput,
};
use activity_timeline::core::{ActivityInterval, IdleGapConfig, IntervalMetrics, Marker, Row};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn engine() -> TimelineEngine {
    let input = TimelineInput::new(
        vec![
            Row::new(
                "core",
                vec![
                    ActivityInterval::new(date(2021, 1, 1), date(2021, 2, 15)).with_metrics(
                        IntervalMetrics {
                            commit_count: 42,
                            active_days: 18,
                        },
                    ),
                    ActivityInterval::new(date(2021, 2, 1), date(2021, 3, 1)),
                ],
            ),
            Row::new(
                "docs",
                vec![ActivityInterval::new(date(2022, 9, 1), date(2022, 10, 1))],
            ),
        ],
        vec![
            Marker::point("launch", date(2021, 2, 10)).with_label("Launch"),
            Marker::range("freeze", date(2021, 12, 20), date(2022, 1, 3)),
        ],
    );
    let config = TimelineEngineConfig::new(1200)
        .with_today(date(2022, 12, 1))
        .with_idle_gap_compression(IdleGapConfig::default());
    TimelineEngine::new(input, config).expect("engine")
}

#[test]
fn snapshot_reports_lanes_geometry_and_gaps() {
    let engine = engine();
    let snapshot = engine.snapshot();

    assert_eq!(snapshot.today, date(2022, 12, 1));
    assert_eq!(snapshot.domain.start, date(2021, 1, 1));
    assert_eq!(snapshot.domain.end, date(2022, 12, 1));
    assert!(snapshot.compression_enabled);
    assert!(!snapshot.collapsed_segments.is_empty());

    let core = &snapshot.rows[0];
    assert_eq!(core.id, "core");
    assert_eq!(core.lane_count, 2);
    let lanes: Vec<usize> = core.intervals.iter().map(|interval| interval.lane).collect();
    assert_eq!(lanes, vec![0, 1]);
    assert_eq!(core.intervals[0].metrics.commit_count, 42);
    assert!(core.intervals.iter().all(|interval| interval.geometry.width >= 2.0));

    assert_eq!(snapshot.marker_labels.labels.len(), 1);
    assert_eq!(snapshot.marker_labels.labels[0].text, "Launch");
    assert!(snapshot.visible_range.0 <= snapshot.visible_range.1);
}

#[test]
fn summary_matches_header_figures() {
    let engine = engine();
    let summary = engine.summary();
    assert_eq!(summary.row_count, 2);
    assert_eq!(summary.interval_count, 3);
    assert_eq!(summary.marker_count, 2);
    assert_eq!(summary.inactivity_gap_days, 30);
    assert_eq!(summary.zoom_level, 1.0);
    assert_eq!(
        summary.collapsed_gap_count,
        engine.collapsed_segments().len()
    );
}

#[test]
fn json_contract_is_versioned_and_parses_back() {
    let engine = engine();
    let json = engine
        .snapshot_json_contract_v1_pretty()
        .expect("contract json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(
        value["schema_version"],
        serde_json::json!(ENGINE_SNAPSHOT_JSON_SCHEMA_V1)
    );

    let parsed = EngineSnapshot::from_json_compat_str(&json).expect("parse contract");
    let original = engine.snapshot();
    assert_eq!(parsed.domain, original.domain);
    assert_eq!(parsed.collapsed_segments, original.collapsed_segments);
    assert_eq!(parsed.rows.len(), original.rows.len());
    assert_eq!(parsed.rows[0].intervals[1].lane, 1);

    let bare = serde_json::to_string(&original).expect("bare json");
    let parsed_bare = EngineSnapshot::from_json_compat_str(&bare).expect("parse bare");
    assert_eq!(parsed_bare.today, original.today);
}

#[test]
fn unknown_schema_version_is_rejected() {
    let engine = engine();
    let json = engine
        .snapshot_json_contract_v1_pretty()
        .expect("contract json");
    let mut value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    value["schema_version"] = serde_json::json!(99);
    let tampered = serde_json::to_string(&value).expect("json");
    assert!(EngineSnapshot::from_json_compat_str(&tampered).is_err());
}
