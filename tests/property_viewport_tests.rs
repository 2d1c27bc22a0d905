use activity_timeline::api::{TimelineEngine, TimelineEngineConfig, TimelineInput};
use activity_timeline::core::calendar::add_days;
use activity_timeline::core::{ActivityInterval, IdleGapConfig, Row};
use chrono::NaiveDate;
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn engine(width: u32, compressed: bool) -> TimelineEngine {
    let origin = date(2014, 1, 1);
    let intervals = (0..20)
        .map(|i| {
            let start = add_days(origin, i * 180);
            ActivityInterval::new(start, add_days(start, 20 + (i % 4) * 15))
        })
        .collect();
    let mut config = TimelineEngineConfig::new(width).with_today(date(2024, 1, 1));
    if compressed {
        config = config.with_idle_gap_compression(IdleGapConfig::default());
    }
    TimelineEngine::new(
        TimelineInput::new(vec![Row::new("repo", intervals)], Vec::new()),
        config,
    )
    .expect("engine")
}

proptest! {
    #[test]
    fn zoom_keeps_anchored_day_within_a_pixel(
        width in 600u32..2_000,
        compressed in any::<bool>(),
        scroll_fraction in 0.3f64..0.7,
        factor in 1.01f64..6.0,
        anchor_fraction in 0.1f64..0.9
    ) {
        let mut engine = engine(width, compressed);
        engine.scroll_to(engine.max_scroll_px() * scroll_fraction).expect("scroll");
        let anchor_px = f64::from(width) * anchor_fraction;
        let anchor_day = engine.viewport().viewport_pixel_to_day(anchor_px);

        engine.zoom_by(factor, Some(anchor_px)).expect("zoom");
        let after = engine.viewport().day_to_viewport_pixel(anchor_day);
        prop_assert!((after - anchor_px).abs() <= 1.0, "anchor moved from {anchor_px} to {after}");
    }

    #[test]
    fn scroll_always_stays_in_bounds(
        width in 320u32..2_000,
        compressed in any::<bool>(),
        steps in prop::collection::vec((0.2f64..5.0, -3_000.0f64..3_000.0, 0.0f64..1.0), 1..16)
    ) {
        let mut engine = engine(width, compressed);
        for (factor, pan, anchor) in steps {
            engine.zoom_by(factor, Some(anchor * f64::from(width))).expect("zoom");
            engine.pan_by(pan).expect("pan");
            let state = engine.viewport_state();
            prop_assert!(state.zoom_level >= 0.25 && state.zoom_level <= 16.0);
            prop_assert!(state.scroll_offset_px >= 0.0);
            prop_assert!(state.scroll_offset_px <= engine.max_scroll_px());
        }
    }

    #[test]
    fn set_window_is_idempotent_across_fit(
        width in 320u32..2_000,
        compressed in any::<bool>(),
        days in 7.0f64..2_000.0
    ) {
        let mut engine = engine(width, compressed);
        engine.set_window(days).expect("window");
        let first = engine.viewport_state();
        engine.fit_to_domain();
        engine.set_window(days).expect("window");
        prop_assert_eq!(engine.viewport_state(), first);
    }
}
