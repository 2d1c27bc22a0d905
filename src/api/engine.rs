use std::time::Instant;

use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::debug;

use crate::core::calendar::local_today;
use crate::core::{
    ActiveSpan, ActivityInterval, CollapsedSegment, Domain, IdleGapConfig, IdleGapProjector,
    Marker, MarkerScope, Row, SpanGeometry, TimelineScale, calculate_domain,
};
use crate::error::TimelineResult;
use crate::extensions::{
    KeywordMarkerClassifier, MarkerClassifier, MarkerLabelLayout, layout_marker_labels,
};
use crate::interaction::{DragPanState, ResizeDebouncer};

use super::data_canonicalization::canonicalize_input;
use super::viewport_controller::ViewportController;
use super::{TimelineEngineConfig, TimelineInput};

/// Layout engine for one activity timeline.
///
/// Owns the canonical rows and markers, the calendar domain, the active
/// projection and the viewport. Viewport operations live in
/// `engine_viewport.rs`, pointer handling in `engine_interaction.rs` and
/// reporting in `engine_snapshot.rs`.
#[derive(Debug, Clone)]
pub struct TimelineEngine {
    pub(super) config: TimelineEngineConfig,
    pub(super) today: NaiveDate,
    pub(super) rows: IndexMap<String, Row>,
    pub(super) markers: Vec<Marker>,
    pub(super) domain: Domain,
    pub(super) viewport: ViewportController,
    pub(super) drag: DragPanState,
}

impl TimelineEngine {
    pub fn new(input: TimelineInput, config: TimelineEngineConfig) -> TimelineResult<Self> {
        let config = config.validate()?;
        let today = config.today.unwrap_or_else(local_today);
        let canonical = canonicalize_input(input);
        let domain = calculate_domain(
            canonical.rows.values(),
            &canonical.markers,
            today,
            config.default_window_days,
        );

        let projector = build_projector(
            domain,
            &canonical.rows,
            &canonical.markers,
            config.idle_gap.enabled,
            config.idle_gap.config,
        )?;
        let mut viewport = ViewportController::new(
            projector,
            today,
            config.viewport_width_px,
            config.viewport_settings(),
        )?;
        viewport.reset_view();

        debug!(
            rows = canonical.rows.len(),
            markers = canonical.markers.len(),
            domain_start = %domain.start,
            domain_end = %domain.end,
            compressed = viewport.projector().is_compressed(),
            "timeline engine built"
        );

        Ok(Self {
            config,
            today,
            rows: canonical.rows,
            markers: canonical.markers,
            domain,
            viewport,
            drag: DragPanState::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> TimelineEngineConfig {
        self.config
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Rows in first-seen input order, lanes assigned.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &Row> {
        self.rows.values()
    }

    #[must_use]
    pub fn row(&self, id: &str) -> Option<&Row> {
        self.rows.get(id)
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Markers bound to `row_id` after group resolution.
    pub fn row_markers<'a>(&'a self, row_id: &'a str) -> impl Iterator<Item = &'a Marker> + 'a {
        self.markers.iter().filter(move |marker| {
            matches!(&marker.scope, MarkerScope::Row(id) if id == row_id)
        })
    }

    #[must_use]
    pub fn domain(&self) -> Domain {
        self.domain
    }

    #[must_use]
    pub fn projector(&self) -> &IdleGapProjector {
        self.viewport.projector()
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    #[must_use]
    pub fn collapsed_segments(&self) -> &[CollapsedSegment] {
        self.viewport.projector().collapsed_segments()
    }

    #[must_use]
    pub fn compression_enabled(&self) -> bool {
        self.config.idle_gap.enabled
    }

    /// Scale at the current zoom level and viewport width.
    #[must_use]
    pub fn scale(&self) -> TimelineScale<'_> {
        self.viewport.scale()
    }

    /// Content pixel of the start of `date`.
    #[must_use]
    pub fn date_to_pixel(&self, date: NaiveDate) -> f64 {
        self.scale().date_to_pixel(date)
    }

    #[must_use]
    pub fn pixel_to_date(&self, pixel: f64) -> NaiveDate {
        self.scale().pixel_to_date(pixel)
    }

    /// Date under a viewport-relative pixel, accounting for scroll.
    #[must_use]
    pub fn viewport_pixel_to_date(&self, pixel: f64) -> NaiveDate {
        self.scale()
            .pixel_to_date(self.viewport.scroll_offset_px() + pixel)
    }

    #[must_use]
    pub fn span_geometry(&self, start: NaiveDate, end: NaiveDate) -> SpanGeometry {
        self.scale().span_geometry(start, end)
    }

    #[must_use]
    pub fn interval_geometry(&self, interval: &ActivityInterval) -> SpanGeometry {
        self.span_geometry(interval.start, interval.end)
    }

    /// Header labels for global point markers, classified by keyword.
    #[must_use]
    pub fn marker_label_layout(&self) -> MarkerLabelLayout {
        self.marker_label_layout_with(&KeywordMarkerClassifier::default())
    }

    #[must_use]
    pub fn marker_label_layout_with(&self, classifier: &dyn MarkerClassifier) -> MarkerLabelLayout {
        layout_marker_labels(
            &self.markers,
            &self.scale(),
            self.config.marker_labels,
            classifier,
        )
    }

    /// Toggles idle-gap compression, keeping the centre day in place.
    /// Returns `false` when the flag already had the requested value.
    pub fn set_compression_enabled(&mut self, enabled: bool) -> TimelineResult<bool> {
        if self.config.idle_gap.enabled == enabled {
            return Ok(false);
        }
        self.rebuild_projector(enabled, self.config.idle_gap.config)?;
        Ok(true)
    }

    /// Retunes compression; rebuilds the projection only when enabled.
    pub fn set_idle_gap_config(&mut self, config: IdleGapConfig) -> TimelineResult<()> {
        let config = config.validate()?;
        self.rebuild_projector(self.config.idle_gap.enabled, config)
    }

    /// Applies a debounced resize once its quiet period has elapsed.
    /// Returns `true` when a resize was applied.
    pub fn apply_debounced_resize(
        &mut self,
        debouncer: &mut ResizeDebouncer,
        now: Instant,
    ) -> TimelineResult<bool> {
        match debouncer.poll(now) {
            Some(width) => {
                self.resize(width)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn rebuild_projector(&mut self, enabled: bool, config: IdleGapConfig) -> TimelineResult<()> {
        let projector = build_projector(self.domain, &self.rows, &self.markers, enabled, config)?;
        self.viewport.replace_projector(projector);
        self.config.idle_gap.enabled = enabled;
        self.config.idle_gap.config = config;
        debug!(
            enabled,
            collapsed = self.collapsed_segments().len(),
            zoom_level = self.viewport.zoom_level(),
            "idle-gap compression updated"
        );
        Ok(())
    }
}

fn build_projector(
    domain: Domain,
    rows: &IndexMap<String, Row>,
    markers: &[Marker],
    enabled: bool,
    config: IdleGapConfig,
) -> TimelineResult<IdleGapProjector> {
    if !enabled {
        return Ok(IdleGapProjector::linear(domain));
    }
    let spans = ActiveSpan::collect(rows.values(), markers);
    IdleGapProjector::new(domain, &spans, config)
}
