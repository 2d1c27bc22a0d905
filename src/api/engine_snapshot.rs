use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{CollapsedSegment, Domain, IntervalMetrics, SpanGeometry};
use crate::extensions::MarkerLabelLayout;

use super::{TimelineEngine, ViewportState};

/// Header line figures: counts plus the current zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineSummary {
    pub row_count: usize,
    pub interval_count: usize,
    pub marker_count: usize,
    /// Idle stretch length (days) above which compression collapses gaps.
    pub inactivity_gap_days: u32,
    pub zoom_level: f64,
    pub collapsed_gap_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSnapshot {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub lane: usize,
    pub metrics: IntervalMetrics,
    pub source: Option<String>,
    pub geometry: SpanGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSnapshot {
    pub id: String,
    pub members: Vec<String>,
    pub lane_count: usize,
    pub intervals: Vec<IntervalSnapshot>,
}

/// Serializable deterministic layout snapshot used by regression tests and
/// hosts that render out of process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub today: NaiveDate,
    pub domain: Domain,
    pub viewport_width_px: f64,
    pub viewport: ViewportState,
    pub content_width_px: f64,
    pub visible_range: (NaiveDate, NaiveDate),
    pub compression_enabled: bool,
    pub rows: Vec<RowSnapshot>,
    pub collapsed_segments: Vec<CollapsedSegment>,
    pub marker_labels: MarkerLabelLayout,
}

impl TimelineEngine {
    #[must_use]
    pub fn summary(&self) -> TimelineSummary {
        TimelineSummary {
            row_count: self.rows.len(),
            interval_count: self.rows.values().map(|row| row.intervals().len()).sum(),
            marker_count: self.markers.len(),
            inactivity_gap_days: self.config.idle_gap.config.cutoff_days,
            zoom_level: self.zoom_level(),
            collapsed_gap_count: self.collapsed_segments().len(),
        }
    }

    /// First and last day visible in the viewport.
    #[must_use]
    pub fn visible_range(&self) -> (NaiveDate, NaiveDate) {
        (
            self.viewport_pixel_to_date(0.0),
            self.viewport_pixel_to_date(self.viewport_width_px()),
        )
    }

    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        let scale = self.scale();
        let rows = self
            .rows
            .values()
            .map(|row| RowSnapshot {
                id: row.id().to_owned(),
                members: row.members().to_vec(),
                lane_count: row.lane_count(),
                intervals: row
                    .intervals()
                    .iter()
                    .map(|interval| IntervalSnapshot {
                        start: interval.start,
                        end: interval.end,
                        lane: interval.lane(),
                        metrics: interval.metrics,
                        source: interval.source.clone(),
                        geometry: scale.span_geometry(interval.start, interval.end),
                    })
                    .collect(),
            })
            .collect();

        EngineSnapshot {
            today: self.today,
            domain: self.domain,
            viewport_width_px: self.viewport_width_px(),
            viewport: self.viewport_state(),
            content_width_px: scale.content_width_px(),
            visible_range: self.visible_range(),
            compression_enabled: self.compression_enabled(),
            rows,
            collapsed_segments: self.collapsed_segments().to_vec(),
            marker_labels: self.marker_label_layout(),
        }
    }
}
