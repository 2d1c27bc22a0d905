use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::calendar::iso_date;
use crate::core::{LabelBox, Marker, MarkerCategory, MarkerKind, TimelineScale, pack_label_lanes};
use crate::error::{TimelineError, TimelineResult};

use super::marker_category::{MarkerClassifier, resolve_category};

/// Estimated text metrics and stacking tuning for marker labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerLabelConfig {
    pub char_width_px: f64,
    pub horizontal_padding_px: f64,
    /// Distance from the marker line to the label's left edge.
    pub anchor_offset_px: f64,
    pub lane_margin_px: f64,
    pub lane_height_px: f64,
}

impl Default for MarkerLabelConfig {
    fn default() -> Self {
        Self {
            char_width_px: 7.0,
            horizontal_padding_px: 4.0,
            anchor_offset_px: 4.0,
            lane_margin_px: 6.0,
            lane_height_px: 14.0,
        }
    }
}

impl MarkerLabelConfig {
    pub(crate) fn validate(self) -> TimelineResult<Self> {
        for (value, name) in [
            (self.char_width_px, "char_width_px"),
            (self.lane_height_px, "lane_height_px"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TimelineError::InvalidData(format!(
                    "marker label config `{name}` must be finite and > 0"
                )));
            }
        }
        for (value, name) in [
            (self.horizontal_padding_px, "horizontal_padding_px"),
            (self.anchor_offset_px, "anchor_offset_px"),
            (self.lane_margin_px, "lane_margin_px"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TimelineError::InvalidData(format!(
                    "marker label config `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }

    #[must_use]
    pub fn estimated_width_px(self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width_px + 2.0 * self.horizontal_padding_px
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedMarkerLabel {
    pub marker_id: String,
    pub text: String,
    pub date: NaiveDate,
    pub category: MarkerCategory,
    /// Content pixel of the marker line.
    pub x: f64,
    pub left_px: f64,
    pub width_px: f64,
    pub lane: usize,
    pub top_offset_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MarkerLabelLayout {
    pub labels: Vec<PlacedMarkerLabel>,
    pub lane_count: usize,
}

impl MarkerLabelLayout {
    /// Vertical space to reserve above the rows.
    #[must_use]
    pub fn reserved_height_px(&self, config: MarkerLabelConfig) -> f64 {
        self.lane_count as f64 * config.lane_height_px
    }
}

struct PreparedLabel<'a> {
    index: usize,
    marker: &'a Marker,
    date: NaiveDate,
    text: String,
    x: f64,
    label: LabelBox,
}

/// Lays out labels for global point markers.
///
/// Placement order is stable by left edge, then marker id, then input order.
/// Range and row-scoped markers carry no header label.
#[must_use]
pub fn layout_marker_labels(
    markers: &[Marker],
    scale: &TimelineScale<'_>,
    config: MarkerLabelConfig,
    classifier: &dyn MarkerClassifier,
) -> MarkerLabelLayout {
    let mut prepared: Vec<PreparedLabel<'_>> = markers
        .iter()
        .enumerate()
        .filter(|(_, marker)| marker.is_global())
        .filter_map(|(index, marker)| {
            let MarkerKind::Point { date } = marker.kind else {
                return None;
            };
            let text = if marker.label.is_empty() {
                iso_date(date)
            } else {
                marker.label.clone()
            };
            let x = scale.date_to_pixel(date);
            let label = LabelBox::new(
                x + config.anchor_offset_px,
                config.estimated_width_px(&text),
            );
            Some(PreparedLabel {
                index,
                marker,
                date,
                text,
                x,
                label,
            })
        })
        .collect();

    prepared.sort_by(|a, b| {
        OrderedFloat(a.label.left_px)
            .cmp(&OrderedFloat(b.label.left_px))
            .then_with(|| a.marker.id.cmp(&b.marker.id))
            .then_with(|| a.index.cmp(&b.index))
    });

    let boxes: Vec<LabelBox> = prepared.iter().map(|item| item.label).collect();
    let lanes = pack_label_lanes(&boxes, config.lane_margin_px);

    let labels = prepared
        .into_iter()
        .zip(lanes.lanes)
        .map(|(item, lane)| PlacedMarkerLabel {
            marker_id: item.marker.id.clone(),
            category: resolve_category(item.marker, classifier),
            text: item.text,
            date: item.date,
            x: item.x,
            left_px: item.label.left_px,
            width_px: item.label.width_px,
            lane,
            top_offset_px: lane as f64 * config.lane_height_px,
        })
        .collect();

    MarkerLabelLayout {
        labels,
        lane_count: lanes.lane_count,
    }
}
