use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::IdleGapProjector;
use crate::core::calendar::{date_from_day_value, day_number};
use crate::error::{TimelineError, TimelineResult};

/// Horizontal chart layout in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineLayout {
    pub chart_left_px: f64,
    pub right_px: f64,
    /// Viewports narrower than this are laid out as if they had this width.
    pub min_viewport_width_px: f64,
    pub min_visible_chart_width_px: f64,
    pub min_pixels_per_day: f64,
    /// Gap kept left of a window start when scrolling to it.
    pub scroll_padding_px: f64,
    /// Drawn spans never get narrower than this.
    pub min_span_width_px: f64,
}

impl Default for TimelineLayout {
    fn default() -> Self {
        Self {
            chart_left_px: 8.0,
            right_px: 32.0,
            min_viewport_width_px: 320.0,
            min_visible_chart_width_px: 240.0,
            min_pixels_per_day: 0.2,
            scroll_padding_px: 8.0,
            min_span_width_px: 2.0,
        }
    }
}

impl TimelineLayout {
    pub(crate) fn validate(self) -> TimelineResult<Self> {
        for (value, name) in [
            (self.chart_left_px, "chart_left_px"),
            (self.right_px, "right_px"),
            (self.min_viewport_width_px, "min_viewport_width_px"),
            (self.scroll_padding_px, "scroll_padding_px"),
            (self.min_span_width_px, "min_span_width_px"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TimelineError::InvalidData(format!(
                    "timeline layout `{name}` must be finite and >= 0"
                )));
            }
        }
        for (value, name) in [
            (self.min_visible_chart_width_px, "min_visible_chart_width_px"),
            (self.min_pixels_per_day, "min_pixels_per_day"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TimelineError::InvalidData(format!(
                    "timeline layout `{name}` must be finite and > 0"
                )));
            }
        }
        Ok(self)
    }
}

/// Horizontal placement of an inclusive day range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanGeometry {
    pub x: f64,
    pub width: f64,
}

/// Date <-> content-pixel mapping for one zoom level and viewport width.
///
/// Pixels are measured from the left edge of the scrollable content, not the
/// viewport; subtract the scroll offset to get viewport coordinates.
#[derive(Debug, Clone, Copy)]
pub struct TimelineScale<'a> {
    projector: &'a IdleGapProjector,
    layout: TimelineLayout,
    viewport_width_px: f64,
    pixels_per_day: f64,
    chart_width_px: f64,
}

impl<'a> TimelineScale<'a> {
    /// `base_window_days` is the span one viewport shows at zoom 1.
    #[must_use]
    pub fn new(
        projector: &'a IdleGapProjector,
        layout: TimelineLayout,
        viewport_width_px: f64,
        zoom_level: f64,
        base_window_days: f64,
    ) -> Self {
        let laid_out_width = viewport_width_px.max(layout.min_viewport_width_px);
        let visible_chart_width = (laid_out_width - layout.chart_left_px - layout.right_px)
            .max(layout.min_visible_chart_width_px);
        let base_pixels_per_day = visible_chart_width / base_window_days;
        let pixels_per_day = (base_pixels_per_day * zoom_level).max(layout.min_pixels_per_day);
        let chart_width_px =
            visible_chart_width.max((full_days(projector) * pixels_per_day).ceil());

        Self {
            projector,
            layout,
            viewport_width_px,
            pixels_per_day,
            chart_width_px,
        }
    }

    #[must_use]
    pub fn projector(&self) -> &'a IdleGapProjector {
        self.projector
    }

    #[must_use]
    pub fn layout(&self) -> TimelineLayout {
        self.layout
    }

    #[must_use]
    pub fn pixels_per_day(&self) -> f64 {
        self.pixels_per_day
    }

    #[must_use]
    pub fn chart_width_px(&self) -> f64 {
        self.chart_width_px
    }

    #[must_use]
    pub fn content_width_px(&self) -> f64 {
        self.layout.chart_left_px + self.chart_width_px + self.layout.right_px
    }

    #[must_use]
    pub fn max_scroll_px(&self) -> f64 {
        (self.content_width_px() - self.viewport_width_px).max(0.0)
    }

    #[must_use]
    pub fn clamp_scroll(&self, scroll_offset_px: f64) -> f64 {
        scroll_offset_px.clamp(0.0, self.max_scroll_px())
    }

    #[must_use]
    pub fn day_to_pixel(&self, day: f64) -> f64 {
        let ratio = self.projector.project_day(day) / self.projector.total_virtual_days();
        self.layout.chart_left_px + ratio * self.chart_width_px
    }

    #[must_use]
    pub fn date_to_pixel(&self, date: NaiveDate) -> f64 {
        self.day_to_pixel(day_number(date) as f64)
    }

    /// Inverse of [`TimelineScale::day_to_pixel`], clamped to the domain.
    #[must_use]
    pub fn pixel_to_day(&self, pixel: f64) -> f64 {
        let ratio = (pixel - self.layout.chart_left_px) / self.chart_width_px;
        self.projector
            .invert_virtual(ratio * self.projector.total_virtual_days())
    }

    #[must_use]
    pub fn pixel_to_date(&self, pixel: f64) -> NaiveDate {
        date_from_day_value(self.pixel_to_day(pixel))
    }

    /// Geometry of the inclusive range `[start, end]`, drawn up to the start
    /// of the day after `end`.
    #[must_use]
    pub fn span_geometry(&self, start: NaiveDate, end: NaiveDate) -> SpanGeometry {
        let x = self.date_to_pixel(start);
        let end_x = self.day_to_pixel(day_number(end) as f64 + 1.0);
        SpanGeometry {
            x,
            width: (end_x - x).max(self.layout.min_span_width_px),
        }
    }
}

/// Whole days the chart must fit, counting both domain endpoints.
#[must_use]
pub fn full_days(projector: &IdleGapProjector) -> f64 {
    projector.total_virtual_days().round().max(1.0) + 1.0
}

#[cfg(test)]
mod tests {
    use super::{TimelineLayout, TimelineScale};
    use crate::core::{Domain, IdleGapProjector};
    use chrono::NaiveDate;

    fn projector() -> IdleGapProjector {
        IdleGapProjector::linear(Domain {
            start: NaiveDate::from_ymd_opt(2022, 1, 1).expect("date"),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
        })
    }

    #[test]
    fn zoom_one_shows_base_window_per_viewport() {
        let projector = projector();
        let scale = TimelineScale::new(&projector, TimelineLayout::default(), 1040.0, 1.0, 365.0);
        assert!((scale.pixels_per_day() - 1000.0 / 365.0).abs() <= 1e-9);
        assert!(scale.chart_width_px() > 1000.0);
        assert!(scale.max_scroll_px() > 0.0);
    }

    #[test]
    fn narrow_viewport_uses_minimum_chart_width() {
        let projector = projector();
        let scale = TimelineScale::new(&projector, TimelineLayout::default(), 100.0, 0.25, 365.0);
        assert!(scale.pixels_per_day() >= 0.2);
        assert!(scale.chart_width_px() >= 240.0);
    }

    #[test]
    fn span_geometry_has_minimum_width() {
        let projector = projector();
        let scale = TimelineScale::new(&projector, TimelineLayout::default(), 400.0, 0.25, 365.0);
        let day = NaiveDate::from_ymd_opt(2023, 5, 5).expect("date");
        let span = scale.span_geometry(day, day);
        assert_eq!(span.width, 2.0);
    }

    #[test]
    fn negative_layout_value_is_rejected() {
        let layout = TimelineLayout {
            right_px: -1.0,
            ..TimelineLayout::default()
        };
        assert!(layout.validate().is_err());
    }
}
