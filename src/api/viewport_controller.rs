use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::calendar::day_number;
use crate::core::timeline_scale::full_days;
use crate::core::{Domain, IdleGapProjector, TimelineScale};
use crate::error::{TimelineError, TimelineResult};

use super::engine_config::{ViewportSettings, ZoomLimitBehavior};

/// Zoom level and horizontal scroll of the timeline viewport.
///
/// Transitions never patch a state in place: each operation resolves a
/// complete next state and swaps it in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub zoom_level: f64,
    pub scroll_offset_px: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom_level: 1.0,
            scroll_offset_px: 0.0,
        }
    }
}

/// Owns the projection and viewport geometry and solves zoom/scroll
/// transitions against them.
#[derive(Debug, Clone)]
pub struct ViewportController {
    projector: IdleGapProjector,
    today: NaiveDate,
    settings: ViewportSettings,
    viewport_width_px: f64,
    state: ViewportState,
}

impl ViewportController {
    pub fn new(
        projector: IdleGapProjector,
        today: NaiveDate,
        viewport_width_px: u32,
        settings: ViewportSettings,
    ) -> TimelineResult<Self> {
        if viewport_width_px == 0 {
            return Err(TimelineError::InvalidViewport {
                width: viewport_width_px,
            });
        }
        Ok(Self {
            projector,
            today,
            settings: settings.validate()?,
            viewport_width_px: f64::from(viewport_width_px),
            state: ViewportState::default(),
        })
    }

    #[must_use]
    pub fn state(&self) -> ViewportState {
        self.state
    }

    #[must_use]
    pub fn zoom_level(&self) -> f64 {
        self.state.zoom_level
    }

    #[must_use]
    pub fn scroll_offset_px(&self) -> f64 {
        self.state.scroll_offset_px
    }

    #[must_use]
    pub fn domain(&self) -> Domain {
        self.projector.domain()
    }

    #[must_use]
    pub fn projector(&self) -> &IdleGapProjector {
        &self.projector
    }

    #[must_use]
    pub fn viewport_width_px(&self) -> f64 {
        self.viewport_width_px
    }

    #[must_use]
    pub fn zoom_limits(&self) -> ZoomLimitBehavior {
        self.settings.zoom_limits
    }

    /// Scale for the current zoom level.
    #[must_use]
    pub fn scale(&self) -> TimelineScale<'_> {
        self.scale_at(self.state.zoom_level)
    }

    #[must_use]
    pub fn scale_at(&self, zoom_level: f64) -> TimelineScale<'_> {
        TimelineScale::new(
            &self.projector,
            self.settings.layout,
            self.viewport_width_px,
            zoom_level,
            self.base_window_days(),
        )
    }

    /// Day value under a viewport-relative pixel.
    #[must_use]
    pub fn viewport_pixel_to_day(&self, pixel: f64) -> f64 {
        self.scale()
            .pixel_to_day(self.state.scroll_offset_px + pixel)
    }

    /// Viewport-relative pixel of a day value.
    #[must_use]
    pub fn day_to_viewport_pixel(&self, day: f64) -> f64 {
        self.scale().day_to_pixel(day) - self.state.scroll_offset_px
    }

    /// Rescales by `factor` keeping the day under `anchor_px` in place.
    ///
    /// `anchor_px` is viewport-relative and defaults to the viewport centre.
    /// Returns `false` when the clamped zoom does not change.
    pub fn zoom_by(&mut self, factor: f64, anchor_px: Option<f64>) -> TimelineResult<bool> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(TimelineError::InvalidData(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }
        let anchor_px = anchor_px.unwrap_or(self.viewport_width_px / 2.0);
        if !anchor_px.is_finite() {
            return Err(TimelineError::InvalidData(
                "zoom anchor must be finite".to_owned(),
            ));
        }

        let Some(next) = self.resolve_anchor_preserving_zoom(factor, anchor_px) else {
            trace!(factor, zoom_level = self.state.zoom_level, "zoom unchanged");
            return Ok(false);
        };
        trace!(
            factor,
            anchor_px,
            zoom_level = next.zoom_level,
            scroll_offset_px = next.scroll_offset_px,
            "zoom"
        );
        self.state = next;
        Ok(true)
    }

    /// Shows the last `days` days: zoom so one viewport spans `days` and
    /// scroll so the window ends at today (or the domain end when today lies
    /// outside the domain).
    pub fn set_window(&mut self, days: f64) -> TimelineResult<()> {
        if !days.is_finite() || days <= 0.0 {
            return Err(TimelineError::InvalidData(
                "window days must be finite and > 0".to_owned(),
            ));
        }
        self.state = self.resolve_window(days);
        debug!(
            days,
            zoom_level = self.state.zoom_level,
            scroll_offset_px = self.state.scroll_offset_px,
            "set window"
        );
        Ok(())
    }

    /// Zooms out until the whole domain fits one viewport and scrolls to its
    /// start.
    pub fn fit_to_domain(&mut self) {
        let zoom_level = self
            .settings
            .zoom_limits
            .clamp(self.base_window_days() / full_days(&self.projector));
        let scale = self.scale_at(zoom_level);
        let scroll_offset_px = self.scroll_to_window_start(&scale, self.domain().start_day());
        self.state = ViewportState {
            zoom_level,
            scroll_offset_px,
        };
        debug!(zoom_level, scroll_offset_px, "fit to domain");
    }

    /// Zoom 1, showing the default window up to today.
    pub fn reset_view(&mut self) {
        self.state = self.resolve_window(self.base_window_days());
        debug!(
            scroll_offset_px = self.state.scroll_offset_px,
            "reset view"
        );
    }

    pub fn pan_by(&mut self, delta_px: f64) -> TimelineResult<()> {
        if !delta_px.is_finite() {
            return Err(TimelineError::InvalidData(
                "pan delta must be finite".to_owned(),
            ));
        }
        let scroll_offset_px = self
            .scale()
            .clamp_scroll(self.state.scroll_offset_px + delta_px);
        trace!(delta_px, scroll_offset_px, "pan");
        self.state = ViewportState {
            scroll_offset_px,
            ..self.state
        };
        Ok(())
    }

    pub fn scroll_to(&mut self, scroll_offset_px: f64) -> TimelineResult<()> {
        if !scroll_offset_px.is_finite() {
            return Err(TimelineError::InvalidData(
                "scroll offset must be finite".to_owned(),
            ));
        }
        self.state = ViewportState {
            scroll_offset_px: self.scale().clamp_scroll(scroll_offset_px),
            ..self.state
        };
        Ok(())
    }

    /// Applies a new viewport width keeping the day under the new viewport
    /// centre in place.
    pub fn resize(&mut self, viewport_width_px: u32) -> TimelineResult<()> {
        if viewport_width_px == 0 {
            return Err(TimelineError::InvalidViewport {
                width: viewport_width_px,
            });
        }
        let width = f64::from(viewport_width_px);
        let pivot_px = width / 2.0;
        let anchor_day = self.viewport_pixel_to_day(pivot_px);
        self.viewport_width_px = width;
        self.state = self.anchored_state(self.state.zoom_level, anchor_day, pivot_px);
        debug!(
            viewport_width_px,
            scroll_offset_px = self.state.scroll_offset_px,
            "resize"
        );
        Ok(())
    }

    /// Swaps the projection (e.g. when compression is toggled) keeping the day
    /// at the viewport centre in place.
    pub fn replace_projector(&mut self, projector: IdleGapProjector) {
        let pivot_px = self.viewport_width_px / 2.0;
        let anchor_day = self.viewport_pixel_to_day(pivot_px);
        self.projector = projector;
        self.state = self.anchored_state(self.state.zoom_level, anchor_day, pivot_px);
    }

    fn base_window_days(&self) -> f64 {
        f64::from(self.settings.default_window_days)
    }

    fn resolve_anchor_preserving_zoom(&self, factor: f64, anchor_px: f64) -> Option<ViewportState> {
        let limits = self.settings.zoom_limits;
        let current = self.state;
        let next_zoom = limits.clamp(current.zoom_level * factor);
        if (next_zoom - current.zoom_level).abs() < limits.epsilon {
            return None;
        }
        let anchor_day = self.viewport_pixel_to_day(anchor_px);
        Some(self.anchored_state(next_zoom, anchor_day, anchor_px))
    }

    fn anchored_state(&self, zoom_level: f64, anchor_day: f64, anchor_px: f64) -> ViewportState {
        let scale = self.scale_at(zoom_level);
        ViewportState {
            zoom_level,
            scroll_offset_px: scale.clamp_scroll(scale.day_to_pixel(anchor_day) - anchor_px),
        }
    }

    fn resolve_window(&self, days: f64) -> ViewportState {
        let domain = self.domain();
        let zoom_level = self
            .settings
            .zoom_limits
            .clamp(self.base_window_days() / days);
        let target_end = if domain.contains(self.today) {
            self.today
        } else {
            domain.end
        };
        let window_start = (day_number(target_end) as f64 - days).max(domain.start_day());
        let scale = self.scale_at(zoom_level);
        ViewportState {
            zoom_level,
            scroll_offset_px: self.scroll_to_window_start(&scale, window_start),
        }
    }

    fn scroll_to_window_start(&self, scale: &TimelineScale<'_>, start_day: f64) -> f64 {
        let layout = self.settings.layout;
        scale.clamp_scroll(
            scale.day_to_pixel(start_day) - layout.chart_left_px - layout.scroll_padding_px,
        )
    }
}
