use crate::error::TimelineResult;
use crate::interaction::WheelInput;

use super::{TimelineEngine, ViewportState};

impl TimelineEngine {
    #[must_use]
    pub fn viewport_state(&self) -> ViewportState {
        self.viewport.state()
    }

    #[must_use]
    pub fn zoom_level(&self) -> f64 {
        self.viewport.zoom_level()
    }

    #[must_use]
    pub fn scroll_offset_px(&self) -> f64 {
        self.viewport.scroll_offset_px()
    }

    #[must_use]
    pub fn viewport_width_px(&self) -> f64 {
        self.viewport.viewport_width_px()
    }

    #[must_use]
    pub fn content_width_px(&self) -> f64 {
        self.scale().content_width_px()
    }

    #[must_use]
    pub fn max_scroll_px(&self) -> f64 {
        self.scale().max_scroll_px()
    }

    /// Anchor-preserving zoom; `anchor_px` is viewport-relative and defaults
    /// to the viewport centre. Returns `false` when the zoom did not change.
    pub fn zoom_by(&mut self, factor: f64, anchor_px: Option<f64>) -> TimelineResult<bool> {
        self.viewport.zoom_by(factor, anchor_px)
    }

    pub fn zoom_in(&mut self) -> TimelineResult<bool> {
        self.zoom_by(self.config.zoom_steps.button_factor, None)
    }

    pub fn zoom_out(&mut self) -> TimelineResult<bool> {
        self.zoom_by(1.0 / self.config.zoom_steps.button_factor, None)
    }

    /// One zoom-modifier wheel notch at `local_x`: scrolling up zooms in.
    pub fn wheel_zoom(&mut self, delta_y: f64, local_x: f64) -> TimelineResult<bool> {
        self.wheel(WheelInput {
            delta_x: 0.0,
            delta_y,
            local_x,
            zoom_modifier: true,
        })
    }

    pub fn pan_by(&mut self, delta_px: f64) -> TimelineResult<()> {
        self.viewport.pan_by(delta_px)
    }

    pub fn scroll_to(&mut self, scroll_offset_px: f64) -> TimelineResult<()> {
        self.viewport.scroll_to(scroll_offset_px)
    }

    /// Shows the `days` leading up to today (or the domain end).
    pub fn set_window(&mut self, days: f64) -> TimelineResult<()> {
        self.viewport.set_window(days)
    }

    pub fn fit_to_domain(&mut self) {
        self.viewport.fit_to_domain();
    }

    /// Zoom 1 on the default window.
    pub fn reset_view(&mut self) {
        self.viewport.reset_view();
    }

    /// Applies a new viewport width immediately; see
    /// [`TimelineEngine::apply_debounced_resize`] for coalesced resizes.
    pub fn resize(&mut self, viewport_width_px: u32) -> TimelineResult<()> {
        self.viewport.resize(viewport_width_px)?;
        self.config.viewport_width_px = viewport_width_px;
        Ok(())
    }
}
