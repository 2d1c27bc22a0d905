use crate::error::TimelineResult;
use crate::interaction::{InteractionMode, WheelAction, WheelInput};

use super::TimelineEngine;

impl TimelineEngine {
    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.drag.mode()
    }

    /// Routes a wheel event: zoom with the modifier held, otherwise a
    /// vertical wheel scrolls the timeline horizontally.
    /// Returns `true` when the viewport state changed.
    pub fn wheel(&mut self, input: WheelInput) -> TimelineResult<bool> {
        match input.resolve(self.config.zoom_steps.wheel_factor) {
            WheelAction::Zoom { factor, anchor_px } => self.zoom_by(factor, Some(anchor_px)),
            WheelAction::Scroll { delta_px } => {
                let before = self.viewport_state();
                self.pan_by(delta_px)?;
                Ok(self.viewport_state() != before)
            }
            WheelAction::Ignore => Ok(false),
        }
    }

    pub fn drag_start(&mut self, pointer_id: u64, x: f64) {
        self.drag.begin(pointer_id, x);
    }

    /// Pans by the pointer delta when `pointer_id` owns the drag.
    pub fn drag_move(&mut self, pointer_id: u64, x: f64) -> TimelineResult<()> {
        match self.drag.move_to(pointer_id, x) {
            Some(delta_px) => self.pan_by(delta_px),
            None => Ok(()),
        }
    }

    /// Ends the drag; `None` (e.g. lost capture) ends any drag.
    pub fn drag_end(&mut self, pointer_id: Option<u64>) {
        self.drag.end(pointer_id);
    }
}
