use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Panning,
}

/// One wheel event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    /// Pointer position relative to the viewport's left edge.
    pub local_x: f64,
    /// Ctrl/Cmd held: the wheel zooms instead of scrolling.
    pub zoom_modifier: bool,
}

/// What a wheel event should do to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WheelAction {
    Zoom { factor: f64, anchor_px: f64 },
    Scroll { delta_px: f64 },
    Ignore,
}

impl WheelInput {
    /// Modifier wheel zooms around the pointer; otherwise a mostly-vertical
    /// wheel scrolls horizontally. Horizontal wheels are left to the host.
    #[must_use]
    pub fn resolve(self, wheel_factor: f64) -> WheelAction {
        if self.zoom_modifier {
            let factor = if self.delta_y < 0.0 {
                wheel_factor
            } else {
                1.0 / wheel_factor
            };
            return WheelAction::Zoom {
                factor,
                anchor_px: self.local_x,
            };
        }
        if self.delta_y.abs() > self.delta_x.abs() {
            return WheelAction::Scroll {
                delta_px: self.delta_y,
            };
        }
        WheelAction::Ignore
    }
}

/// Pointer drag-to-pan tracking.
///
/// Only the pointer that started the drag moves the view; releases from other
/// pointers are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragPanState {
    pointer_id: Option<u64>,
    last_x: f64,
}

impl DragPanState {
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        if self.pointer_id.is_some() {
            InteractionMode::Panning
        } else {
            InteractionMode::Idle
        }
    }

    pub fn begin(&mut self, pointer_id: u64, x: f64) {
        self.pointer_id = Some(pointer_id);
        self.last_x = x;
    }

    /// Scroll delta for a pointer move, or `None` when the move does not
    /// belong to the active drag. Dragging right scrolls left.
    pub fn move_to(&mut self, pointer_id: u64, x: f64) -> Option<f64> {
        if self.pointer_id != Some(pointer_id) {
            return None;
        }
        let delta = self.last_x - x;
        self.last_x = x;
        Some(delta)
    }

    /// Ends the drag. `None` ends it regardless of which pointer started it.
    pub fn end(&mut self, pointer_id: Option<u64>) {
        match pointer_id {
            Some(id) if self.pointer_id != Some(id) => {}
            _ => self.pointer_id = None,
        }
    }
}

/// Trailing debounce for viewport resizes.
///
/// Callers pass the clock in, so bursts replay deterministically in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<(u32, Instant)>,
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl ResizeDebouncer {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(150);

    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records a resize; restarts the quiet period.
    pub fn record(&mut self, viewport_width_px: u32, now: Instant) {
        self.pending = Some((viewport_width_px, now));
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the latest width once `delay` has passed since the last
    /// recorded resize.
    pub fn poll(&mut self, now: Instant) -> Option<u32> {
        let (width, recorded_at) = self.pending?;
        if now.saturating_duration_since(recorded_at) < self.delay {
            return None;
        }
        self.pending = None;
        Some(width)
    }
}
