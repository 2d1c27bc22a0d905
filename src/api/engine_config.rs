use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{IdleGapConfig, TimelineLayout};
use crate::error::{TimelineError, TimelineResult};
use crate::extensions::MarkerLabelConfig;

/// Allowed zoom range and the smallest zoom change treated as a change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimitBehavior {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub epsilon: f64,
}

impl Default for ZoomLimitBehavior {
    fn default() -> Self {
        Self {
            min_zoom: 0.25,
            max_zoom: 16.0,
            epsilon: 1e-4,
        }
    }
}

impl ZoomLimitBehavior {
    pub(crate) fn validate(self) -> TimelineResult<Self> {
        if !self.min_zoom.is_finite()
            || !self.max_zoom.is_finite()
            || self.min_zoom <= 0.0
            || self.min_zoom > self.max_zoom
        {
            return Err(TimelineError::InvalidData(
                "zoom limits must be finite with 0 < min_zoom <= max_zoom".to_owned(),
            ));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(TimelineError::InvalidData(
                "zoom epsilon must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub fn clamp(self, zoom_level: f64) -> f64 {
        zoom_level.clamp(self.min_zoom, self.max_zoom)
    }
}

/// Zoom factors applied by discrete zoom inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomStepBehavior {
    /// Zoom-in/zoom-out buttons.
    pub button_factor: f64,
    /// One wheel notch with the zoom modifier held.
    pub wheel_factor: f64,
}

impl Default for ZoomStepBehavior {
    fn default() -> Self {
        Self {
            button_factor: 1.2,
            wheel_factor: 1.1,
        }
    }
}

impl ZoomStepBehavior {
    fn validate(self) -> TimelineResult<Self> {
        for (value, name) in [
            (self.button_factor, "button_factor"),
            (self.wheel_factor, "wheel_factor"),
        ] {
            if !value.is_finite() || value <= 1.0 {
                return Err(TimelineError::InvalidData(format!(
                    "zoom step `{name}` must be finite and > 1"
                )));
            }
        }
        Ok(self)
    }
}

/// Idle-gap compression toggle plus its tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct IdleGapBehavior {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub config: IdleGapConfig,
}

/// Everything the viewport needs besides data: layout, zoom limits and the
/// span one viewport shows at zoom 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSettings {
    pub layout: TimelineLayout,
    pub zoom_limits: ZoomLimitBehavior,
    pub default_window_days: u32,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            layout: TimelineLayout::default(),
            zoom_limits: ZoomLimitBehavior::default(),
            default_window_days: default_window_days(),
        }
    }
}

impl ViewportSettings {
    pub(crate) fn validate(self) -> TimelineResult<Self> {
        if self.default_window_days == 0 {
            return Err(TimelineError::InvalidData(
                "default window must be at least one day".to_owned(),
            ));
        }
        Ok(Self {
            layout: self.layout.validate()?,
            zoom_limits: self.zoom_limits.validate()?,
            default_window_days: self.default_window_days,
        })
    }
}

/// Public engine bootstrap configuration.
///
/// Serializable so hosts can persist timeline setup next to their data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineEngineConfig {
    pub viewport_width_px: u32,
    /// Overrides the local calendar date; mostly useful for reproducible
    /// layouts and tests.
    #[serde(default)]
    pub today: Option<NaiveDate>,
    #[serde(default = "default_window_days")]
    pub default_window_days: u32,
    #[serde(default)]
    pub zoom_limits: ZoomLimitBehavior,
    #[serde(default)]
    pub zoom_steps: ZoomStepBehavior,
    #[serde(default)]
    pub layout: TimelineLayout,
    #[serde(default)]
    pub idle_gap: IdleGapBehavior,
    #[serde(default)]
    pub marker_labels: MarkerLabelConfig,
}

fn default_window_days() -> u32 {
    365
}

impl TimelineEngineConfig {
    #[must_use]
    pub fn new(viewport_width_px: u32) -> Self {
        Self {
            viewport_width_px,
            today: None,
            default_window_days: default_window_days(),
            zoom_limits: ZoomLimitBehavior::default(),
            zoom_steps: ZoomStepBehavior::default(),
            layout: TimelineLayout::default(),
            idle_gap: IdleGapBehavior::default(),
            marker_labels: MarkerLabelConfig::default(),
        }
    }

    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    #[must_use]
    pub fn with_default_window_days(mut self, days: u32) -> Self {
        self.default_window_days = days;
        self
    }

    #[must_use]
    pub fn with_zoom_limits(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.zoom_limits.min_zoom = min_zoom;
        self.zoom_limits.max_zoom = max_zoom;
        self
    }

    #[must_use]
    pub fn with_zoom_steps(mut self, steps: ZoomStepBehavior) -> Self {
        self.zoom_steps = steps;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: TimelineLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Enables idle-gap compression with the given tuning.
    #[must_use]
    pub fn with_idle_gap_compression(mut self, config: IdleGapConfig) -> Self {
        self.idle_gap = IdleGapBehavior {
            enabled: true,
            config,
        };
        self
    }

    #[must_use]
    pub fn with_marker_labels(mut self, config: MarkerLabelConfig) -> Self {
        self.marker_labels = config;
        self
    }

    #[must_use]
    pub fn viewport_settings(self) -> ViewportSettings {
        ViewportSettings {
            layout: self.layout,
            zoom_limits: self.zoom_limits,
            default_window_days: self.default_window_days,
        }
    }

    pub(crate) fn validate(self) -> TimelineResult<Self> {
        if self.viewport_width_px == 0 {
            return Err(TimelineError::InvalidViewport {
                width: self.viewport_width_px,
            });
        }
        self.viewport_settings().validate()?;
        self.zoom_steps.validate()?;
        self.idle_gap.config.validate()?;
        self.marker_labels.validate()?;
        Ok(self)
    }
}
