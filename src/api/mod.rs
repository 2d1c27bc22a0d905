use serde::{Deserialize, Serialize};

use crate::core::{Marker, Row};
use crate::error::{TimelineError, TimelineResult};

mod data_canonicalization;
mod engine;
mod engine_config;
mod engine_interaction;
mod engine_snapshot;
mod engine_viewport;
mod json_contract;
mod viewport_controller;

pub use engine::TimelineEngine;
pub use engine_config::{
    IdleGapBehavior, TimelineEngineConfig, ViewportSettings, ZoomLimitBehavior, ZoomStepBehavior,
};
pub use engine_snapshot::{EngineSnapshot, IntervalSnapshot, RowSnapshot, TimelineSummary};
pub use json_contract::{ENGINE_SNAPSHOT_JSON_SCHEMA_V1, EngineSnapshotJsonContractV1};
pub use viewport_controller::{ViewportController, ViewportState};

/// Raw timeline data as delivered by the host.
///
/// Rows and markers may arrive unsorted, with duplicate ids or dangling marker
/// scopes; the engine canonicalizes them on construction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimelineInput {
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl TimelineInput {
    #[must_use]
    pub fn new(rows: Vec<Row>, markers: Vec<Marker>) -> Self {
        Self { rows, markers }
    }

    pub fn from_json_str(input: &str) -> TimelineResult<Self> {
        let mut parsed: Self = serde_json::from_str(input).map_err(|e| {
            TimelineError::InvalidData(format!("failed to parse timeline input json: {e}"))
        })?;
        // Lane fields in the payload are not trusted.
        for row in &mut parsed.rows {
            row.relayout();
        }
        Ok(parsed)
    }
}
