//! Marker presentation helpers layered on top of the core projection.
//!
//! Nothing in `core` depends on this module.

pub mod marker_category;
pub mod marker_labels;

pub use marker_category::{KeywordMarkerClassifier, MarkerClassifier, resolve_category};
pub use marker_labels::{
    MarkerLabelConfig, MarkerLabelLayout, PlacedMarkerLabel, layout_marker_labels,
};
