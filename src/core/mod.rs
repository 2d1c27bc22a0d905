pub mod calendar;
pub mod domain;
pub mod idle_gap;
pub mod lane_packing;
pub mod timeline_scale;
pub mod types;

pub use domain::{Domain, calculate_domain};
pub use idle_gap::{CollapsedSegment, IdleGapConfig, IdleGapProjector, Segment};
pub use lane_packing::{
    GreedyLanePacker, LabelBox, LabelLanes, assign_interval_lanes, pack_label_lanes,
};
pub use timeline_scale::{SpanGeometry, TimelineLayout, TimelineScale};
pub use types::{
    ActiveSpan, ActivityInterval, IntervalMetrics, Marker, MarkerCategory, MarkerKind,
    MarkerScope, Row,
};
