//! activity-timeline: layout and coordinate-projection engine for
//! multi-row activity timelines.
//!
//! The crate packs overlapping intervals and labels into lanes, derives a
//! calendar domain, compresses long idle gaps into a virtual time axis and
//! solves anchor-preserving zoom/scroll transforms. Drawing is left to the
//! host; everything here is deterministic computation over validated input.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod telemetry;

pub use api::{TimelineEngine, TimelineEngineConfig, TimelineInput};
pub use error::{TimelineError, TimelineResult};
