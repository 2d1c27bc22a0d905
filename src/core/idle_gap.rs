use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::calendar::{date_from_day_number, date_from_day_value, day_number};
use crate::core::{ActiveSpan, Domain};
use crate::error::{TimelineError, TimelineResult};

/// Smallest virtual width a collapsed gap may shrink to, in days.
pub const MIN_COLLAPSED_VIRTUAL_DAYS: f64 = 0.25;

const VIRTUAL_EPSILON: f64 = 1e-9;

/// Tuning for idle-gap compression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdleGapConfig {
    /// Idle stretches longer than this many days are collapsed.
    pub cutoff_days: u32,
    /// Uncompressed days kept visible at each end of a collapsed gap,
    /// capped at half the gap.
    pub edge_tolerance_days: u32,
    /// Virtual days a collapsed gap occupies per `cutoff_days` of real time.
    pub collapsed_gap_days: f64,
}

impl Default for IdleGapConfig {
    fn default() -> Self {
        Self {
            cutoff_days: 30,
            edge_tolerance_days: 5,
            collapsed_gap_days: 3.0,
        }
    }
}

impl IdleGapConfig {
    pub(crate) fn validate(self) -> TimelineResult<Self> {
        if self.cutoff_days == 0 {
            return Err(TimelineError::InvalidData(
                "idle-gap cutoff must be at least one day".to_owned(),
            ));
        }
        if !self.collapsed_gap_days.is_finite() || self.collapsed_gap_days <= 0.0 {
            return Err(TimelineError::InvalidData(
                "idle-gap collapsed_gap_days must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub fn collapsed_scale(self) -> f64 {
        self.collapsed_gap_days / f64::from(self.cutoff_days)
    }
}

/// Stretch of the day axis with a single real-to-virtual rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start_day: f64,
    pub end_day: f64,
    pub virtual_start: f64,
    pub virtual_days: f64,
    pub collapsed: bool,
}

impl Segment {
    #[must_use]
    pub fn real_days(self) -> f64 {
        self.end_day - self.start_day
    }

    #[must_use]
    pub fn virtual_end(self) -> f64 {
        self.virtual_start + self.virtual_days
    }
}

/// Hidden idle stretch, reported so renderers can draw gap indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapsedSegment {
    pub start: NaiveDate,
    /// Last hidden day (inclusive).
    pub end: NaiveDate,
    pub real_days_hidden: i64,
}

/// Piecewise-linear mapping between real days and a virtual axis on which
/// long idle gaps are shrunk.
///
/// Segments are contiguous and chronological on both axes, so projection is
/// monotonic and [`IdleGapProjector::invert_virtual`] undoes
/// [`IdleGapProjector::project_day`] up to floating-point error. Values
/// outside the domain clamp to the axis endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProjectorParts")]
pub struct IdleGapProjector {
    domain: Domain,
    segments: Vec<Segment>,
    collapsed: Vec<CollapsedSegment>,
    total_virtual_days: f64,
}

/// Unchecked serialized form; [`IdleGapProjector`] is only rebuilt from it
/// after the segment chain validates.
#[derive(Deserialize)]
struct ProjectorParts {
    domain: Domain,
    segments: Vec<Segment>,
    collapsed: Vec<CollapsedSegment>,
    total_virtual_days: f64,
}

impl TryFrom<ProjectorParts> for IdleGapProjector {
    type Error = TimelineError;

    fn try_from(parts: ProjectorParts) -> TimelineResult<Self> {
        let (Some(first), Some(last)) = (parts.segments.first(), parts.segments.last()) else {
            return Err(TimelineError::InvalidData(
                "idle-gap projector needs at least one segment".to_owned(),
            ));
        };
        if first.start_day != parts.domain.start_day()
            || first.virtual_start != 0.0
            || last.end_day < parts.domain.end_day()
        {
            return Err(TimelineError::InvalidData(
                "idle-gap segments must span the domain from virtual zero".to_owned(),
            ));
        }
        for segment in &parts.segments {
            if !segment.virtual_days.is_finite()
                || segment.virtual_days <= 0.0
                || segment.real_days() <= 0.0
            {
                return Err(TimelineError::InvalidData(
                    "idle-gap segments must have positive real and virtual widths".to_owned(),
                ));
            }
        }
        let chained = parts.segments.windows(2).all(|pair| {
            pair[0].end_day == pair[1].start_day
                && (pair[0].virtual_end() - pair[1].virtual_start).abs() <= VIRTUAL_EPSILON
        });
        if !chained || (last.virtual_end() - parts.total_virtual_days).abs() > VIRTUAL_EPSILON {
            return Err(TimelineError::InvalidData(
                "idle-gap segments must be contiguous on both axes".to_owned(),
            ));
        }

        Ok(Self {
            domain: parts.domain,
            segments: parts.segments,
            collapsed: parts.collapsed,
            total_virtual_days: parts.total_virtual_days,
        })
    }
}

impl IdleGapProjector {
    /// Identity projection: one uncompressed segment over the whole domain.
    #[must_use]
    pub fn linear(domain: Domain) -> Self {
        let mut segments = SegmentAccumulator::default();
        let (start, end) = (day_number(domain.start), day_number(domain.end));
        segments.push(start, end, (end - start) as f64, false);
        segments.finish(domain)
    }

    /// Builds the compressed projection for `domain`.
    ///
    /// `spans` are the active stretches (intervals and markers); their bounds
    /// become breakpoints and anything between two breakpoints that no span
    /// covers is idle.
    pub fn new(
        domain: Domain,
        spans: &[ActiveSpan],
        config: IdleGapConfig,
    ) -> TimelineResult<Self> {
        let config = config.validate()?;
        let domain_start = day_number(domain.start);
        let domain_end = day_number(domain.end);

        let mut breakpoints = BTreeSet::from([domain_start, domain_end]);
        for span in spans {
            for day in [day_number(span.start), day_number(span.end)] {
                if day > domain_start && day < domain_end {
                    breakpoints.insert(day);
                }
            }
        }

        let coverage = merge_active_days(spans);
        let cutoff = i64::from(config.cutoff_days);
        let edge_tolerance = i64::from(config.edge_tolerance_days);
        let collapsed_scale = config.collapsed_scale();

        let mut segments = SegmentAccumulator::default();
        let breakpoints: Vec<i64> = breakpoints.into_iter().collect();
        for pair in breakpoints.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let gap = idle_gap_days(&coverage, a, b);
            if gap <= cutoff {
                segments.push(a, b, (b - a) as f64, false);
                continue;
            }

            let edge = edge_tolerance.min(gap / 2);
            let collapse_start = a + 1 + edge;
            let collapse_end = b - edge;
            let hidden = collapse_end - collapse_start;
            if hidden <= 0 {
                segments.push(a, b, (b - a) as f64, false);
                continue;
            }

            let collapsed_virtual =
                (hidden as f64 * collapsed_scale).max(MIN_COLLAPSED_VIRTUAL_DAYS);
            segments.push(a, collapse_start, (collapse_start - a) as f64, false);
            segments.push(collapse_start, collapse_end, collapsed_virtual, true);
            segments.push(collapse_end, b, (b - collapse_end) as f64, false);
        }

        let projector = segments.finish(domain);
        debug!(
            segments = projector.segments.len(),
            collapsed = projector.collapsed.len(),
            total_virtual_days = projector.total_virtual_days,
            "built idle-gap projection"
        );
        Ok(projector)
    }

    #[must_use]
    pub fn domain(&self) -> Domain {
        self.domain
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn collapsed_segments(&self) -> &[CollapsedSegment] {
        &self.collapsed
    }

    #[must_use]
    pub fn is_compressed(&self) -> bool {
        !self.collapsed.is_empty()
    }

    #[must_use]
    pub fn total_virtual_days(&self) -> f64 {
        self.total_virtual_days
    }

    /// Maps a real day value onto the virtual axis `[0, total_virtual_days]`.
    #[must_use]
    pub fn project_day(&self, day: f64) -> f64 {
        let start = self.domain.start_day();
        let end = self.domain.end_day();
        if day.is_nan() || day <= start {
            return 0.0;
        }
        if day >= end {
            return self.total_virtual_days;
        }

        let index = self
            .segments
            .partition_point(|segment| segment.end_day <= day)
            .min(self.segments.len() - 1);
        let segment = self.segments[index];
        let real_days = segment.real_days();
        if real_days <= 0.0 {
            return segment.virtual_start;
        }
        let ratio = (day - segment.start_day) / real_days;
        segment.virtual_start + ratio * segment.virtual_days
    }

    #[must_use]
    pub fn project_date(&self, date: NaiveDate) -> f64 {
        self.project_day(day_number(date) as f64)
    }

    /// Maps a virtual coordinate back to a real day value inside the domain.
    #[must_use]
    pub fn invert_virtual(&self, value: f64) -> f64 {
        if value.is_nan() || value <= 0.0 {
            return self.domain.start_day();
        }
        if value >= self.total_virtual_days {
            return self.domain.end_day();
        }

        let index = self
            .segments
            .partition_point(|segment| segment.virtual_end() <= value)
            .min(self.segments.len() - 1);
        let segment = self.segments[index];
        if segment.virtual_days <= 0.0 {
            return segment.start_day;
        }
        let ratio = (value - segment.virtual_start) / segment.virtual_days;
        segment.start_day + ratio * segment.real_days()
    }

    #[must_use]
    pub fn invert_to_date(&self, value: f64) -> NaiveDate {
        date_from_day_value(self.invert_virtual(value))
    }
}

#[derive(Debug, Default)]
struct SegmentAccumulator {
    segments: Vec<Segment>,
    collapsed: Vec<CollapsedSegment>,
    virtual_cursor: f64,
}

impl SegmentAccumulator {
    fn push(&mut self, start: i64, end: i64, virtual_days: f64, collapsed: bool) {
        if end <= start {
            return;
        }
        self.segments.push(Segment {
            start_day: start as f64,
            end_day: end as f64,
            virtual_start: self.virtual_cursor,
            virtual_days,
            collapsed,
        });
        self.virtual_cursor += virtual_days;
        if collapsed {
            self.collapsed.push(CollapsedSegment {
                start: date_from_day_number(start),
                end: date_from_day_number(end - 1),
                real_days_hidden: end - start,
            });
        }
    }

    fn push_fallback(&mut self, start: i64, end: i64) {
        self.segments.push(Segment {
            start_day: start as f64,
            end_day: end.max(start + 1) as f64,
            virtual_start: 0.0,
            virtual_days: 1.0,
            collapsed: false,
        });
        self.virtual_cursor = 1.0;
    }

    fn finish(mut self, domain: Domain) -> IdleGapProjector {
        if self.segments.is_empty() {
            self.push_fallback(day_number(domain.start), day_number(domain.end));
        }
        IdleGapProjector {
            domain,
            segments: self.segments,
            collapsed: self.collapsed,
            total_virtual_days: self.virtual_cursor,
        }
    }
}

/// Sorted, disjoint inclusive day ranges covered by at least one span.
fn merge_active_days(spans: &[ActiveSpan]) -> Vec<(i64, i64)> {
    let mut ranges: Vec<(i64, i64)> = spans
        .iter()
        .map(|span| (day_number(span.start), day_number(span.end)))
        .collect();
    ranges.sort_unstable();

    let mut merged: Vec<(i64, i64)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 + 1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

fn is_active_day(coverage: &[(i64, i64)], day: i64) -> bool {
    let index = coverage.partition_point(|(start, _)| *start <= day);
    index > 0 && coverage[index - 1].1 >= day
}

/// Idle days strictly after breakpoint `a` (itself active) and before `b`.
///
/// Breakpoints include every span boundary, so the stretch between two of
/// them is either wholly covered or wholly idle; probing its first day is
/// enough.
fn idle_gap_days(coverage: &[(i64, i64)], a: i64, b: i64) -> i64 {
    let gap = b - a - 1;
    if gap <= 0 || is_active_day(coverage, a + 1) {
        return 0;
    }
    gap
}
