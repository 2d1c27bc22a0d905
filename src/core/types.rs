use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::calendar::day_number;
use crate::core::lane_packing::assign_interval_lanes;

/// Activity counters attached to one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntervalMetrics {
    #[serde(default)]
    pub commit_count: u64,
    #[serde(default)]
    pub active_days: u32,
}

/// Inclusive calendar range of recorded activity inside one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub metrics: IntervalMetrics,
    /// Member project this interval came from when the row is a group.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    lane: usize,
}

impl ActivityInterval {
    /// Builds an interval, swapping reversed bounds so `start <= end`.
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
            metrics: IntervalMetrics::default(),
            source: None,
            lane: 0,
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: IntervalMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Lane assigned by the interval packer.
    #[must_use]
    pub fn lane(&self) -> usize {
        self.lane
    }

    pub(crate) fn set_lane(&mut self, lane: usize) {
        self.lane = lane;
    }

    pub(crate) fn normalized(mut self) -> Self {
        if self.start > self.end {
            std::mem::swap(&mut self.start, &mut self.end);
        }
        self
    }

    /// Calendar days covered, counting both ends.
    #[must_use]
    pub fn day_count(&self) -> i64 {
        day_number(self.end) - day_number(self.start) + 1
    }
}

/// One timeline row: a project, or a group of projects sharing a row.
///
/// Intervals are kept stable-sorted by start date and lane-packed on every
/// construction, so `lane_count` always matches the intervals it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    id: String,
    #[serde(default)]
    members: Vec<String>,
    #[serde(default)]
    intervals: Vec<ActivityInterval>,
    #[serde(default = "default_lane_count")]
    lane_count: usize,
}

fn default_lane_count() -> usize {
    1
}

impl Row {
    #[must_use]
    pub fn new(id: impl Into<String>, intervals: Vec<ActivityInterval>) -> Self {
        let mut row = Self {
            id: id.into(),
            members: Vec::new(),
            intervals,
            lane_count: 1,
        };
        row.relayout();
        row
    }

    /// Merges member rows into a single row.
    ///
    /// Intervals without an explicit source are tagged with the id of the
    /// member they came from.
    #[must_use]
    pub fn grouped(id: impl Into<String>, members: Vec<Row>) -> Self {
        let mut member_ids = Vec::with_capacity(members.len());
        let mut intervals = Vec::new();
        for member in members {
            for interval in member.intervals {
                let interval = if interval.source.is_none() {
                    interval.with_source(member.id.clone())
                } else {
                    interval
                };
                intervals.push(interval);
            }
            member_ids.push(member.id);
        }

        let mut row = Self::new(id, intervals);
        row.members = member_ids;
        row
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Ids of the projects merged into this row; empty for a plain row.
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    #[must_use]
    pub fn intervals(&self) -> &[ActivityInterval] {
        &self.intervals
    }

    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// Returns `true` when `id` names this row or one of its members.
    #[must_use]
    pub fn answers_to(&self, id: &str) -> bool {
        self.id == id || self.members.iter().any(|member| member == id)
    }

    /// Moves another row's intervals and members into this one. Lanes are
    /// stale until the next [`Row::relayout`].
    pub(crate) fn absorb(&mut self, other: Row) {
        self.intervals.extend(other.intervals);
        for member in other.members {
            if !self.members.contains(&member) {
                self.members.push(member);
            }
        }
    }

    pub(crate) fn relayout(&mut self) {
        let intervals = std::mem::take(&mut self.intervals);
        self.intervals = intervals
            .into_iter()
            .map(ActivityInterval::normalized)
            .collect();
        self.intervals.sort_by_key(|interval| interval.start);
        self.lane_count = assign_interval_lanes(&mut self.intervals);
    }
}

/// Explicit marker category supplied by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerCategory {
    Release,
    Milestone,
    Incident,
    Talk,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerScope {
    Global,
    /// Bound to the row with this id (or a group row listing it as member).
    Row(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerKind {
    Point { date: NaiveDate },
    Range { start: NaiveDate, end: NaiveDate },
}

impl MarkerKind {
    /// First and last covered day.
    #[must_use]
    pub fn bounds(self) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Point { date } => (date, date),
            Self::Range { start, end } => (start.min(end), start.max(end)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    pub scope: MarkerScope,
    #[serde(flatten)]
    pub kind: MarkerKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub tooltip: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category: Option<MarkerCategory>,
}

impl Marker {
    #[must_use]
    pub fn point(id: impl Into<String>, date: NaiveDate) -> Self {
        Self::with_kind(id, MarkerKind::Point { date })
    }

    /// Builds a range marker, swapping reversed bounds.
    #[must_use]
    pub fn range(id: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self::with_kind(
            id,
            MarkerKind::Range {
                start: start.min(end),
                end: start.max(end),
            },
        )
    }

    fn with_kind(id: impl Into<String>, kind: MarkerKind) -> Self {
        Self {
            id: id.into(),
            scope: MarkerScope::Global,
            kind,
            label: String::new(),
            tooltip: None,
            color: None,
            url: None,
            category: None,
        }
    }

    #[must_use]
    pub fn for_row(mut self, row_id: impl Into<String>) -> Self {
        self.scope = MarkerScope::Row(row_id.into());
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: MarkerCategory) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self.scope, MarkerScope::Global)
    }

    pub(crate) fn normalized(mut self) -> Self {
        if let MarkerKind::Range { start, end } = self.kind {
            self.kind = MarkerKind::Range {
                start: start.min(end),
                end: start.max(end),
            };
        }
        self
    }
}

/// Inclusive calendar span considered "interesting" by the idle-gap
/// projector: an activity interval, a range marker, or a single marked day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ActiveSpan {
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Collects spans from every row interval and marker.
    #[must_use]
    pub fn collect<'a>(
        rows: impl IntoIterator<Item = &'a Row>,
        markers: impl IntoIterator<Item = &'a Marker>,
    ) -> Vec<Self> {
        let mut spans: Vec<Self> = rows
            .into_iter()
            .flat_map(|row| row.intervals().iter())
            .map(|interval| Self::new(interval.start, interval.end))
            .collect();
        spans.extend(markers.into_iter().map(|marker| {
            let (start, end) = marker.kind.bounds();
            Self::new(start, end)
        }));
        spans
    }
}
