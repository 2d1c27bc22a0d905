use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, warn};

#[cfg(feature = "parallel-layout")]
use rayon::prelude::*;

use crate::core::{Marker, MarkerScope, Row};

use super::TimelineInput;

pub(super) struct CanonicalTimeline {
    pub(super) rows: IndexMap<String, Row>,
    pub(super) markers: Vec<Marker>,
}

/// Normalizes validated input into one layout pass worth of data.
///
/// - rows with an empty id are dropped; rows repeating an id are merged into
///   the first one
/// - every row is re-sorted and lane-packed
/// - row-scoped markers are re-bound to the group row listing their row as a
///   member, and dropped when no row answers to their id
pub(super) fn canonicalize_input(input: TimelineInput) -> CanonicalTimeline {
    let TimelineInput { rows, markers } = input;
    let input_row_count = rows.len();

    let mut by_id: IndexMap<String, Row> = IndexMap::with_capacity(rows.len());
    for row in rows {
        if row.id().is_empty() {
            warn!(
                intervals = row.intervals().len(),
                "dropping row with empty id"
            );
            continue;
        }
        match by_id.entry(row.id().to_owned()) {
            Entry::Occupied(mut existing) => {
                warn!(row = row.id(), "merging rows with duplicate id");
                existing.get_mut().absorb(row);
            }
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
        }
    }

    relayout_rows(&mut by_id);

    let input_marker_count = markers.len();
    let markers: Vec<Marker> = markers
        .into_iter()
        .map(Marker::normalized)
        .filter_map(|marker| bind_marker(marker, &by_id))
        .collect();

    debug!(
        input_row_count,
        canonical_row_count = by_id.len(),
        input_marker_count,
        canonical_marker_count = markers.len(),
        "canonicalized timeline input"
    );

    CanonicalTimeline {
        rows: by_id,
        markers,
    }
}

fn relayout_rows(rows: &mut IndexMap<String, Row>) {
    // Rows are independent, so packing them in parallel yields the same
    // lanes as the sequential path.
    #[cfg(feature = "parallel-layout")]
    {
        rows.par_values_mut().for_each(Row::relayout);
    }

    #[cfg(not(feature = "parallel-layout"))]
    {
        rows.values_mut().for_each(Row::relayout);
    }
}

fn bind_marker(mut marker: Marker, rows: &IndexMap<String, Row>) -> Option<Marker> {
    let MarkerScope::Row(row_id) = &marker.scope else {
        return Some(marker);
    };
    if rows.contains_key(row_id) {
        return Some(marker);
    }

    match rows.values().find(|row| row.answers_to(row_id)) {
        Some(group) => {
            marker.scope = MarkerScope::Row(group.id().to_owned());
            Some(marker)
        }
        None => {
            warn!(
                marker = %marker.id,
                row = %row_id,
                "dropping marker bound to unknown row"
            );
            None
        }
    }
}
