use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::ActivityInterval;
use crate::core::calendar::day_number;

/// First-fit lane allocator shared by interval and label packing.
///
/// Each lane remembers a frontier (the value an incoming item is tested
/// against). Items must be fed in ascending order of their leading edge; the
/// caller decides what "fits" means through the predicate passed to
/// [`GreedyLanePacker::place`].
#[derive(Debug, Clone)]
pub struct GreedyLanePacker<T> {
    frontiers: SmallVec<[T; 8]>,
}

impl<T: Copy> Default for GreedyLanePacker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> GreedyLanePacker<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frontiers: SmallVec::new(),
        }
    }

    /// Puts an item in the lowest lane whose frontier `accepts` it, opening a
    /// new lane when none does, and advances that lane to `next_frontier`.
    pub fn place(&mut self, accepts: impl Fn(T) -> bool, next_frontier: T) -> usize {
        if let Some(lane) = self.frontiers.iter().position(|frontier| accepts(*frontier)) {
            self.frontiers[lane] = next_frontier;
            return lane;
        }
        self.frontiers.push(next_frontier);
        self.frontiers.len() - 1
    }

    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.frontiers.len()
    }
}

/// Assigns each interval the lowest lane free at its start date.
///
/// `intervals` must be sorted ascending by `start`. A lane becomes free one
/// day after its last interval ends, so touching intervals share a lane.
/// Returns the number of lanes used, never less than 1.
pub fn assign_interval_lanes(intervals: &mut [ActivityInterval]) -> usize {
    let mut packer = GreedyLanePacker::<i64>::new();
    for interval in intervals.iter_mut() {
        let start = day_number(interval.start);
        let next_free = day_number(interval.end) + 1;
        let lane = packer.place(|lane_free_at| lane_free_at <= start, next_free);
        interval.set_lane(lane);
    }
    packer.lane_count().max(1)
}

/// Estimated horizontal extent of one text label, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelBox {
    pub left_px: f64,
    pub width_px: f64,
}

impl LabelBox {
    #[must_use]
    pub fn new(left_px: f64, width_px: f64) -> Self {
        Self { left_px, width_px }
    }

    #[must_use]
    pub fn right_px(self) -> f64 {
        self.left_px + self.width_px
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelLanes {
    /// Lane per input box, in input order.
    pub lanes: Vec<usize>,
    /// Zero when there were no boxes.
    pub lane_count: usize,
}

/// Stacks label boxes so boxes sharing a lane keep at least `margin_px`
/// between them.
///
/// `boxes` must be sorted ascending by `left_px`.
#[must_use]
pub fn pack_label_lanes(boxes: &[LabelBox], margin_px: f64) -> LabelLanes {
    let mut packer = GreedyLanePacker::<f64>::new();
    let lanes = boxes
        .iter()
        .map(|label| {
            let limit = label.left_px - margin_px;
            packer.place(|rightmost| rightmost < limit, label.right_px())
        })
        .collect();

    LabelLanes {
        lanes,
        lane_count: packer.lane_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::{GreedyLanePacker, LabelBox, pack_label_lanes};

    #[test]
    fn packer_reuses_first_accepting_lane() {
        let mut packer = GreedyLanePacker::<i32>::new();
        assert_eq!(packer.place(|free| free <= 0, 5), 0);
        assert_eq!(packer.place(|free| free <= 2, 6), 1);
        assert_eq!(packer.place(|free| free <= 5, 9), 0);
        assert_eq!(packer.lane_count(), 2);
    }

    #[test]
    fn labels_closer_than_margin_stack() {
        let boxes = [
            LabelBox::new(0.0, 50.0),
            LabelBox::new(54.0, 20.0),
            LabelBox::new(57.0, 10.0),
            LabelBox::new(80.0, 10.0),
        ];
        let packed = pack_label_lanes(&boxes, 6.0);
        assert_eq!(packed.lanes, vec![0, 1, 0, 0]);
        assert_eq!(packed.lane_count, 2);
    }

    #[test]
    fn no_labels_means_no_lanes() {
        assert_eq!(pack_label_lanes(&[], 6.0).lane_count, 0);
    }
}
