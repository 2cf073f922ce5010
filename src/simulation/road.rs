//! Straight multi-lane road with two far-reaching borders.

use geo::{Coord, Line};

use super::geometric_utils::lerp;

/// How far the borders extend up and down the road.
const INFINITY: f32 = 1_000_000.0;

/// A straight vertical road. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Road {
    /// Horizontal centre of the road.
    pub center: f32,
    /// Total road width.
    pub width: f32,
    /// Number of lanes.
    pub lane_count: usize,
    /// x of the left border.
    pub left: f32,
    /// x of the right border.
    pub right: f32,
    /// y of the far end of the borders.
    pub top: f32,
    /// y of the near end of the borders.
    pub bottom: f32,
    borders: [Line<f32>; 2],
}

impl Road {
    /// Creates a road centred at `center`.
    pub fn new(center: f32, width: f32, lane_count: usize) -> Self {
        let left = center - width / 2.0;
        let right = center + width / 2.0;
        let top = -INFINITY;
        let bottom = INFINITY;

        let borders = [
            Line::new(Coord { x: left, y: top }, Coord { x: left, y: bottom }),
            Line::new(Coord { x: right, y: top }, Coord { x: right, y: bottom }),
        ];

        Self {
            center,
            width,
            lane_count,
            left,
            right,
            top,
            bottom,
            borders,
        }
    }

    /// The left and right border segments.
    pub fn borders(&self) -> &[Line<f32>; 2] {
        &self.borders
    }

    /// x-coordinate of the centre of lane `lane_index` (0 = left-most).
    pub fn lane_center(&self, lane_index: usize) -> f32 {
        let lane_width = self.width / self.lane_count as f32;
        self.left + lane_index as f32 * lane_width + lane_width / 2.0
    }

    /// x-coordinates of the dashed lines between lanes.
    pub fn lane_dividers(&self) -> Vec<f32> {
        (1..self.lane_count)
            .map(|i| lerp(self.left, self.right, i as f32 / self.lane_count as f32))
            .collect()
    }
}
