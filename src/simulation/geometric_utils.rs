//! Geometric utility functions for ray casting and collision tests.
//!
//! All geometry lives in a single world frame: `x` grows to the right and `y`
//! grows downward, so "up the road" means decreasing `y`.

use geo::{Coord, Line};

/// A point where a segment meets an obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    /// Intersection point in world coordinates.
    pub point: Coord<f32>,
    /// Normalized distance along the first segment (0 = start, 1 = end).
    pub offset: f32,
}

/// Linear interpolation between `a` and `b`.
///
/// `t = 0` yields `a`, `t = 1` yields `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Intersects two directional segments.
///
/// Solves the parametric system `a.start + t·(a.end - a.start) = b.start +
/// u·(b.end - b.start)` and accepts the solution only when both `t` and `u`
/// lie in `[0, 1]`.
///
/// # Arguments
///
/// * `a` - The segment whose parameter becomes the returned offset (the ray)
/// * `b` - The segment being tested against
///
/// # Returns
///
/// The intersection point and offset along `a`, or `None` when the segments
/// are parallel or meet outside either segment.
pub fn segment_intersection(a: &Line<f32>, b: &Line<f32>) -> Option<Touch> {
    let (p, q) = (a.start, a.end);
    let (c, d) = (b.start, b.end);

    let t_top = (d.x - c.x) * (p.y - c.y) - (d.y - c.y) * (p.x - c.x);
    let u_top = (c.y - p.y) * (p.x - q.x) - (c.x - p.x) * (p.y - q.y);
    let bottom = (d.y - c.y) * (q.x - p.x) - (d.x - c.x) * (q.y - p.y);

    if bottom == 0.0 {
        return None;
    }

    let t = t_top / bottom;
    let u = u_top / bottom;

    // near-parallel segments can overflow instead of hitting exact zero
    if !t.is_finite() || !u.is_finite() {
        return None;
    }

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Touch {
            point: Coord {
                x: lerp(p.x, q.x, t),
                y: lerp(p.y, q.y, t),
            },
            offset: t,
        })
    } else {
        None
    }
}

/// Iterates over the closed edges of a polygon, including the wrap-around edge.
///
/// A two-vertex "polygon" yields the segment twice (once per direction), which
/// lets road borders go through the same collision path as car bodies.
pub fn edges(polygon: &[Coord<f32>]) -> impl Iterator<Item = Line<f32>> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| Line::new(polygon[i], polygon[(i + 1) % n]))
}

/// Returns `true` if any edge of `p` touches any edge of `q`.
///
/// Stops at the first hit.
pub fn polygons_intersect(p: &[Coord<f32>], q: &[Coord<f32>]) -> bool {
    edges(p).any(|edge_p| edges(q).any(|edge_q| segment_intersection(&edge_p, &edge_q).is_some()))
}

/// Returns `true` if the segment touches any edge of the polygon.
pub fn polygon_touches_segment(polygon: &[Coord<f32>], segment: &Line<f32>) -> bool {
    polygons_intersect(polygon, &[segment.start, segment.end])
}
